//! CLI command execution.
//!
//! Apart from `serve`, every command is a thin client - all storage
//! operations go through the server over HTTP.

use anyhow::{bail, Context, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::models::{CurrentFocus, DailyStat, MonthlyStat, OverallStat, WeeklyStat};
use crate::server;

use super::args::{Cli, Commands, StatsReport};

/// HTTP client for the focusd API.
struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ApiClient {
    fn from_env() -> Result<Self> {
        Ok(Self {
            http: reqwest::Client::new(),
            config: ClientConfig::from_env()?,
        })
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> Result<()> {
        let resp = self
            .http
            .post(format!("{}{path}", self.config.base_url))
            .header("x-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Failed to reach server at {}", self.config.base_url))?;
        Self::check(resp)?;
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, i64)]) -> Result<T> {
        let resp = self
            .http
            .get(format!("{}{path}", self.config.base_url))
            .header("x-api-key", &self.config.api_key)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to reach server at {}", self.config.base_url))?;
        let resp = Self::check(resp)?;
        resp.json().await.context("Failed to parse server response")
    }

    fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
        if resp.status() == StatusCode::FORBIDDEN {
            bail!("Server rejected the API key (check FOCUSD_API_KEY)");
        }
        resp.error_for_status().context("Server returned an error")
    }
}

/// Execute a CLI command.
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve { port } => server::start_server(port).await,
        Commands::Start { focus, device } => start(&focus, device).await,
        Commands::Stop { focus } => stop(&focus).await,
        Commands::Current => current().await,
        Commands::Stats { report, offset } => stats(report, offset).await,
    }
}

async fn start(focus: &str, device: Option<String>) -> Result<()> {
    let client = ApiClient::from_env()?;
    client
        .post(
            "/focus/start",
            serde_json::json!({ "focus": focus, "device": device }),
        )
        .await?;
    println!("Started '{focus}'");
    Ok(())
}

async fn stop(focus: &str) -> Result<()> {
    let client = ApiClient::from_env()?;
    client
        .post("/focus/stop", serde_json::json!({ "focus": focus }))
        .await?;
    println!("Stopped '{focus}'");
    Ok(())
}

async fn current() -> Result<()> {
    let client = ApiClient::from_env()?;
    let current: CurrentFocus = client.get("/focus/current", &[]).await?;

    match (current.focus, current.start_time) {
        (Some(focus), Some(start)) if current.active => {
            println!("Active: '{focus}' since {}", start.to_rfc3339());
        }
        _ => println!("No active focus session"),
    }
    Ok(())
}

async fn stats(report: StatsReport, offset: i64) -> Result<()> {
    let client = ApiClient::from_env()?;

    match report {
        StatsReport::Daily => {
            let rows: Vec<DailyStat> = client
                .get("/stats/daily", &[("day_offset", offset)])
                .await?;
            if rows.is_empty() {
                println!("No sessions in this window");
            }
            for r in rows {
                println!("{}  {:<24} {:>8.2}h  {:>4}x", r.day, r.focus, r.hours, r.activations);
            }
        }
        StatsReport::Weekly => {
            let rows: Vec<WeeklyStat> = client
                .get("/stats/weekly", &[("week_offset", offset)])
                .await?;
            if rows.is_empty() {
                println!("No sessions in this window");
            }
            for r in rows {
                println!(
                    "{}  {:<24} {:>8.2}h  {:>4}x",
                    r.week_start, r.focus, r.hours, r.activations
                );
            }
        }
        StatsReport::Monthly => {
            let rows: Vec<MonthlyStat> = client.get("/stats/monthly", &[]).await?;
            if rows.is_empty() {
                println!("No sessions recorded");
            }
            for r in rows {
                println!(
                    "{}  {:<24} {:>8.2}h  {:>4}x",
                    r.month_start, r.focus, r.hours, r.activations
                );
            }
        }
        StatsReport::Overall => {
            let rows: Vec<OverallStat> = client.get("/stats/overall", &[]).await?;
            if rows.is_empty() {
                println!("No sessions recorded");
            }
            for r in rows {
                println!(
                    "{:<24} {:>8.2}h  {:>4}x  first {}",
                    r.focus, r.hours, r.activations, r.first_activation
                );
            }
        }
    }
    Ok(())
}
