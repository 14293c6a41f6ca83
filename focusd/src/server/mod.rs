//! focusd server - HTTP API over the focus session store.
//!
//! Architecture:
//! - One server process owns the SQLite store (~/.focusd/focus.db by default)
//! - Every route requires the shared secret in the x-api-key header
//! - CLI subcommands are thin clients that talk to the server via HTTP
//!
//! Endpoints:
//! - POST /focus/start - Open a new session for a focus name
//! - POST /focus/stop - Close the newest open session for a focus name
//! - GET /focus/current - The globally newest open session, if any
//! - GET /stats/daily?day_offset=N - Per-(day, focus) totals for one day
//! - GET /stats/weekly?week_offset=N - Per-(day, focus) totals for one week
//! - GET /stats/monthly - Per-(month, focus) totals over all history
//! - GET /stats/overall - Per-focus totals over all history

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Query, Request, State},
    http::HeaderMap,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;

use crate::config::ServerConfig;
use crate::db::{Database, SessionQueries};
use crate::error::ApiError;
use crate::models::{CurrentFocus, DailyStat, MonthlyStat, OverallStat, WeeklyStat};
use crate::stats;

/// Header carrying the shared secret.
const API_KEY_HEADER: &str = "x-api-key";

/// Shared server state.
pub struct AppState {
    /// The session store. rusqlite connections are not Sync, so access is
    /// serialized; each operation is a single statement under the lock.
    db: Mutex<Database>,
    /// Expected value of the x-api-key header.
    api_key: String,
}

// === Request/Response Types ===

/// Body for POST /focus/start.
#[derive(Debug, Deserialize)]
pub struct StartRequest {
    pub focus: String,
    pub device: Option<String>,
}

/// Body for POST /focus/stop.
#[derive(Debug, Deserialize)]
pub struct StopRequest {
    pub focus: String,
}

/// Query parameters for GET /stats/daily.
#[derive(Debug, Deserialize)]
pub struct DailyParams {
    /// 0 = today, negative = past days, positive = future days.
    #[serde(default)]
    pub day_offset: i64,
}

/// Query parameters for GET /stats/weekly.
#[derive(Debug, Deserialize)]
pub struct WeeklyParams {
    /// 0 = the current ISO week, negative = past weeks.
    #[serde(default)]
    pub week_offset: i64,
}

// === Server Lifecycle ===

/// Run the server until the process is stopped.
pub async fn start_server(port: u16) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("focusd=info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let db = match &config.db_path {
        Some(path) => Database::open_at(path)?,
        None => Database::open()?,
    };

    let state = Arc::new(AppState {
        db: Mutex::new(db),
        api_key: config.api_key,
    });

    let app = router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    tracing::info!(%addr, "focusd server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Build the application router.
fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/focus/start", post(start_focus))
        .route("/focus/stop", post(stop_focus))
        .route("/focus/current", get(current_focus))
        .route("/stats/daily", get(daily_stats))
        .route("/stats/weekly", get(weekly_stats))
        .route("/stats/monthly", get(monthly_stats))
        .route("/stats/overall", get(overall_stats))
        .layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// === Authorization ===

/// Whether the supplied headers carry the expected shared secret.
fn key_matches(headers: &HeaderMap, expected: &str) -> bool {
    headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|supplied| supplied == expected)
}

/// Rejects every request without the correct x-api-key header, uniformly for
/// absence and mismatch.
async fn require_api_key(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if key_matches(req.headers(), &state.api_key) {
        Ok(next.run(req).await)
    } else {
        Err(ApiError::Unauthorized)
    }
}

/// Reject empty focus names before touching storage.
fn validate_focus(focus: &str) -> Result<&str, ApiError> {
    if focus.trim().is_empty() {
        return Err(ApiError::Validation("focus must not be empty".to_string()));
    }
    Ok(focus)
}

// === Handlers ===

async fn start_focus(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StartRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let focus = validate_focus(&req.focus)?;

    let db = state.db.lock().await;
    SessionQueries::start(db.conn(), focus, req.device.as_deref(), Utc::now())?;
    tracing::info!(focus, device = req.device.as_deref(), "session started");

    Ok(Json(serde_json::json!({})))
}

async fn stop_focus(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StopRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let focus = validate_focus(&req.focus)?;

    let db = state.db.lock().await;
    let closed = SessionQueries::stop(db.conn(), focus, Utc::now())?;
    // Nothing open is a defined no-op, not an error.
    tracing::info!(focus, closed, "session stop");

    Ok(Json(serde_json::json!({})))
}

async fn current_focus(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CurrentFocus>, ApiError> {
    let db = state.db.lock().await;
    let current = SessionQueries::current(db.conn())?;

    Ok(Json(current.map_or_else(CurrentFocus::inactive, |(focus, start)| {
        CurrentFocus::active(focus, start)
    })))
}

async fn daily_stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DailyParams>,
) -> Result<Json<Vec<DailyStat>>, ApiError> {
    let now = Utc::now();
    // Offsets beyond the representable calendar select nothing.
    let Some((from, to)) = stats::day_window(now, params.day_offset) else {
        return Ok(Json(Vec::new()));
    };

    let db = state.db.lock().await;
    let sessions = SessionQueries::list_started_between(db.conn(), from, to)?;

    Ok(Json(stats::daily(&sessions, now)))
}

async fn weekly_stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WeeklyParams>,
) -> Result<Json<Vec<WeeklyStat>>, ApiError> {
    let now = Utc::now();
    let Some((from, to)) = stats::week_window(now, params.week_offset) else {
        return Ok(Json(Vec::new()));
    };

    let db = state.db.lock().await;
    let sessions = SessionQueries::list_started_between(db.conn(), from, to)?;

    Ok(Json(stats::weekly(&sessions, now)))
}

async fn monthly_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MonthlyStat>>, ApiError> {
    let now = Utc::now();

    let db = state.db.lock().await;
    let sessions = SessionQueries::list_all(db.conn())?;

    Ok(Json(stats::monthly(&sessions, now)))
}

async fn overall_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<OverallStat>>, ApiError> {
    let now = Utc::now();

    let db = state.db.lock().await;
    let sessions = SessionQueries::list_all(db.conn())?;

    Ok(Json(stats::overall(&sessions, now)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_key_matches() {
        let mut headers = HeaderMap::new();
        assert!(!key_matches(&headers, "secret"));

        headers.insert(API_KEY_HEADER, HeaderValue::from_static("wrong"));
        assert!(!key_matches(&headers, "secret"));

        headers.insert(API_KEY_HEADER, HeaderValue::from_static("secret"));
        assert!(key_matches(&headers, "secret"));
    }

    #[test]
    fn test_validate_focus() {
        assert!(validate_focus("coding").is_ok());
        assert!(validate_focus("").is_err());
        assert!(validate_focus("   ").is_err());
    }

    #[test]
    fn test_stats_params_default_to_zero() {
        let params: DailyParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.day_offset, 0);

        let params: WeeklyParams = serde_json::from_str(r#"{"week_offset":-2}"#).unwrap();
        assert_eq!(params.week_offset, -2);
    }
}
