//! Environment configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Shared secret required on every API call.
pub const API_KEY_ENV: &str = "FOCUSD_API_KEY";
/// Overrides the default database location (~/.focusd/focus.db).
pub const DB_PATH_ENV: &str = "FOCUSD_DB_PATH";
/// Base URL the CLI client talks to.
pub const URL_ENV: &str = "FOCUSD_URL";

const DEFAULT_URL: &str = "http://127.0.0.1:8080";

/// Configuration for the server process.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Value callers must supply in the x-api-key header.
    pub api_key: String,
    /// Database path override; `None` means the default location.
    pub db_path: Option<PathBuf>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .with_context(|| format!("{API_KEY_ENV} must be set to run the server"))?;
        let db_path = std::env::var_os(DB_PATH_ENV).map(PathBuf::from);
        Ok(Self { api_key, db_path })
    }
}

/// Configuration for CLI commands acting as HTTP clients.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(URL_ENV).unwrap_or_else(|_| DEFAULT_URL.to_string());
        let api_key = std::env::var(API_KEY_ENV)
            .with_context(|| format!("{API_KEY_ENV} must be set to talk to the server"))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}
