//! focusd - track named focus sessions and report time-bucketed statistics.
//!
//! Architecture:
//! - `focusd serve` runs the HTTP server that owns the SQLite session store
//! - Every other subcommand is a thin HTTP client against that server
//! - All requests carry a shared secret in the x-api-key header

mod cli;
mod config;
mod db;
mod error;
mod models;
mod server;
mod stats;

use anyhow::Result;
use clap::Parser;

use cli::{execute, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    execute(cli).await
}
