//! CLI argument definitions.

use clap::{Parser, Subcommand, ValueEnum};

/// focusd - track named focus sessions and report time-bucketed statistics
#[derive(Parser, Debug)]
#[command(name = "focusd")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server that owns the session store
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Start a focus session
    Start {
        /// Focus name (e.g. "writing", "coding")
        focus: String,

        /// Device label to record with the session
        #[arg(short, long)]
        device: Option<String>,
    },

    /// Stop the newest open session for a focus name (no-op if none is open)
    Stop {
        /// Focus name to stop
        focus: String,
    },

    /// Show the currently active session, if any
    Current,

    /// Print aggregated statistics
    Stats {
        /// Report granularity
        #[arg(value_enum)]
        report: StatsReport,

        /// Day or week offset relative to now (daily and weekly only);
        /// negative values reach into the past
        #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
        offset: i64,
    },
}

/// Report granularities for the stats subcommand
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatsReport {
    /// One day, grouped by (day, focus)
    Daily,
    /// One ISO week, grouped by (day, focus)
    Weekly,
    /// All history, grouped by (calendar month, focus)
    Monthly,
    /// All history, grouped by focus
    Overall,
}
