//! Aggregated statistics row types.
//!
//! Field names are the wire contract. Weekly rows keep the historical
//! `week_start` field name even though each row covers a single day within
//! the requested week.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One (day, focus) group within a single day window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStat {
    pub day: NaiveDate,
    pub focus: String,
    pub hours: f64,
    pub activations: i64,
}

/// One (day, focus) group within a week window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyStat {
    pub week_start: NaiveDate,
    pub focus: String,
    pub hours: f64,
    pub activations: i64,
}

/// One (calendar month, focus) group over all recorded history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStat {
    pub month_start: NaiveDate,
    pub focus: String,
    pub hours: f64,
    pub activations: i64,
}

/// Per-focus totals over all recorded history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallStat {
    pub focus: String,
    /// RFC 3339 timestamp of the earliest session for this focus.
    pub first_activation: String,
    pub activations: i64,
    pub hours: f64,
}
