//! Time-bucketed aggregation over focus sessions.
//!
//! The db layer only selects rows; everything here is pure computation so the
//! bucketing rules can be tested without a database.

mod bucket;
mod window;

pub use bucket::{daily, monthly, overall, weekly};
pub use window::{day_window, week_window};
