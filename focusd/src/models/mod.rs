//! Data models for focusd entities.

mod session;
mod stats;

pub use session::{CurrentFocus, FocusSession};
pub use stats::{DailyStat, MonthlyStat, OverallStat, WeeklyStat};
