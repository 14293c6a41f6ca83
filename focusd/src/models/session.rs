//! Focus session model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A focus session: a timed interval during which a named activity is active.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusSession {
    /// Row id, assigned by the store on creation.
    pub id: i64,
    /// Name of the activity (e.g. "writing", "coding"). Any non-empty string.
    pub focus_name: String,
    /// Free-text label of the originating device, if reported.
    pub device: Option<String>,
    /// When the session was started. Immutable after creation.
    pub start_time: DateTime<Utc>,
    /// When the session was stopped. `None` means the session is still open.
    pub end_time: Option<DateTime<Utc>>,
}

impl FocusSession {
    /// Elapsed time in fractional hours, counting open sessions up to `now`.
    pub fn hours_until(&self, now: DateTime<Utc>) -> f64 {
        let end = self.end_time.unwrap_or(now);
        (end - self.start_time).num_milliseconds() as f64 / 3_600_000.0
    }
}

/// Response body for the current-focus query.
///
/// `focus` and `start_time` are only present when a session is active; the
/// no-active-session case is a defined result, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentFocus {
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
}

impl CurrentFocus {
    /// No session is currently open.
    pub const fn inactive() -> Self {
        Self {
            active: false,
            focus: None,
            start_time: None,
        }
    }

    /// The newest open session across all focus names.
    pub fn active(focus: String, start_time: DateTime<Utc>) -> Self {
        Self {
            active: true,
            focus: Some(focus),
            start_time: Some(start_time),
        }
    }
}
