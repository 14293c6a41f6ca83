//! Parameterized session bucketing.
//!
//! The four reports (daily, weekly, monthly, overall) share one fold and
//! differ only in the bucket key; the duration math lives in a single place.
//! Open sessions count their elapsed time up to `now`, so repeated calls keep
//! growing until the session is stopped.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::models::{DailyStat, FocusSession, MonthlyStat, OverallStat, WeeklyStat};
use crate::stats::window::month_start;

/// Accumulated metrics for one (bucket, focus) group.
struct Totals {
    activations: i64,
    hours: f64,
    first_start: DateTime<Utc>,
}

/// Group sessions by `(key_fn(session), focus_name)` and accumulate counts,
/// fractional hours, and the earliest start per group. The `BTreeMap` yields
/// groups ordered by bucket key ascending, then focus name ascending.
fn aggregate<K, F>(
    sessions: &[FocusSession],
    now: DateTime<Utc>,
    key_fn: F,
) -> Vec<((K, String), Totals)>
where
    K: Ord,
    F: Fn(&FocusSession) -> K,
{
    let mut groups: BTreeMap<(K, String), Totals> = BTreeMap::new();

    for session in sessions {
        let key = (key_fn(session), session.focus_name.clone());
        let hours = session.hours_until(now);
        groups
            .entry(key)
            .and_modify(|t| {
                t.activations += 1;
                t.hours += hours;
                t.first_start = t.first_start.min(session.start_time);
            })
            .or_insert(Totals {
                activations: 1,
                hours,
                first_start: session.start_time,
            });
    }

    groups.into_iter().collect()
}

/// Group by (calendar day, focus). Callers pass sessions already filtered to
/// one day window.
pub fn daily(sessions: &[FocusSession], now: DateTime<Utc>) -> Vec<DailyStat> {
    aggregate(sessions, now, |s| s.start_time.date_naive())
        .into_iter()
        .map(|((day, focus), t)| DailyStat {
            day,
            focus,
            hours: t.hours,
            activations: t.activations,
        })
        .collect()
}

/// Group by (calendar day, focus) within a week window. The response field is
/// named `week_start` for compatibility even though each row covers one day.
pub fn weekly(sessions: &[FocusSession], now: DateTime<Utc>) -> Vec<WeeklyStat> {
    aggregate(sessions, now, |s| s.start_time.date_naive())
        .into_iter()
        .map(|((day, focus), t)| WeeklyStat {
            week_start: day,
            focus,
            hours: t.hours,
            activations: t.activations,
        })
        .collect()
}

/// Group by (calendar month, focus) over all recorded history.
pub fn monthly(sessions: &[FocusSession], now: DateTime<Utc>) -> Vec<MonthlyStat> {
    aggregate(sessions, now, |s| month_start(s.start_time.date_naive()))
        .into_iter()
        .map(|((month, focus), t)| MonthlyStat {
            month_start: month,
            focus,
            hours: t.hours,
            activations: t.activations,
        })
        .collect()
}

/// Group by focus alone over all recorded history.
pub fn overall(sessions: &[FocusSession], now: DateTime<Utc>) -> Vec<OverallStat> {
    aggregate(sessions, now, |_| ())
        .into_iter()
        .map(|(((), focus), t)| OverallStat {
            focus,
            first_activation: t.first_start.to_rfc3339(),
            activations: t.activations,
            hours: t.hours,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Duration, TimeZone};

    fn ts(d: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, h, m, 0).unwrap()
    }

    fn session(id: i64, focus: &str, start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> FocusSession {
        FocusSession {
            id,
            focus_name: focus.to_string(),
            device: None,
            start_time: start,
            end_time: end,
        }
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let now = ts(12, 12, 0);
        assert!(daily(&[], now).is_empty());
        assert!(weekly(&[], now).is_empty());
        assert!(monthly(&[], now).is_empty());
        assert!(overall(&[], now).is_empty());
    }

    #[test]
    fn test_overall_counts_and_hours() {
        let now = ts(12, 12, 0);
        let sessions = vec![
            session(1, "coding", ts(12, 8, 0), Some(ts(12, 10, 0))),
            session(2, "coding", ts(12, 10, 30), Some(ts(12, 11, 0))),
            session(3, "writing", ts(12, 9, 0), Some(ts(12, 9, 45))),
        ];

        let rows = overall(&sessions, now);
        assert_eq!(rows.len(), 2);

        // Ordered by focus name ascending.
        assert_eq!(rows[0].focus, "coding");
        assert_eq!(rows[0].activations, 2);
        assert!((rows[0].hours - 2.5).abs() < 1e-9);
        assert_eq!(rows[0].first_activation, ts(12, 8, 0).to_rfc3339());

        assert_eq!(rows[1].focus, "writing");
        assert_eq!(rows[1].activations, 1);
        assert!((rows[1].hours - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_open_session_counts_elapsed_until_now() {
        let start = ts(12, 9, 0);
        let sessions = vec![session(1, "coding", start, None)];

        let rows = daily(&sessions, start + Duration::hours(2));
        assert!((rows[0].hours - 2.0).abs() < 1e-9);

        // Recomputed later, the value has grown; it is not a stable quantity.
        let rows = daily(&sessions, start + Duration::hours(3));
        assert!((rows[0].hours - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_daily_groups_by_day_and_focus() {
        let now = ts(13, 23, 0);
        let sessions = vec![
            session(1, "coding", ts(12, 9, 0), Some(ts(12, 10, 0))),
            session(2, "coding", ts(13, 9, 0), Some(ts(13, 10, 0))),
            session(3, "coding", ts(13, 11, 0), Some(ts(13, 12, 0))),
        ];

        let rows = daily(&sessions, now);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].day, ts(12, 0, 0).date_naive());
        assert_eq!(rows[0].activations, 1);
        assert_eq!(rows[1].day, ts(13, 0, 0).date_naive());
        assert_eq!(rows[1].activations, 2);
        assert!((rows[1].hours - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_weekly_rows_are_per_day_within_week() {
        // Window handling is the caller's job; here two days of one week
        // produce two rows, each labeled with its own day.
        let now = ts(14, 20, 0);
        let sessions = vec![
            session(1, "coding", ts(11, 9, 0), Some(ts(11, 10, 0))),
            session(2, "coding", ts(13, 9, 0), Some(ts(13, 10, 0))),
        ];

        let rows = weekly(&sessions, now);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].week_start, ts(11, 0, 0).date_naive());
        assert_eq!(rows[1].week_start, ts(13, 0, 0).date_naive());
    }

    #[test]
    fn test_monthly_groups_by_calendar_month() {
        let now = Utc.with_ymd_and_hms(2024, 4, 20, 0, 0, 0).unwrap();
        let feb = Utc.with_ymd_and_hms(2024, 2, 28, 9, 0, 0).unwrap();
        let mar = ts(5, 9, 0);
        let sessions = vec![
            session(1, "coding", feb, Some(feb + Duration::hours(1))),
            session(2, "coding", mar, Some(mar + Duration::hours(1))),
            session(3, "coding", mar + Duration::days(1), Some(mar + Duration::days(1) + Duration::hours(2))),
        ];

        let rows = monthly(&sessions, now);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].month_start, feb.date_naive().with_day(1).unwrap());
        assert_eq!(rows[0].activations, 1);
        assert_eq!(rows[1].month_start, mar.date_naive().with_day(1).unwrap());
        // Activations is the count, not the hour sum.
        assert_eq!(rows[1].activations, 2);
        assert!((rows[1].hours - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_ordering_is_bucket_then_focus() {
        let now = ts(14, 20, 0);
        let sessions = vec![
            session(1, "writing", ts(12, 9, 0), Some(ts(12, 10, 0))),
            session(2, "coding", ts(13, 9, 0), Some(ts(13, 10, 0))),
            session(3, "coding", ts(12, 11, 0), Some(ts(12, 12, 0))),
        ];

        let rows = daily(&sessions, now);
        let keys: Vec<_> = rows.iter().map(|r| (r.day, r.focus.as_str())).collect();
        assert_eq!(
            keys,
            vec![
                (ts(12, 0, 0).date_naive(), "coding"),
                (ts(12, 0, 0).date_naive(), "writing"),
                (ts(13, 0, 0).date_naive(), "coding"),
            ]
        );
    }
}
