//! Aggregation window computation.
//!
//! All windows are half-open `[start, end)` in UTC: a session starting exactly
//! at `end` belongs to the next window, never both.
//!
//! Offsets are caller-supplied and unbounded; an offset that lands outside the
//! representable calendar yields `None` rather than a panic. No session can
//! exist in such a window anyway.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};

/// UTC midnight at the start of `day`.
fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// Window covering one calendar day, `offset_days` relative to today.
/// Offset 0 is today; negative offsets reach into the past.
pub fn day_window(now: DateTime<Utc>, offset_days: i64) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let day = Duration::try_days(offset_days)
        .and_then(|offset| now.date_naive().checked_add_signed(offset))?;
    let next_day = day.checked_add_signed(Duration::days(1))?;
    Some((start_of_day(day), start_of_day(next_day)))
}

/// Window covering one ISO week (Monday-aligned), `offset_weeks` relative to
/// the current week.
pub fn week_window(now: DateTime<Utc>, offset_weeks: i64) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let today = now.date_naive();
    let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    let start_day = Duration::try_weeks(offset_weeks)
        .and_then(|offset| monday.checked_add_signed(offset))?;
    let next_monday = start_day.checked_add_signed(Duration::weeks(1))?;
    Some((start_of_day(start_day), start_of_day(next_monday)))
}

/// First day of the calendar month containing `day`.
pub fn month_start(day: NaiveDate) -> NaiveDate {
    // Day 1 exists in every month.
    day.with_day(1).unwrap_or(day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_window_today() {
        let now = Utc.with_ymd_and_hms(2024, 3, 12, 15, 30, 0).unwrap();
        let (start, end) = day_window(now, 0).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 12, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 3, 13, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_day_window_offsets() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 2, 0, 0).unwrap();
        let (start, end) = day_window(now, -1).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());

        let (start, _) = day_window(now, 3).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_week_window_truncates_to_monday() {
        // 2024-03-14 is a Thursday; its week starts Monday 2024-03-11.
        let now = Utc.with_ymd_and_hms(2024, 3, 14, 9, 0, 0).unwrap();
        let (start, end) = week_window(now, 0).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 3, 18, 0, 0, 0).unwrap());

        // A Monday truncates to itself; a Sunday to the previous Monday.
        let monday = Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap();
        assert_eq!(week_window(monday, 0).unwrap().0, monday);
        let sunday = Utc.with_ymd_and_hms(2024, 3, 17, 23, 59, 0).unwrap();
        assert_eq!(
            week_window(sunday, 0).unwrap().0,
            Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_week_window_offset() {
        let now = Utc.with_ymd_and_hms(2024, 3, 14, 9, 0, 0).unwrap();
        let (start, end) = week_window(now, -1).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_out_of_range_offsets_yield_no_window() {
        let now = Utc.with_ymd_and_hms(2024, 3, 12, 15, 30, 0).unwrap();

        // Extreme offsets overflow the calendar and must not panic.
        assert!(day_window(now, i64::MAX).is_none());
        assert!(day_window(now, i64::MIN).is_none());
        assert!(day_window(now, 100_000_000).is_none());
        assert!(day_window(now, -100_000_000).is_none());

        assert!(week_window(now, i64::MAX).is_none());
        assert!(week_window(now, i64::MIN).is_none());
        assert!(week_window(now, 100_000_000).is_none());
    }

    #[test]
    fn test_month_start() {
        assert_eq!(month_start(date(2024, 3, 31)), date(2024, 3, 1));
        assert_eq!(month_start(date(2024, 2, 1)), date(2024, 2, 1));
    }
}
