//! Database query implementations.

use anyhow::Result;
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::FocusSession;

/// Parse a timestamp string flexibly from various formats.
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    // Try RFC3339 first
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    // Try common SQLite datetime format: "YYYY-MM-DD HH:MM:SS"
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(naive.and_utc());
    }

    // Try with fractional seconds: "YYYY-MM-DD HH:MM:SS.SSS"
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }

    anyhow::bail!("Invalid timestamp format: {s}")
}

/// Queries for the focus_sessions table.
pub struct SessionQueries;

impl SessionQueries {
    /// Insert a new open session. Returns the assigned row id.
    ///
    /// Deliberately no uniqueness check: multiple open sessions for the same
    /// name may coexist, and each stop closes only the newest of them.
    pub fn start(
        conn: &Connection,
        focus_name: &str,
        device: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<i64> {
        conn.execute(
            "INSERT INTO focus_sessions (focus_name, device, start_time) VALUES (?1, ?2, ?3)",
            params![focus_name, device, now.to_rfc3339()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Close the newest open session for `focus_name`, if any.
    ///
    /// A single conditional UPDATE so that concurrent stops for the same name
    /// cannot both observe and close the same row. Returns whether a row was
    /// closed; closing nothing is a successful no-op.
    pub fn stop(conn: &Connection, focus_name: &str, now: DateTime<Utc>) -> Result<bool> {
        let changed = conn.execute(
            r"UPDATE focus_sessions SET end_time = ?1
              WHERE id = (
                  SELECT id FROM focus_sessions
                  WHERE focus_name = ?2 AND end_time IS NULL
                  ORDER BY start_time DESC
                  LIMIT 1
              )",
            params![now.to_rfc3339(), focus_name],
        )?;
        Ok(changed > 0)
    }

    /// Get the globally most recent open session across all focus names.
    pub fn current(conn: &Connection) -> Result<Option<(String, DateTime<Utc>)>> {
        let row: Option<(String, String)> = conn
            .query_row(
                r"SELECT focus_name, start_time FROM focus_sessions
                  WHERE end_time IS NULL
                  ORDER BY start_time DESC
                  LIMIT 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match row {
            Some((focus, start)) => Ok(Some((focus, parse_timestamp(&start)?))),
            None => Ok(None),
        }
    }

    /// List sessions with `from <= start_time < to`, ordered by start time.
    pub fn list_started_between(
        conn: &Connection,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<FocusSession>> {
        let mut stmt = conn.prepare(
            r"SELECT id, focus_name, device, start_time, end_time
              FROM focus_sessions
              WHERE start_time >= ?1 AND start_time < ?2
              ORDER BY start_time ASC",
        )?;
        let rows = stmt.query_map(params![from.to_rfc3339(), to.to_rfc3339()], |row| {
            Ok(Self::row_to_session(row))
        })?;

        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(row??);
        }
        Ok(sessions)
    }

    /// List all recorded sessions, ordered by start time.
    pub fn list_all(conn: &Connection) -> Result<Vec<FocusSession>> {
        let mut stmt = conn.prepare(
            r"SELECT id, focus_name, device, start_time, end_time
              FROM focus_sessions
              ORDER BY start_time ASC",
        )?;
        let rows = stmt.query_map([], |row| Ok(Self::row_to_session(row)))?;

        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(row??);
        }
        Ok(sessions)
    }

    /// Convert a row to a `FocusSession`.
    fn row_to_session(row: &rusqlite::Row<'_>) -> Result<FocusSession> {
        let start_time_str: String = row.get(3)?;
        let start_time = parse_timestamp(&start_time_str)?;

        let end_time: Option<DateTime<Utc>> = row
            .get::<_, Option<String>>(4)?
            .map(|s| parse_timestamp(&s))
            .transpose()?;

        Ok(FocusSession {
            id: row.get(0)?,
            focus_name: row.get(1)?,
            device: row.get(2)?,
            start_time,
            end_time,
        })
    }
}
