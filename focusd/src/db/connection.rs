//! Database connection management.

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Database wrapper for focusd.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create the database at the default location (~/.focusd/focus.db).
    pub fn open() -> Result<Self> {
        let db_path = Self::default_path()?;
        Self::open_at(&db_path)
    }

    /// Get the default database path under the user's home directory.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        let data_dir = home.join(".focusd");
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create directory: {}", data_dir.display()))?;
        Ok(data_dir.join("focus.db"))
    }

    /// Open or create the database at a specific path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;

        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize the database schema.
    ///
    /// Timestamps are stored as RFC 3339 UTC text. UTC timestamps rendered
    /// that way compare lexicographically in chronological order, which the
    /// windowed queries and `ORDER BY start_time` rely on.
    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS focus_sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                focus_name TEXT NOT NULL,
                device TEXT,
                start_time TEXT NOT NULL,
                end_time TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_focus_sessions_name ON focus_sessions(focus_name);
            CREATE INDEX IF NOT EXISTS idx_focus_sessions_start ON focus_sessions(start_time);
            ",
        )?;
        Ok(())
    }

    /// Get a reference to the connection.
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }
}
