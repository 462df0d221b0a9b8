//! SQLite connection wrapper (lightweight for CLI usage).
//!
//! The foreground command and the background auto-archive each own one
//! `DbPool` on the same file; SQLite serializes the writers (WAL +
//! busy timeout).

use crate::utils::time::Clock;
use rusqlite::{Connection, Result};
use std::path::Path;
use std::time::Duration;

const BUSY_TIMEOUT_MS: u64 = 5000;

pub struct DbPool {
    pub conn: Connection,
    /// Decodes stored UTC instants back into the configured zone.
    pub clock: Clock,
}

impl DbPool {
    pub fn new(path: &str, clock: Clock) -> Result<Self> {
        let conn = Connection::open(Path::new(path))?;
        conn.busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS))?;
        let _mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        Ok(Self { conn, clock })
    }
}
