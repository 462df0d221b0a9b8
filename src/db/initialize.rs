//! Schema bootstrap for the rWorklog ledger.

use crate::db::migrate::run_pending_migrations;
use crate::errors::{AppError, AppResult};
use rusqlite::Connection;

/// Bring the database up to date: the `log` audit table, `work_sessions`
/// and its indexes, then every pending versioned migration.
///
/// Runs on every `AppContext::open`. A failing step is reported as
/// `AppError::Migration`; the schema is never created outside `db::migrate`.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    run_pending_migrations(conn).map_err(|e| AppError::Migration(e.to_string()))
}
