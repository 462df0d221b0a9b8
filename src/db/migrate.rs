use crate::ui::messages::{success, warning};
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

/// Create the `work_sessions` table.
/// Instants are stored as UTC text (`YYYY-MM-DDTHH:MM:SSZ`), `date` is the
/// local calendar day of `start_time`.
fn create_sessions_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS work_sessions (
            id            TEXT PRIMARY KEY,
            date          TEXT NOT NULL,
            start_time    TEXT NOT NULL,
            end_time      TEXT,
            break_minutes INTEGER NOT NULL DEFAULT 0,
            note          TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_date ON work_sessions(date);
        "#,
    )?;
    Ok(())
}

fn migration_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    Ok(())
}

/// Range queries and the oldest-session scan run on `start_time`.
fn migrate_add_start_time_index(conn: &Connection) -> Result<()> {
    let version = "20250310_0002_index_sessions_start_time";

    if migration_applied(conn, version)? {
        return Ok(());
    }

    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_sessions_start ON work_sessions(start_time);",
    )?;
    mark_applied(conn, version, "Added start_time index to work_sessions")?;

    success(format!(
        "Migration applied: {} → indexed work_sessions.start_time",
        version
    ));
    Ok(())
}

/// Drop the never-populated summary tables of early releases.
/// Progress views are computed on read.
fn drop_legacy_summary_tables(conn: &Connection) -> Result<()> {
    for table in ["daily_summary", "weekly_summary", "monthly_summary"] {
        if table_exists(conn, table)? {
            conn.execute_batch(&format!("DROP TABLE {table};"))?;
            warning(format!("Dropped obsolete {} table.", table));
        }
    }
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invocata da db::initialize::init_db() ad ogni apertura del contesto.
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    // 1) Ensure log table
    ensure_log_table(conn)?;

    // 2) Create work_sessions if missing
    if !table_exists(conn, "work_sessions")? {
        create_sessions_table(conn)?;
        success("Created work_sessions table.");
    }

    // 3) Versioned migrations
    migrate_add_start_time_index(conn)?;

    // 4) Cleanup
    drop_legacy_summary_tables(conn)?;

    Ok(())
}
