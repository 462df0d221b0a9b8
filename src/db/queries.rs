//! Session ledger: the only place that reads or writes `work_sessions`.
//!
//! Every instant crosses this boundary as UTC text and is decoded back into
//! the configured zone on the way out, so range queries and date bucketing
//! do not depend on the host process' local zone.

use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::session::Session;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use rusqlite::{OptionalExtension, Result, Row, params};

/// Length of the short-form identifier shown by the CLI.
pub const SHORT_ID_LEN: usize = 8;

/// Fixed-width UTC format: lexicographic order == chronological order.
const TS_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

const SELECT_SESSION: &str =
    "SELECT id, date, start_time, end_time, break_minutes, note FROM work_sessions";

pub fn to_db_ts<T: TimeZone>(dt: &DateTime<T>) -> String {
    dt.with_timezone(&Utc).format(TS_FORMAT).to_string()
}

fn from_db_ts(raw: &str, pool: &DbPool, col: usize) -> Result<DateTime<Tz>> {
    let naive = NaiveDateTime::parse_from_str(raw, TS_FORMAT).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            col,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(raw.to_string())),
        )
    })?;
    Ok(pool.clock.decode_utc(naive))
}

pub fn map_row(row: &Row, pool: &DbPool) -> Result<Session> {
    let start_raw: String = row.get("start_time")?;
    let end_raw: Option<String> = row.get("end_time")?;

    let start = from_db_ts(&start_raw, pool, 2)?;
    let end = match end_raw {
        Some(raw) => Some(from_db_ts(&raw, pool, 3)?),
        None => None,
    };

    Ok(Session {
        id: row.get("id")?,
        // `date` is a projection of start_time, recomputed in the active zone
        date: start.date_naive(),
        start,
        end,
        break_minutes: row.get("break_minutes")?,
        note: row.get("note")?,
    })
}

fn query_sessions(
    pool: &DbPool,
    sql: &str,
    args: &[&dyn rusqlite::ToSql],
) -> AppResult<Vec<Session>> {
    let mut stmt = pool.conn.prepare(sql)?;
    let rows = stmt.query_map(args, |row| map_row(row, pool))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Insert a session. Assigns a UUID when `id` is empty and derives `date`
/// from `start`. Returns the stored record.
pub fn insert_session(pool: &DbPool, session: &Session) -> AppResult<Session> {
    let mut stored = session.clone();
    if stored.id.is_empty() {
        stored.id = uuid::Uuid::new_v4().to_string();
    }
    stored.date = stored.start.date_naive();

    pool.conn.execute(
        "INSERT INTO work_sessions (id, date, start_time, end_time, break_minutes, note)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            stored.id,
            stored.date.format("%Y-%m-%d").to_string(),
            to_db_ts(&stored.start),
            stored.end.as_ref().map(to_db_ts),
            stored.break_minutes,
            stored.note,
        ],
    )?;

    Ok(stored)
}

/// Full replace of date/start/end/break/note by id.
pub fn update_session(pool: &DbPool, session: &Session) -> AppResult<()> {
    let changed = pool.conn.execute(
        "UPDATE work_sessions
         SET date = ?1, start_time = ?2, end_time = ?3,
             break_minutes = ?4, note = ?5
         WHERE id = ?6",
        params![
            session.start.date_naive().format("%Y-%m-%d").to_string(),
            to_db_ts(&session.start),
            session.end.as_ref().map(to_db_ts),
            session.break_minutes,
            session.note,
            session.id,
        ],
    )?;

    if changed == 0 {
        return Err(AppError::NotFound(session.id.clone()));
    }
    Ok(())
}

/// Resolve a full or short-form identifier.
///
/// - exact match wins;
/// - an input of exactly `SHORT_ID_LEN` characters is a short form and is
///   resolved by prefix: one match → that session, several → `Ambiguous`;
/// - anything else → `NotFound`. A longer id that missed the exact lookup
///   is never cut down to its prefix.
pub fn get_session_by_id(pool: &DbPool, id: &str) -> AppResult<Session> {
    let id = id.trim();

    let exact = pool
        .conn
        .query_row(
            &format!("{SELECT_SESSION} WHERE id = ?1"),
            [id],
            |row| map_row(row, pool),
        )
        .optional()?;

    if let Some(s) = exact {
        return Ok(s);
    }

    if id.chars().count() != SHORT_ID_LEN {
        return Err(AppError::NotFound(id.to_string()));
    }

    let prefix = id.to_string();

    // substr() instead of LIKE: ids must not be read as patterns
    let mut matches = query_sessions(
        pool,
        &format!(
            "{SELECT_SESSION} WHERE substr(id, 1, length(?1)) = ?1 ORDER BY start_time ASC"
        ),
        &[&prefix],
    )?;

    match matches.len() {
        0 => Err(AppError::NotFound(id.to_string())),
        1 => Ok(matches.remove(0)),
        count => Err(AppError::Ambiguous { prefix, count }),
    }
}

/// The session with no end time, if any.
pub fn get_active_session(pool: &DbPool) -> AppResult<Option<Session>> {
    let active = pool
        .conn
        .query_row(
            &format!(
                "{SELECT_SESSION} WHERE end_time IS NULL ORDER BY start_time DESC LIMIT 1"
            ),
            [],
            |row| map_row(row, pool),
        )
        .optional()?;
    Ok(active)
}

/// Sessions whose interval intersects `[start, end]` (inclusive), ordered by
/// start. An active session is open-ended.
pub fn get_sessions_in_range<T: TimeZone>(
    pool: &DbPool,
    start: &DateTime<T>,
    end: &DateTime<T>,
) -> AppResult<Vec<Session>> {
    query_sessions(
        pool,
        &format!(
            "{SELECT_SESSION}
             WHERE start_time <= ?2 AND (end_time IS NULL OR end_time >= ?1)
             ORDER BY start_time ASC"
        ),
        &[&to_db_ts(start), &to_db_ts(end)],
    )
}

/// Sessions whose start lies in `[start, end]` (inclusive), ordered by start.
pub fn get_sessions_started_in_range<T: TimeZone>(
    pool: &DbPool,
    start: &DateTime<T>,
    end: &DateTime<T>,
) -> AppResult<Vec<Session>> {
    query_sessions(
        pool,
        &format!(
            "{SELECT_SESSION}
             WHERE start_time >= ?1 AND start_time <= ?2
             ORDER BY start_time ASC"
        ),
        &[&to_db_ts(start), &to_db_ts(end)],
    )
}

pub fn delete_session(pool: &DbPool, id: &str) -> AppResult<()> {
    let deleted = pool
        .conn
        .execute("DELETE FROM work_sessions WHERE id = ?1", [id])?;
    if deleted == 0 {
        return Err(AppError::NotFound(id.to_string()));
    }
    Ok(())
}

/// Delete the closed sessions whose start lies in `[start, end]`.
/// The active session is never removed by a range delete.
pub fn delete_sessions_in_range<T: TimeZone>(
    pool: &DbPool,
    start: &DateTime<T>,
    end: &DateTime<T>,
) -> AppResult<usize> {
    let deleted = pool.conn.execute(
        "DELETE FROM work_sessions
         WHERE start_time >= ?1 AND start_time <= ?2 AND end_time IS NOT NULL",
        params![to_db_ts(start), to_db_ts(end)],
    )?;
    Ok(deleted)
}

/// Local calendar date of the earliest start, or `None` on an empty ledger.
pub fn oldest_session_date(pool: &DbPool) -> AppResult<Option<NaiveDate>> {
    let raw: Option<String> =
        pool.conn
            .query_row("SELECT MIN(start_time) FROM work_sessions", [], |row| {
                row.get(0)
            })?;

    match raw {
        Some(r) => Ok(Some(from_db_ts(&r, pool, 0)?.date_naive())),
        None => Ok(None),
    }
}

pub fn count_sessions(pool: &DbPool) -> AppResult<i64> {
    let count = pool
        .conn
        .query_row("SELECT COUNT(*) FROM work_sessions", [], |row| row.get(0))?;
    Ok(count)
}
