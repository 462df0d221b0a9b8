//! Session lifecycle: clock-in / clock-out / edit / delete.
//!
//! Two states: Idle (no open session) and Active (exactly one open
//! session). Every transition goes through here; nothing else writes an
//! open session into the ledger.

use crate::context::AppContext;
use crate::db::log::ttlog;
use crate::db::queries::{
    delete_session, get_active_session, get_session_by_id, insert_session, update_session,
};
use crate::errors::{AppError, AppResult};
use crate::models::Session;
use crate::utils::time::{parse_optional_time, parse_time_of_day, resolve_end_time};
use chrono::{DateTime, Days, NaiveTime};
use chrono_tz::Tz;

/// Fields of an `edit`; `None` leaves the stored value untouched.
#[derive(Debug, Default, Clone)]
pub struct SessionEdit {
    pub break_minutes: Option<i32>,
    /// `Some("")` clears the note.
    pub note: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl SessionEdit {
    pub fn is_empty(&self) -> bool {
        self.break_minutes.is_none()
            && self.note.is_none()
            && self.start.is_none()
            && self.end.is_none()
    }
}

pub struct SessionLogic;

fn started_label(s: &Session) -> String {
    s.start.format("%Y-%m-%d %H:%M").to_string()
}

/// Start of a new session: `now`, or the override on today's date.
/// An override later than `now` belongs to the previous day.
fn resolve_start(ctx: &AppContext, t: Option<NaiveTime>) -> DateTime<Tz> {
    let now = ctx.now();
    let Some(t) = t else {
        return now;
    };

    let today = now.date_naive();
    let candidate = ctx.clock.localize(today.and_time(t));
    if candidate <= now {
        return candidate;
    }

    match today.checked_sub_days(Days::new(1)) {
        Some(yesterday) => ctx.clock.localize(yesterday.and_time(t)),
        None => candidate,
    }
}

impl SessionLogic {
    pub fn active(ctx: &AppContext) -> AppResult<Option<Session>> {
        get_active_session(&ctx.pool)
    }

    /// Open a new session. Fails with `AlreadyActive` unless Idle.
    pub fn clock_in(
        ctx: &AppContext,
        note: Option<String>,
        start_override: Option<&str>,
    ) -> AppResult<Session> {
        let t = parse_optional_time(start_override)?;
        Self::open_session(ctx, note, t)
    }

    /// Close the active session at `end_override` (break from the rules of
    /// its start day), then clock in. Returns the closed session, if there
    /// was one, and the new one.
    pub fn force_close_and_clock_in(
        ctx: &AppContext,
        end_override: &str,
        note: Option<String>,
        start_override: Option<&str>,
    ) -> AppResult<(Option<Session>, Session)> {
        // parse everything before touching the ledger
        let end_t = parse_time_of_day(end_override)?;
        let start_t = parse_optional_time(start_override)?;

        let closed = match get_active_session(&ctx.pool)? {
            Some(active) => Some(Self::close(ctx, active, None, Some(end_t), None)?),
            None => None,
        };

        let opened = Self::open_session(ctx, note, start_t)?;
        Ok((closed, opened))
    }

    /// Close the active session.
    ///
    /// `id`, when given, must resolve to the active session. The break
    /// defaults to the rules of the start day; the end defaults to `now`.
    pub fn clock_out(
        ctx: &AppContext,
        id: Option<&str>,
        break_minutes: Option<i32>,
        end_override: Option<&str>,
        note: Option<String>,
    ) -> AppResult<Session> {
        let end_t = parse_optional_time(end_override)?;

        let active = get_active_session(&ctx.pool)?.ok_or(AppError::NoActiveSession)?;

        if let Some(id) = id {
            let target = get_session_by_id(&ctx.pool, id)?;
            if target.id != active.id {
                return Err(AppError::NotActive(target.short_id().to_string()));
            }
        }

        Self::close(ctx, active, break_minutes, end_t, note)
    }

    /// Selective update of any session, active or closed. Does not change
    /// the lifecycle state.
    pub fn edit(ctx: &AppContext, id: &str, changes: SessionEdit) -> AppResult<Session> {
        let start_t = parse_optional_time(changes.start.as_deref())?;
        let end_t = parse_optional_time(changes.end.as_deref())?;

        let mut session = get_session_by_id(&ctx.pool, id)?;
        let mut changed = Vec::new();

        if let Some(b) = changes.break_minutes {
            session.break_minutes = b.max(0);
            changed.push(format!("break={}m", session.break_minutes));
        }

        if let Some(note) = changes.note {
            session.note = Some(note).filter(|n| !n.trim().is_empty());
            changed.push("note".to_string());
        }

        // start override stays on the session's own date
        if let Some(t) = start_t {
            let start = ctx.clock.localize(session.date.and_time(t));
            session.set_start(start);
            changed.push(format!("start={}", started_label(&session)));
        }

        if let Some(t) = end_t {
            let end = resolve_end_time(&ctx.clock, &session.start, t);
            session.end = Some(end);
            changed.push(format!("end={}", end.format("%Y-%m-%d %H:%M")));
        }

        update_session(&ctx.pool, &session)?;
        ttlog(
            &ctx.pool.conn,
            "edit",
            &session.id,
            &format!("Edited session: {}", changed.join(", ")),
        )?;

        Ok(session)
    }

    /// Remove a session outright. Deleting the active one leaves Idle.
    pub fn delete(ctx: &AppContext, id: &str) -> AppResult<Session> {
        let session = get_session_by_id(&ctx.pool, id)?;
        delete_session(&ctx.pool, &session.id)?;

        ttlog(
            &ctx.pool.conn,
            "delete",
            &session.id,
            &format!("Deleted session started {}", started_label(&session)),
        )?;

        Ok(session)
    }

    fn open_session(
        ctx: &AppContext,
        note: Option<String>,
        t: Option<NaiveTime>,
    ) -> AppResult<Session> {
        if let Some(active) = get_active_session(&ctx.pool)? {
            return Err(AppError::AlreadyActive {
                id: active.short_id().to_string(),
                started_at: started_label(&active),
            });
        }

        let start = resolve_start(ctx, t);
        let stored = insert_session(&ctx.pool, &Session::open(start, note))?;

        ttlog(
            &ctx.pool.conn,
            "clockin",
            &stored.id,
            &format!("Clocked in at {}", started_label(&stored)),
        )?;

        Ok(stored)
    }

    fn close(
        ctx: &AppContext,
        mut session: Session,
        break_minutes: Option<i32>,
        end_t: Option<NaiveTime>,
        note: Option<String>,
    ) -> AppResult<Session> {
        let end = match end_t {
            Some(t) => resolve_end_time(&ctx.clock, &session.start, t),
            None => ctx.now(),
        };

        session.end = Some(end);
        session.break_minutes = break_minutes
            .unwrap_or_else(|| ctx.rules.break_minutes_for_day(session.date))
            .max(0);
        if let Some(n) = note.filter(|n| !n.trim().is_empty()) {
            session.note = Some(n);
        }

        update_session(&ctx.pool, &session)?;
        ttlog(
            &ctx.pool.conn,
            "clockout",
            &session.id,
            &format!(
                "Clocked out at {} (break {}m)",
                end.format("%Y-%m-%d %H:%M"),
                session.break_minutes
            ),
        )?;

        Ok(session)
    }
}
