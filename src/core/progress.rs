//! Day / week / month roll-ups over the session ledger.
//!
//! Sessions are fetched by interval intersection, then attributed to the
//! local date of their start: a session crossing midnight counts entirely
//! on the day it began. Open sessions never contribute to a total.

use crate::context::AppContext;
use crate::db::queries::get_sessions_in_range;
use crate::errors::{AppError, AppResult};
use crate::models::{DayProgress, MonthProgress, RangeProgress, Session, WeekProgress};
use crate::utils::date::{first_of_month, week_start};
use chrono::{Datelike, Days, NaiveDate};
use std::collections::BTreeMap;

pub struct ProgressLogic;

/// Closed-session hours per attributed date, restricted to `[from, to]`.
fn hours_by_date(sessions: &[Session], from: NaiveDate, to: NaiveDate) -> BTreeMap<NaiveDate, f64> {
    let mut days: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for s in sessions {
        if s.date < from || s.date > to {
            continue;
        }
        if let Some(h) = s.duration_hours() {
            *days.entry(s.date).or_insert(0.0) += h;
        }
    }
    days
}

fn nonzero_days(days: &BTreeMap<NaiveDate, f64>) -> usize {
    days.values().filter(|h| **h != 0.0).count()
}

impl ProgressLogic {
    /// Progress of the local day containing `now`.
    pub fn day_progress(ctx: &AppContext) -> AppResult<DayProgress> {
        let today = ctx.clock.today();
        let start = ctx.clock.day_start(today);
        let end = ctx.clock.day_end(today);

        let sessions = get_sessions_in_range(&ctx.pool, &start, &end)?;
        let total_hours = hours_by_date(&sessions, today, today).values().sum();
        let current_session_id = sessions
            .iter()
            .find(|s| s.is_active())
            .map(|s| s.id.clone());

        Ok(DayProgress {
            date: today,
            sessions,
            total_hours,
            current_session_id,
        })
    }

    pub fn week_progress(ctx: &AppContext) -> AppResult<WeekProgress> {
        Self::week_progress_for_date(ctx, ctx.clock.today())
    }

    /// The week before the current one (Monday shifted back 7 days).
    pub fn last_week_progress(ctx: &AppContext) -> AppResult<WeekProgress> {
        let monday = week_start(ctx.clock.today());
        Self::week_progress_for_date(ctx, monday - Days::new(7))
    }

    /// Monday 00:00:00 through Sunday 23:59:59 of the week containing `date`.
    pub fn week_progress_for_date(ctx: &AppContext, date: NaiveDate) -> AppResult<WeekProgress> {
        let monday = week_start(date);
        let sunday = monday + Days::new(6);

        let start = ctx.clock.day_start(monday);
        let end = ctx.clock.day_end(sunday);

        let sessions = get_sessions_in_range(&ctx.pool, &start, &end)?;
        let days_worked = hours_by_date(&sessions, monday, sunday);
        let total_hours: f64 = days_worked.values().sum();
        let goal_hours = ctx.rules.weekly_goal;

        Ok(WeekProgress {
            week_start: monday,
            week_end: sunday,
            total_hours,
            goal_hours,
            days_worked_count: nonzero_days(&days_worked),
            days_worked,
            remaining_hours: goal_hours - total_hours,
            sessions,
        })
    }

    /// First of the month 00:00 through `now`. A month in progress is
    /// partial: the average divides by the current day of month.
    pub fn month_progress(ctx: &AppContext) -> AppResult<MonthProgress> {
        let now = ctx.now();
        let today = now.date_naive();
        let first = first_of_month(today);

        let start = ctx.clock.day_start(first);
        let sessions = get_sessions_in_range(&ctx.pool, &start, &now)?;
        let days = hours_by_date(&sessions, first, today);

        let mut week_hours: BTreeMap<u32, f64> = BTreeMap::new();
        for (date, h) in &days {
            *week_hours.entry(date.iso_week().week()).or_insert(0.0) += h;
        }

        let total_hours: f64 = days.values().sum();

        Ok(MonthProgress {
            month: first,
            through: today,
            total_hours,
            daily_average: total_hours / today.day() as f64,
            week_count: week_hours.len(),
            week_hours,
            days_worked_count: nonzero_days(&days),
        })
    }

    /// `from` 00:00:00 through `to` 23:59:59, local. Same attribution as
    /// the week view: a session belongs to the range if it started inside.
    pub fn range_progress(
        ctx: &AppContext,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<RangeProgress> {
        if to < from {
            return Err(AppError::InvalidDate(format!("{to} precedes {from}")));
        }

        let start = ctx.clock.day_start(from);
        let end = ctx.clock.day_end(to);

        let sessions: Vec<Session> = get_sessions_in_range(&ctx.pool, &start, &end)?
            .into_iter()
            .filter(|s| s.date >= from && s.date <= to)
            .collect();
        let days_worked = hours_by_date(&sessions, from, to);

        Ok(RangeProgress {
            from,
            to,
            total_hours: days_worked.values().sum(),
            days_worked_count: nonzero_days(&days_worked),
            days_worked,
            sessions,
        })
    }
}
