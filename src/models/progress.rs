//! Computed-on-read progress views. Never persisted; rebuilt on every call
//! and not valid after further ledger mutation.

use super::session::Session;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct DayProgress {
    pub date: NaiveDate,
    pub sessions: Vec<Session>,
    pub total_hours: f64,
    /// Id of the open session, if one overlaps the day. It adds 0 to the total.
    pub current_session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekProgress {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub total_hours: f64,
    pub goal_hours: f64,
    pub days_worked: BTreeMap<NaiveDate, f64>,
    pub days_worked_count: usize,
    /// goal − total; negative means overtime
    pub remaining_hours: f64,
    pub sessions: Vec<Session>,
}

impl WeekProgress {
    pub fn hours_on(&self, date: &NaiveDate) -> f64 {
        self.days_worked.get(date).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthProgress {
    pub month: NaiveDate,
    pub through: NaiveDate,
    pub total_hours: f64,
    pub daily_average: f64,
    /// ISO week number → hours
    pub week_hours: BTreeMap<u32, f64>,
    pub week_count: usize,
    pub days_worked_count: usize,
}

/// Any inclusive date range (`range` command).
#[derive(Debug, Clone, Serialize)]
pub struct RangeProgress {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub total_hours: f64,
    pub days_worked: BTreeMap<NaiveDate, f64>,
    pub days_worked_count: usize,
    /// Sessions attributed to a date inside the range, open ones included.
    pub sessions: Vec<Session>,
}
