use crate::db::queries::SHORT_ID_LEN;
use crate::utils::time::{hours_between, serialize_local, serialize_local_opt};
use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use serde::Serialize;

/// One contiguous tracked work interval.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: String, // ⇔ work_sessions.id (UUID v4, assigned on insert)
    pub date: NaiveDate, // ⇔ work_sessions.date, local date of `start`
    #[serde(serialize_with = "serialize_local")]
    pub start: DateTime<Tz>, // ⇔ work_sessions.start_time (UTC text)
    #[serde(serialize_with = "serialize_local_opt")]
    pub end: Option<DateTime<Tz>>, // ⇔ work_sessions.end_time, NULL while active
    pub break_minutes: i32,
    pub note: Option<String>,
}

impl Session {
    /// New open session starting at `start`. The id is assigned by the ledger.
    pub fn open(start: DateTime<Tz>, note: Option<String>) -> Self {
        Self {
            id: String::new(),
            date: start.date_naive(),
            start,
            end: None,
            break_minutes: 0,
            note: note.filter(|n| !n.trim().is_empty()),
        }
    }

    pub fn is_active(&self) -> bool {
        self.end.is_none()
    }

    /// Move the start; the attributed date always follows it.
    pub fn set_start(&mut self, start: DateTime<Tz>) {
        self.date = start.date_naive();
        self.start = start;
    }

    /// `(end - start) - break/60` in hours. Not clamped: inconsistent
    /// inputs may yield a negative value. `None` while active.
    pub fn duration_hours(&self) -> Option<f64> {
        self.end
            .as_ref()
            .map(|end| hours_between(&self.start, end) - self.break_minutes as f64 / 60.0)
    }

    /// Elapsed wall-clock hours of an open session (display only).
    pub fn elapsed_hours(&self, now: &DateTime<Tz>) -> f64 {
        hours_between(&self.start, now)
    }

    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(SHORT_ID_LEN) {
            Some((idx, _)) => &self.id[..idx],
            None => &self.id,
        }
    }

    pub fn note_str(&self) -> &str {
        self.note.as_deref().unwrap_or("")
    }
}
