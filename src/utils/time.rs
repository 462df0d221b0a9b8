//! Time utilities: the clock provider, HH:MM parsing, and UTC <-> local
//! conversions shared by every component that needs `now()`.

use crate::errors::{AppError, AppResult};
use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc,
};
use chrono_tz::Tz;
use serde::Serializer;

/// Accepted formats for time-of-day overrides (`-t 8:45`, `--end 17:30:00`).
const TIME_FORMATS: [&str; 2] = ["%H:%M", "%H:%M:%S"];

/// Accepted formats for the hidden `--now` override.
const NOW_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

/// Single source of "current time + zone".
///
/// Built once at the entry point and handed to every component, so date
/// bucketing never depends on the host process' local zone.
#[derive(Debug, Clone)]
pub struct Clock {
    tz: Tz,
    fixed: Option<NaiveDateTime>,
}

impl Clock {
    pub fn new(tz: Tz) -> Self {
        Self { tz, fixed: None }
    }

    /// A clock frozen at the given local wall time (tests, `--now`).
    pub fn fixed(tz: Tz, at: NaiveDateTime) -> Self {
        Self {
            tz,
            fixed: Some(at),
        }
    }

    /// Current instant in the configured zone, truncated to whole seconds
    /// (the ledger stores seconds only).
    pub fn now(&self) -> DateTime<Tz> {
        let now = match self.fixed {
            Some(at) => self.localize(at),
            None => Utc::now().with_timezone(&self.tz),
        };
        now.with_nanosecond(0).unwrap_or(now)
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Resolve a local wall time in the configured zone.
    ///
    /// Ambiguous times (DST fall-back) take the earlier instant; times that
    /// do not exist (DST spring-forward gap) are shifted one hour later.
    pub fn localize(&self, naive: NaiveDateTime) -> DateTime<Tz> {
        match self.tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => dt,
            LocalResult::Ambiguous(earliest, _) => earliest,
            LocalResult::None => self
                .tz
                .from_local_datetime(&(naive + Duration::hours(1)))
                .earliest()
                .unwrap_or_else(|| self.tz.from_utc_datetime(&naive)),
        }
    }

    /// 00:00:00 local of the given day.
    pub fn day_start(&self, date: NaiveDate) -> DateTime<Tz> {
        self.localize(date.and_time(NaiveTime::MIN))
    }

    /// 23:59:59 local of the given day.
    pub fn day_end(&self, date: NaiveDate) -> DateTime<Tz> {
        let end = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
        self.localize(date.and_time(end))
    }

    /// Convert a stored UTC instant back into the configured zone.
    pub fn decode_utc(&self, utc: NaiveDateTime) -> DateTime<Tz> {
        Utc.from_utc_datetime(&utc).with_timezone(&self.tz)
    }
}

/// Parse a time-of-day override such as `08:45`, `8:45` or `17:30:15`.
pub fn parse_time_of_day(s: &str) -> AppResult<NaiveTime> {
    let trimmed = s.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| AppError::InvalidTime(s.to_string()))
}

pub fn parse_optional_time(input: Option<&str>) -> AppResult<Option<NaiveTime>> {
    input.map(parse_time_of_day).transpose()
}

/// Parse the hidden `--now` value (`YYYY-MM-DDTHH:MM[:SS]`).
pub fn parse_now(s: &str) -> AppResult<NaiveDateTime> {
    NOW_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s.trim(), fmt).ok())
        .ok_or_else(|| AppError::InvalidDate(s.to_string()))
}

/// Resolve an end-time override onto the session's start date, rolling
/// forward 24h when the time of day precedes the start.
pub fn resolve_end_time(clock: &Clock, start: &DateTime<Tz>, t: NaiveTime) -> DateTime<Tz> {
    let candidate = clock.localize(start.date_naive().and_time(t));
    if candidate < *start {
        candidate + Duration::hours(24)
    } else {
        candidate
    }
}

/// Hours between two instants, as a float.
pub fn hours_between(start: &DateTime<Tz>, end: &DateTime<Tz>) -> f64 {
    (*end - *start).num_seconds() as f64 / 3600.0
}

pub fn format_hhmm(dt: &DateTime<Tz>) -> String {
    dt.format("%H:%M").to_string()
}

pub fn serialize_local<S: Serializer>(dt: &DateTime<Tz>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&dt.to_rfc3339())
}

pub fn serialize_local_opt<S: Serializer>(
    dt: &Option<DateTime<Tz>>,
    s: S,
) -> Result<S::Ok, S::Error> {
    match dt {
        Some(d) => s.serialize_some(&d.to_rfc3339()),
        None => s.serialize_none(),
    }
}
