//! Work rules: break policy, work days and goal math.
//! Pure functions over a calendar date, no I/O.

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate, Weekday};

pub const WORK_DAYS_PER_WEEK: u32 = 5;

#[derive(Debug, Clone)]
pub struct WorkRules {
    pub weekly_goal: f64,
    pub default_break_minutes: i32,
    pub reduced_break_day: Weekday,
    pub reduced_break_minutes: i32,
}

impl Default for WorkRules {
    fn default() -> Self {
        Self {
            weekly_goal: 38.5,
            default_break_minutes: 30,
            reduced_break_day: Weekday::Fri,
            reduced_break_minutes: 0,
        }
    }
}

impl WorkRules {
    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        let defaults = Self::default();

        let reduced_break_day = cfg.reduced_break_day.trim().parse::<Weekday>().map_err(|_| {
            AppError::Config(format!(
                "Invalid reduced_break_day '{}' (use Mon..Sun)",
                cfg.reduced_break_day
            ))
        })?;

        Ok(Self {
            // a zero/negative goal makes every remaining figure meaningless
            weekly_goal: if cfg.weekly_goal > 0.0 {
                cfg.weekly_goal
            } else {
                defaults.weekly_goal
            },
            default_break_minutes: cfg.default_break_minutes.max(0),
            reduced_break_day,
            reduced_break_minutes: cfg.reduced_break_minutes.max(0),
        })
    }

    /// Break minutes applied when the caller does not pass one explicitly.
    pub fn break_minutes_for_day(&self, date: NaiveDate) -> i32 {
        if date.weekday() == self.reduced_break_day {
            self.reduced_break_minutes
        } else {
            self.default_break_minutes
        }
    }

    /// Monday to Friday.
    pub fn is_work_day(&self, date: NaiveDate) -> bool {
        date.weekday().number_from_monday() <= WORK_DAYS_PER_WEEK
    }

    /// Work days left in the week, today included. 0 on weekends.
    pub fn remaining_work_days(&self, date: NaiveDate) -> u32 {
        if !self.is_work_day(date) {
            return 0;
        }
        WORK_DAYS_PER_WEEK - date.weekday().number_from_monday() + 1
    }

    /// Hours per remaining day still needed to reach the weekly goal.
    pub fn required_daily_hours(&self, worked: f64, remaining_days: u32) -> f64 {
        if remaining_days == 0 {
            return 0.0;
        }
        let remaining = self.weekly_goal - worked;
        if remaining <= 0.0 {
            return 0.0;
        }
        remaining / remaining_days as f64
    }

    pub fn daily_target_hours(&self) -> f64 {
        self.weekly_goal / WORK_DAYS_PER_WEEK as f64
    }
}
