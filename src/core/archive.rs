//! Monthly archival: render a closed month as a Markdown record under the
//! history directory, then compact it out of the live ledger.
//!
//! Ordering: the record is written to a temporary file and renamed onto its
//! final name; rows are deleted only after the rename succeeded, so a crash
//! at any point leaves the ledger as the source of truth.

use crate::config::Config;
use crate::context::AppContext;
use crate::db::log::ttlog;
use crate::db::queries::{
    delete_sessions_in_range, get_active_session, get_sessions_started_in_range,
    oldest_session_date,
};
use crate::errors::{AppError, AppResult};
use crate::models::Session;
use crate::utils::date::{first_of_month, month_title, next_month};
use crate::utils::formatting::{md_cell, truncate_display};
use crate::utils::time::{Clock, format_hhmm};
use chrono::{DateTime, Datelike, Duration, NaiveDate};
use chrono_tz::Tz;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// Max display width of the note column in the session table.
const NOTE_WIDTH: usize = 30;

/// Outcome of an auto-archive walk: the months archived so far and the
/// error that stopped the walk, if any.
#[derive(Debug, Default)]
pub struct AutoArchiveReport {
    pub archived: Vec<String>,
    pub error: Option<AppError>,
}

pub struct ArchiveLogic;

/// `[first day 00:00:00, last day 23:59:59]` of the month, local time.
fn month_bounds(clock: &Clock, first: NaiveDate) -> AppResult<(DateTime<Tz>, DateTime<Tz>)> {
    let next = next_month(first).ok_or_else(|| AppError::InvalidDate(first.to_string()))?;
    let start = clock.day_start(first);
    let end = clock.day_start(next) - Duration::seconds(1);
    Ok((start, end))
}

fn month_first(year: i32, month: u32) -> AppResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::InvalidDate(format!("{year}-{month:02}")))
}

fn render_markdown(first: NaiveDate, sessions: &[Session], weekly_goal: f64, archived_at: &str) -> String {
    let mut total = 0.0;
    let mut days = BTreeSet::new();
    let mut weeks: BTreeMap<u32, f64> = BTreeMap::new();

    for s in sessions {
        if let Some(h) = s.duration_hours() {
            total += h;
            days.insert(s.date);
            *weeks.entry(s.date.iso_week().week()).or_insert(0.0) += h;
        }
    }

    let days_worked = days.len();
    let mut out = String::new();

    out.push_str(&format!("# {}\n\n", month_title(first.year(), first.month())));

    // Summary
    out.push_str("## Summary\n\n");
    out.push_str("| Metric | Value |\n");
    out.push_str("|--------|-------|\n");
    out.push_str(&format!("| Total Hours | {:.2} |\n", total));
    out.push_str(&format!("| Days Worked | {} |\n", days_worked));
    out.push_str(&format!(
        "| Daily Average | {:.2} |\n",
        total / days_worked.max(1) as f64
    ));
    out.push_str(&format!("| Weekly Goal | {:.2} |\n", weekly_goal));
    out.push('\n');

    // Weekly breakdown
    out.push_str("## Weekly Breakdown\n\n");
    out.push_str("| Week | Hours |\n");
    out.push_str("|------|-------|\n");
    for (week, hours) in &weeks {
        out.push_str(&format!("| W{} | {:.2} |\n", week, hours));
    }
    out.push('\n');

    // Sessions
    out.push_str("## Sessions\n\n");
    out.push_str("| Date | Start | End | Hours | Break | Note |\n");
    out.push_str("|------|-------|-----|-------|-------|------|\n");
    for s in sessions {
        let (end, hours) = match (&s.end, s.duration_hours()) {
            (Some(end), Some(h)) => (format_hhmm(end), format!("{:.2}", h)),
            _ => ("active".to_string(), "-".to_string()),
        };
        out.push_str(&format!(
            "| {} | {} | {} | {} | {}m | {} |\n",
            s.date.format("%Y-%m-%d"),
            format_hhmm(&s.start),
            end,
            hours,
            s.break_minutes,
            md_cell(&truncate_display(s.note_str(), NOTE_WIDTH)),
        ));
    }
    out.push('\n');

    out.push_str(&format!("---\n*Archived: {}*\n", archived_at));
    out
}

/// Write `content` next to `path` and rename it into place.
fn write_atomically(path: &Path, content: &str) -> AppResult<()> {
    let tmp = path.with_extension("md.tmp");

    if let Err(e) = fs::write(&tmp, content) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

impl ArchiveLogic {
    pub fn archive_file_name(year: i32, month: u32) -> String {
        format!("{year}-{month:02}.md")
    }

    pub fn archive_path(cfg: &Config, year: i32, month: u32) -> PathBuf {
        cfg.history_path().join(Self::archive_file_name(year, month))
    }

    /// Archive one month. Returns the path of the written record.
    ///
    /// `EmptyMonth` when no session started in the month: nothing is
    /// written and nothing is deleted. With `delete_after`, the month's
    /// closed sessions are removed once the record is in place; an open
    /// session is listed as `active` and kept.
    pub fn archive_month(
        ctx: &AppContext,
        year: i32,
        month: u32,
        delete_after: bool,
    ) -> AppResult<PathBuf> {
        let first = month_first(year, month)?;
        let (start, end) = month_bounds(&ctx.clock, first)?;

        let sessions = get_sessions_started_in_range(&ctx.pool, &start, &end)?;
        if sessions.is_empty() {
            return Err(AppError::EmptyMonth(month_title(year, month)));
        }

        let archived_at = ctx.now().format("%Y-%m-%d %H:%M").to_string();
        let markdown = render_markdown(first, &sessions, ctx.rules.weekly_goal, &archived_at);

        // 1️⃣ durable record first
        fs::create_dir_all(ctx.cfg.history_path())?;
        let path = Self::archive_path(&ctx.cfg, year, month);
        write_atomically(&path, &markdown)?;

        // 2️⃣ then compaction
        let mut deleted = 0;
        if delete_after {
            deleted = delete_sessions_in_range(&ctx.pool, &start, &end)?;
        }

        ttlog(
            &ctx.pool.conn,
            "archive",
            &Self::archive_file_name(year, month),
            &format!(
                "Archived {} sessions to {} ({} removed from ledger)",
                sessions.len(),
                path.display(),
                deleted
            ),
        )?;

        Ok(path)
    }

    /// Archive (with deletion) every complete past month without a record.
    pub fn auto_archive_past_months(ctx: &AppContext) -> AutoArchiveReport {
        Self::auto_archive_until_cancelled(ctx, &AtomicBool::new(false))
    }

    /// Same walk, checking `cancel` between months.
    ///
    /// The walk stops before the current month, or before the month of the
    /// open session if that is earlier: a month holding an open session is
    /// not closed yet.
    pub fn auto_archive_until_cancelled(ctx: &AppContext, cancel: &AtomicBool) -> AutoArchiveReport {
        let mut report = AutoArchiveReport::default();

        let (oldest, frontier) = match Self::walk_bounds(ctx) {
            Ok(Some(bounds)) => bounds,
            Ok(None) => return report,
            Err(e) => {
                report.error = Some(e);
                return report;
            }
        };

        let mut month = first_of_month(oldest);
        while month < frontier {
            if cancel.load(Ordering::Relaxed) {
                break;
            }

            let (year, m) = (month.year(), month.month());

            if !Self::archive_path(&ctx.cfg, year, m).exists() {
                match Self::archive_month(ctx, year, m, true) {
                    Ok(_) => report.archived.push(Self::archive_file_name(year, m)),
                    Err(e) if e.is_empty_month() => {}
                    Err(e) => {
                        report.error = Some(e);
                        break;
                    }
                }
            }

            month = match next_month(month) {
                Some(next) => next,
                None => break,
            };
        }

        report
    }

    /// (oldest session date, first month not eligible), or `None` on an
    /// empty ledger.
    fn walk_bounds(ctx: &AppContext) -> AppResult<Option<(NaiveDate, NaiveDate)>> {
        let Some(oldest) = oldest_session_date(&ctx.pool)? else {
            return Ok(None);
        };

        let mut frontier = first_of_month(ctx.clock.today());
        if let Some(active) = get_active_session(&ctx.pool)? {
            frontier = frontier.min(first_of_month(active.date));
        }

        Ok(Some((oldest, frontier)))
    }

    /// Archived record names (`YYYY-MM.md`), oldest first.
    pub fn list_archives(cfg: &Config) -> AppResult<Vec<String>> {
        let entries = match fs::read_dir(cfg.history_path()) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if name.ends_with(".md") {
                names.push(name);
            }
        }

        names.sort();
        Ok(names)
    }

    pub fn read_archive(cfg: &Config, year: i32, month: u32) -> AppResult<String> {
        let path = Self::archive_path(cfg, year, month);
        fs::read_to_string(&path)
            .map_err(|_| AppError::ArchiveNotFound(Self::archive_file_name(year, month)))
    }

    /// Title and summary rows of the last `months_back` records.
    /// Empty string when nothing has been archived.
    pub fn history_context(cfg: &Config, months_back: usize) -> AppResult<String> {
        let archives = Self::list_archives(cfg)?;
        if archives.is_empty() {
            return Ok(String::new());
        }

        let start = archives.len().saturating_sub(months_back);
        let mut out = String::from("HISTORICAL DATA:\n");

        for name in &archives[start..] {
            let Ok(content) = fs::read_to_string(cfg.history_path().join(name)) else {
                continue;
            };

            let mut in_summary = false;
            for line in content.lines() {
                if let Some(title) = line.strip_prefix("# ") {
                    out.push_str(&format!("\n{}:\n", title));
                }
                if line.starts_with("## Summary") {
                    in_summary = true;
                    continue;
                }
                if line.starts_with("## ") {
                    in_summary = false;
                }
                if in_summary
                    && line.starts_with("| ")
                    && !line.starts_with("| Metric")
                    && !line.starts_with("|--")
                {
                    out.push_str(&format!("  {}\n", line));
                }
            }
        }

        Ok(out)
    }
}
