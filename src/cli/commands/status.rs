use crate::cli::parser::Commands;
use crate::context::AppContext;
use crate::core::progress::ProgressLogic;
use crate::core::session::SessionLogic;
use crate::errors::AppResult;
use crate::models::{DayProgress, Session, WeekProgress};
use crate::ui::messages::header;
use crate::utils::colors::{RESET, color_for_remaining};
use crate::utils::hours2readable;
use crate::utils::time::format_hhmm;
use serde::Serialize;

/// Snapshot offered to scripts (`status --json`).
#[derive(Serialize)]
struct StatusSnapshot<'a> {
    now: String,
    active: Option<&'a Session>,
    active_elapsed_hours: Option<f64>,
    today: &'a DayProgress,
    week: &'a WeekProgress,
    remaining_work_days: u32,
    required_daily_hours: f64,
}

pub fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Status { json } = cmd {
        let now = ctx.now();
        let today = now.date_naive();

        let active = SessionLogic::active(ctx)?;
        let day = ProgressLogic::day_progress(ctx)?;
        let week = ProgressLogic::week_progress(ctx)?;

        let remaining_days = ctx.rules.remaining_work_days(today);
        let required = ctx
            .rules
            .required_daily_hours(week.total_hours, remaining_days);
        let elapsed = active.as_ref().map(|s| s.elapsed_hours(&now));

        if *json {
            let snapshot = StatusSnapshot {
                now: now.to_rfc3339(),
                active: active.as_ref(),
                active_elapsed_hours: elapsed,
                today: &day,
                week: &week,
                remaining_work_days: remaining_days,
                required_daily_hours: required,
            };
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            return Ok(());
        }

        header(format!("{} ({})", today, today.format("%A")));

        match &active {
            Some(s) => println!(
                "⏱️  Active session [{}] since {} {} ({} elapsed){}",
                s.short_id(),
                s.date,
                format_hhmm(&s.start),
                hours2readable(elapsed.unwrap_or(0.0), false),
                s.note
                    .as_ref()
                    .map(|n| format!(" \"{}\"", n))
                    .unwrap_or_default()
            ),
            None => println!("💤 No active session."),
        }

        println!("📅 Today     : {}", hours2readable(day.total_hours, false));
        println!(
            "📆 This week: {} / {}",
            hours2readable(week.total_hours, false),
            hours2readable(week.goal_hours, false)
        );
        println!(
            "🎯 Remaining: {}{}{}",
            color_for_remaining(week.remaining_hours),
            hours2readable(week.remaining_hours, true),
            RESET
        );

        if remaining_days > 0 {
            println!(
                "📌 {} work day(s) left, {} per day needed",
                remaining_days,
                hours2readable(required, false)
            );
        }
    }
    Ok(())
}
