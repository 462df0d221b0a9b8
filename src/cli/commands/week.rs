use crate::cli::parser::Commands;
use crate::context::AppContext;
use crate::core::progress::ProgressLogic;
use crate::errors::{AppError, AppResult};
use crate::models::WeekProgress;
use crate::ui::messages::header;
use crate::utils::colors::{RESET, color_for_hours, color_for_remaining};
use crate::utils::date::{parse_date, week_start};
use crate::utils::hours2readable;
use chrono::{Datelike, Days};

fn resolve_week(ctx: &AppContext, which: Option<&str>) -> AppResult<WeekProgress> {
    match which.map(str::trim) {
        None => ProgressLogic::week_progress(ctx),
        Some(w) if w.eq_ignore_ascii_case("last") => ProgressLogic::last_week_progress(ctx),
        Some(w) if w.eq_ignore_ascii_case("this") => ProgressLogic::week_progress(ctx),
        Some(w) => {
            let date = parse_date(w).ok_or_else(|| AppError::InvalidDate(w.to_string()))?;
            ProgressLogic::week_progress_for_date(ctx, date)
        }
    }
}

pub fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Week { which, json } = cmd {
        let week = resolve_week(ctx, which.as_deref())?;

        if *json {
            println!("{}", serde_json::to_string_pretty(&week)?);
            return Ok(());
        }

        header(format!(
            "Week {} ({} → {})",
            week.week_start.iso_week().week(),
            week.week_start,
            week.week_end
        ));

        for offset in 0..7 {
            let date = week.week_start + Days::new(offset);
            let hours = week.hours_on(&date);
            println!(
                "{}{} {}  {}{}",
                color_for_hours(hours),
                date.format("%a"),
                date,
                hours2readable(hours, false),
                RESET
            );
        }

        println!("{}", ctx.cfg.separator_char.repeat(28));
        println!(
            "Total      : {} / {}",
            hours2readable(week.total_hours, false),
            hours2readable(week.goal_hours, false)
        );
        println!(
            "Remaining  : {}{}{}",
            color_for_remaining(week.remaining_hours),
            hours2readable(week.remaining_hours, true),
            RESET
        );
        println!("Days worked: {}", week.days_worked_count);

        // goal math only for the week in progress
        let today = ctx.clock.today();
        if week_start(today) == week.week_start {
            let days = ctx.rules.remaining_work_days(today);
            if days > 0 {
                println!(
                    "Needed/day : {} ({} work day(s) left)",
                    hours2readable(ctx.rules.required_daily_hours(week.total_hours, days), false),
                    days
                );
            }
        }
    }
    Ok(())
}
