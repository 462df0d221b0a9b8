use crate::cli::parser::Commands;
use crate::context::AppContext;
use crate::core::progress::ProgressLogic;
use crate::errors::AppResult;
use crate::ui::messages::header;
use crate::utils::date::month_title;
use crate::utils::hours2readable;
use chrono::Datelike;

pub fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Month { json } = cmd {
        let month = ProgressLogic::month_progress(ctx)?;

        if *json {
            println!("{}", serde_json::to_string_pretty(&month)?);
            return Ok(());
        }

        header(format!(
            "{} (through {})",
            month_title(month.month.year(), month.month.month()),
            month.through
        ));

        for (week, hours) in &month.week_hours {
            println!("W{:<3} {}", week, hours2readable(*hours, false));
        }
        if !month.week_hours.is_empty() {
            println!("{}", ctx.cfg.separator_char.repeat(28));
        }

        println!("Total        : {}", hours2readable(month.total_hours, false));
        println!(
            "Daily average: {}",
            hours2readable(month.daily_average, false)
        );
        println!("Days worked  : {}", month.days_worked_count);
    }
    Ok(())
}
