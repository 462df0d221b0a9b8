use crate::cli::parser::Commands;
use crate::context::AppContext;
use crate::core::progress::ProgressLogic;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{header, info};
use crate::utils::colors::{RESET, color_for_hours};
use crate::utils::date::named_range;
use crate::utils::hours2readable;

pub fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Range {
        which,
        start,
        end,
        json,
    } = cmd
    {
        let (from, to) = named_range(
            ctx.clock.today(),
            which.as_deref(),
            start.as_deref(),
            end.as_deref(),
        )
        .map_err(AppError::InvalidDate)?;

        let range = ProgressLogic::range_progress(ctx, from, to)?;

        if *json {
            println!("{}", serde_json::to_string_pretty(&range)?);
            return Ok(());
        }

        header(format!(
            "Range {} → {}",
            from.format("%b %-d, %Y"),
            to.format("%b %-d, %Y")
        ));

        println!(
            "Total: {} ({} session(s))",
            hours2readable(range.total_hours, false),
            range.sessions.len()
        );

        if range.days_worked.is_empty() {
            info("No closed sessions in this range.");
            return Ok(());
        }

        println!("\nDaily breakdown:");
        for (date, hours) in &range.days_worked {
            println!(
                "  {}{} {}: {}{}",
                color_for_hours(*hours),
                date.format("%a"),
                date,
                hours2readable(*hours, false),
                RESET
            );
        }
    }
    Ok(())
}
