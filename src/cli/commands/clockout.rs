use crate::cli::parser::Commands;
use crate::context::AppContext;
use crate::core::progress::ProgressLogic;
use crate::core::session::SessionLogic;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::hours2readable;
use crate::utils::time::format_hhmm;

pub fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Clockout {
        break_pos,
        break_minutes,
        time,
        note,
        id,
    } = cmd
    {
        let session = SessionLogic::clock_out(
            ctx,
            id.as_deref(),
            break_minutes.or(*break_pos),
            time.as_deref(),
            note.clone(),
        )?;

        success(format!(
            "Clocked out [{}] at {}: {} worked (break {}m)",
            session.short_id(),
            session.end.as_ref().map(format_hhmm).unwrap_or_default(),
            hours2readable(session.duration_hours().unwrap_or(0.0), false),
            session.break_minutes
        ));

        let week = ProgressLogic::week_progress(ctx)?;
        info(format!(
            "Week: {} of {} ({} remaining)",
            hours2readable(week.total_hours, false),
            hours2readable(week.goal_hours, false),
            hours2readable(week.remaining_hours, true)
        ));
    }
    Ok(())
}
