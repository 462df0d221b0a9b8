use crate::cli::parser::Commands;
use crate::context::AppContext;
use crate::core::session::{SessionEdit, SessionLogic};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use crate::utils::hours2readable;
use crate::utils::time::format_hhmm;

pub fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Edit {
        id,
        break_minutes,
        note,
        start,
        end,
    } = cmd
    {
        let changes = SessionEdit {
            break_minutes: *break_minutes,
            note: note.clone(),
            start: start.clone(),
            end: end.clone(),
        };

        if changes.is_empty() {
            warning("Nothing to edit: use --break, --note, --start or --end.");
            return Ok(());
        }

        // senza id si modifica la sessione attiva
        let target = match id {
            Some(id) => id.clone(),
            None => SessionLogic::active(ctx)?
                .ok_or(AppError::NoActiveSession)?
                .id,
        };

        let s = SessionLogic::edit(ctx, &target, changes)?;

        let end_label = s
            .end
            .as_ref()
            .map(format_hhmm)
            .unwrap_or_else(|| "active".to_string());
        let hours = s
            .duration_hours()
            .map(|h| hours2readable(h, false))
            .unwrap_or_else(|| "-".to_string());

        success(format!(
            "Session [{}] updated: {} {} → {}, break {}m, {}",
            s.short_id(),
            s.date,
            format_hhmm(&s.start),
            end_label,
            s.break_minutes,
            hours
        ));
    }
    Ok(())
}
