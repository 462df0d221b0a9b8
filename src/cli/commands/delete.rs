use crate::cli::parser::Commands;
use crate::context::AppContext;
use crate::core::session::SessionLogic;
use crate::db::queries::get_session_by_id;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use crate::utils::time::format_hhmm;
use std::io::{self, Write};

fn confirm(prompt: &str) -> AppResult<bool> {
    print!("{prompt} [y/N]: ");
    io::stdout().flush().ok();

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    let ans = answer.trim().to_ascii_lowercase();
    Ok(ans == "y" || ans == "yes")
}

pub fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Delete { id, force } = cmd {
        let session = get_session_by_id(&ctx.pool, id)?;

        if !*force {
            warning(format!(
                "About to delete session [{}] of {} started at {}{}.",
                session.short_id(),
                session.date,
                format_hhmm(&session.start),
                if session.is_active() { " (ACTIVE)" } else { "" }
            ));
            if !confirm("Delete?")? {
                info("Deletion cancelled.");
                return Ok(());
            }
        }

        let deleted = SessionLogic::delete(ctx, &session.id)?;
        success(format!("Deleted session [{}]", deleted.short_id()));
    }
    Ok(())
}
