use crate::cli::parser::Commands;
use crate::context::AppContext;
use crate::core::session::SessionLogic;
use crate::errors::AppResult;
use crate::models::Session;
use crate::ui::messages::{info, success};
use crate::utils::hours2readable;
use crate::utils::time::format_hhmm;

fn describe(s: &Session) -> String {
    let note = match &s.note {
        Some(n) => format!(" \"{}\"", n),
        None => String::new(),
    };
    format!(
        "{} {} [{}]{}",
        s.date,
        format_hhmm(&s.start),
        s.short_id(),
        note
    )
}

pub fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Clockin {
        note,
        time,
        close_at,
    } = cmd
    {
        let session = match close_at {
            Some(end) => {
                let (closed, opened) = SessionLogic::force_close_and_clock_in(
                    ctx,
                    end,
                    note.clone(),
                    time.as_deref(),
                )?;

                if let Some(c) = closed {
                    info(format!(
                        "Closed session [{}] at {} ({} worked)",
                        c.short_id(),
                        c.end.as_ref().map(format_hhmm).unwrap_or_default(),
                        hours2readable(c.duration_hours().unwrap_or(0.0), false)
                    ));
                }
                opened
            }
            None => SessionLogic::clock_in(ctx, note.clone(), time.as_deref())?,
        };

        success(format!("Clocked in: {}", describe(&session)));
    }
    Ok(())
}
