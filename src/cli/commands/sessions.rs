use crate::cli::parser::Commands;
use crate::context::AppContext;
use crate::core::progress::ProgressLogic;
use crate::errors::AppResult;
use crate::ui::messages::{header, info};
use crate::utils::formatting::truncate_display;
use crate::utils::hours2readable;
use crate::utils::table::{Column, Table};
use crate::utils::time::format_hhmm;

const NOTE_WIDTH: usize = 40;

pub fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if matches!(cmd, Commands::Sessions) {
        let week = ProgressLogic::week_progress(ctx)?;

        header(format!("Sessions {} → {}", week.week_start, week.week_end));

        if week.sessions.is_empty() {
            info("No sessions this week.");
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column::new("ID"),
            Column::new("Date"),
            Column::new("Start"),
            Column::new("End"),
            Column::new("Break"),
            Column::new("Hours"),
            Column::new("Note"),
        ]);

        for s in &week.sessions {
            let (end, hours) = match (&s.end, s.duration_hours()) {
                (Some(end), Some(h)) => (format_hhmm(end), hours2readable(h, false)),
                _ => ("[ACTIVE]".to_string(), "-".to_string()),
            };

            table.add_row(vec![
                s.short_id().to_string(),
                s.date.format("%a %Y-%m-%d").to_string(),
                format_hhmm(&s.start),
                end,
                format!("{}m", s.break_minutes),
                hours,
                truncate_display(s.note_str(), NOTE_WIDTH),
            ]);
        }

        print!("{}", table.render());
        println!(
            "\nTotal: {} ({} session(s))",
            hours2readable(week.total_hours, false),
            week.sessions.len()
        );
    }
    Ok(())
}
