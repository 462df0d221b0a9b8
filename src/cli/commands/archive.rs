use crate::cli::parser::{ArchiveAction, Commands};
use crate::context::AppContext;
use crate::core::archive::ArchiveLogic;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use crate::utils::date::parse_year_month;

fn year_month(s: &str) -> AppResult<(i32, u32)> {
    parse_year_month(s).ok_or_else(|| AppError::InvalidDate(format!("{s} (use YYYY-MM)")))
}

pub fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Archive { action } = cmd {
        match action {
            ArchiveAction::Auto => {
                let report = ArchiveLogic::auto_archive_past_months(ctx);

                for name in &report.archived {
                    success(format!("Archived {}", name));
                }
                if let Some(e) = report.error {
                    return Err(e);
                }
                if report.archived.is_empty() {
                    info("Nothing to archive: every past month is already archived.");
                }
            }

            ArchiveAction::Month { month, clean } => {
                let (y, m) = year_month(month)?;
                let path = ArchiveLogic::archive_month(ctx, y, m, *clean)?;
                success(format!("Archive written: {}", path.display()));
                if *clean {
                    info("Archived sessions removed from the database.");
                }
            }

            ArchiveAction::List => {
                let names = ArchiveLogic::list_archives(&ctx.cfg)?;
                if names.is_empty() {
                    info(format!(
                        "No archives in {}",
                        ctx.cfg.history_path().display()
                    ));
                }
                for name in names {
                    println!("{}", name);
                }
            }

            ArchiveAction::Show { month } => {
                let (y, m) = year_month(month)?;
                print!("{}", ArchiveLogic::read_archive(&ctx.cfg, y, m)?);
            }
        }
    }
    Ok(())
}
