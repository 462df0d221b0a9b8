use crate::cli::parser::Commands;
use crate::context::AppContext;
use crate::core::archive::ArchiveLogic;
use crate::errors::AppResult;
use crate::ui::messages::info;

pub fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::History { months } = cmd {
        let summary = ArchiveLogic::history_context(&ctx.cfg, *months)?;
        if summary.is_empty() {
            info("No archived months yet.");
        } else {
            print!("{}", summary);
        }
    }
    Ok(())
}
