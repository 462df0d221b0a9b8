//! rWorklog library root.
//! Exposes CLI parser, high-level run() function, and internal modules.

pub mod cli;
pub mod config;
pub mod context;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod ui;
pub mod utils;

use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::context::AppContext;
use crate::core::background::spawn_auto_archive;
use crate::errors::AppResult;
use crate::utils::time::{Clock, parse_now};
use clap::Parser;
use std::time::Duration;

/// How long the foreground waits for the auto-archive report.
const BACKGROUND_TIMEOUT: Duration = Duration::from_secs(5);

/// Central command dispatcher
pub fn dispatch(cli: &Cli, ctx: &AppContext) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, &ctx.cfg),
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, ctx),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, ctx),
        Commands::Clockin { .. } => cli::commands::clockin::handle(&cli.command, ctx),
        Commands::Clockout { .. } => cli::commands::clockout::handle(&cli.command, ctx),
        Commands::Status { .. } => cli::commands::status::handle(&cli.command, ctx),
        Commands::Week { .. } => cli::commands::week::handle(&cli.command, ctx),
        Commands::Month { .. } => cli::commands::month::handle(&cli.command, ctx),
        Commands::Range { .. } => cli::commands::range::handle(&cli.command, ctx),
        Commands::Edit { .. } => cli::commands::edit::handle(&cli.command, ctx),
        Commands::Delete { .. } => cli::commands::delete::handle(&cli.command, ctx),
        Commands::Sessions => cli::commands::sessions::handle(&cli.command, ctx),
        Commands::Archive { .. } => cli::commands::archive::handle(&cli.command, ctx),
        Commands::History { .. } => cli::commands::history::handle(&cli.command, ctx),
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, ctx),
    }
}

/// Build the clock: the configured zone, frozen when `--now` is given.
pub fn build_clock(cfg: &Config, now: Option<&str>) -> AppResult<Clock> {
    let tz = cfg.location()?;
    Ok(match now {
        Some(raw) => Clock::fixed(tz, parse_now(raw)?),
        None => Clock::new(tz),
    })
}

/// The background walk runs once per process, except in test mode, when
/// disabled in the configuration, or when the command is itself archival.
fn wants_auto_archive(cli: &Cli, cfg: &Config) -> bool {
    !cli.test && cfg.auto_archive && !matches!(cli.command, Commands::Archive { .. })
}

/// Entry point usato da main.rs
pub fn run() -> AppResult<()> {
    // 1️⃣ parse CLI
    let cli = Cli::parse();

    // init crea config e DB da sé
    if matches!(cli.command, Commands::Init) {
        return cli::commands::init::handle(&cli);
    }

    // 2️⃣ carica config UNA sola volta
    let mut cfg = Config::load()?;

    // 3️⃣ applica eventuale override del DB da riga di comando
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    // config non tocca il DB
    if matches!(cli.command, Commands::Config { .. }) {
        return cli::commands::config::handle(&cli.command, &cfg);
    }

    // 4️⃣ contesto: clock + regole + DB (migrazioni incluse)
    let clock = build_clock(&cfg, cli.now.as_deref())?;
    let ctx = AppContext::open(cfg, clock)?;

    // 5️⃣ auto-archive in background, sulla sua connessione
    let background = wants_auto_archive(&cli, &ctx.cfg)
        .then(|| spawn_auto_archive(ctx.cfg.clone(), ctx.clock.clone()));

    // 6️⃣ comando in foreground
    let result = dispatch(&cli, &ctx);

    if let Some(bg) = background {
        bg.finish(BACKGROUND_TIMEOUT);
    }

    result
}
