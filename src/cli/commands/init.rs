use crate::cli::parser::Cli;
use crate::config::Config;
use crate::context::AppContext;
use crate::db::log;
use crate::errors::AppResult;
use crate::utils::time::Clock;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the SQLite database and all pending migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    //
    // 1️⃣ PREPARA CONFIGURAZIONE
    //
    let cfg = Config::init_all(cli.db.clone(), cli.test)?;
    let db_path = cfg.database.clone();

    println!("⚙️  Initializing rWorklog…");
    println!("📄 Config file : {}", Config::config_file().display());
    println!("🗄️  Database   : {}", &db_path);
    println!("📚 History    : {}", cfg.history_path().display());

    //
    // 2️⃣ APERTURA DB + MIGRAZIONI
    //
    let tz = cfg.location()?;
    let ctx = AppContext::open(cfg, Clock::new(tz))?;

    println!("✅ Database initialized at {}", &db_path);

    //
    // 3️⃣ LOG INTERNO (non bloccante)
    //
    if let Err(e) = log::ttlog(
        &ctx.pool.conn,
        "init",
        "Database initialized",
        &format!("Database initialized at {}", &db_path),
    ) {
        eprintln!("⚠️ Failed to write internal log: {}", e);
    }

    println!("🎉 rWorklog initialization completed!");
    Ok(())
}
