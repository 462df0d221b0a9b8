//! Per-invocation context bundle.
//!
//! Built once in `run()` and passed by reference to every command body.

use crate::config::Config;
use crate::core::rules::WorkRules;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::time::Clock;
use std::fs;
use std::path::Path;

pub struct AppContext {
    pub cfg: Config,
    pub clock: Clock,
    pub rules: WorkRules,
    pub pool: DbPool,
}

impl AppContext {
    /// Open the database (creating its directory if needed), apply pending
    /// migrations and derive the work rules from the configuration.
    pub fn open(cfg: Config, clock: Clock) -> AppResult<Self> {
        if let Some(parent) = Path::new(&cfg.database).parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let rules = WorkRules::from_config(&cfg)?;
        let pool = DbPool::new(&cfg.database, clock.clone())?;
        init_db(&pool.conn)?;

        Ok(Self {
            cfg,
            clock,
            rules,
            pool,
        })
    }

    pub fn now(&self) -> chrono::DateTime<chrono_tz::Tz> {
        self.clock.now()
    }
}
