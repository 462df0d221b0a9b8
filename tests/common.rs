#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{DateTime, NaiveDateTime};
use chrono_tz::Tz;
use rworklog::config::Config;
use rworklog::context::AppContext;
use rworklog::utils::time::Clock;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Zone used by every test: has DST, is not UTC.
pub const TEST_TZ: &str = "Europe/Vienna";

pub fn rwl() -> Command {
    cargo_bin_cmd!("rworklog")
}

pub fn tz() -> Tz {
    TEST_TZ.parse().expect("valid tz")
}

pub fn naive(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").expect("valid datetime")
}

/// Local instant in the test zone.
pub fn local(s: &str) -> DateTime<Tz> {
    Clock::new(tz()).localize(naive(s))
}

/// Isolated workspace: its own HOME (config file), database and history dir.
pub struct TestEnv {
    pub dir: TempDir,
    pub db: String,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = dir.path().join("worklog.sqlite").to_string_lossy().to_string();

        let env = Self { dir, db };
        env.write_config("auto_archive: false\n");
        env
    }

    /// Replace the config file under this HOME. The test zone is always set;
    /// `extra` holds further YAML lines.
    pub fn write_config(&self, extra: &str) {
        let cfg_dir = if cfg!(target_os = "windows") {
            self.dir.path().join("rworklog")
        } else {
            self.dir.path().join(".rworklog")
        };
        fs::create_dir_all(&cfg_dir).expect("config dir");
        fs::write(
            cfg_dir.join("rworklog.conf"),
            format!("timezone: {TEST_TZ}\n{extra}"),
        )
        .expect("config file");
    }

    pub fn config(&self) -> Config {
        Config {
            database: self.db.clone(),
            timezone: TEST_TZ.to_string(),
            auto_archive: false,
            ..Config::default()
        }
    }

    /// Library context with the clock frozen at `now` (`YYYY-MM-DDTHH:MM`).
    pub fn ctx_at(&self, now: &str) -> AppContext {
        AppContext::open(self.config(), Clock::fixed(tz(), naive(now))).expect("open context")
    }

    pub fn history(&self) -> PathBuf {
        self.dir.path().join("history")
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Binary invocation bound to this workspace, in test mode.
    pub fn cmd(&self) -> Command {
        let mut c = rwl();
        c.env("HOME", self.dir.path())
            .env("APPDATA", self.dir.path())
            .args(["--db", &self.db, "--test"]);
        c
    }

    /// Binary invocation without `--test`: the background auto-archive runs
    /// if the config enables it.
    pub fn live_at(&self, now: &str) -> Command {
        let mut c = rwl();
        c.env("HOME", self.dir.path())
            .env("APPDATA", self.dir.path())
            .args(["--db", &self.db, "--now", now]);
        c
    }

    /// Same as `cmd`, with the clock frozen at `now`.
    pub fn at(&self, now: &str) -> Command {
        let mut c = self.cmd();
        c.args(["--now", now]);
        c
    }
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("readable file")
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
