use crate::errors::{AppError, AppResult};
use crate::utils::path::{expand_tilde, resolve_against};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_weekly_goal")]
    pub weekly_goal: f64,
    /// "local" or an IANA zone name such as "Europe/Vienna"
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_break_minutes")]
    pub default_break_minutes: i32,
    #[serde(default = "default_reduced_break_day")]
    pub reduced_break_day: String,
    #[serde(default)]
    pub reduced_break_minutes: i32,
    #[serde(default = "default_auto_archive")]
    pub auto_archive: bool,
    /// Empty → `<database dir>/history`
    #[serde(default)]
    pub history_dir: String,
    #[serde(default = "default_separator_char")]
    pub separator_char: String,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_weekly_goal() -> f64 {
    38.5
}
fn default_timezone() -> String {
    "local".to_string()
}
fn default_break_minutes() -> i32 {
    30
}
fn default_reduced_break_day() -> String {
    "Fri".to_string()
}
fn default_auto_archive() -> bool {
    true
}
fn default_separator_char() -> String {
    "-".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            weekly_goal: default_weekly_goal(),
            timezone: default_timezone(),
            default_break_minutes: default_break_minutes(),
            reduced_break_day: default_reduced_break_day(),
            reduced_break_minutes: 0,
            auto_archive: default_auto_archive(),
            history_dir: String::new(),
            separator_char: default_separator_char(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rworklog")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".rworklog")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rworklog.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rworklog.sqlite")
    }

    /// Load configuration from file, or return defaults if not found.
    /// Missing fields fall back to their defaults.
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)?;
        let mut cfg: Config = serde_yaml::from_str(&content)?;
        cfg.database = expand_tilde(&cfg.database).to_string_lossy().to_string();
        Ok(cfg)
    }

    pub fn save(&self) -> AppResult<()> {
        let yaml = serde_yaml::to_string(self).map_err(|_| AppError::ConfigSave)?;
        fs::create_dir_all(Self::config_dir())?;
        let mut file = fs::File::create(Self::config_file()).map_err(|_| AppError::ConfigSave)?;
        file.write_all(yaml.as_bytes())?;
        Ok(())
    }

    /// Resolve the configured zone. "local" asks the OS; unknown names are
    /// a configuration error rather than a silent fallback.
    pub fn location(&self) -> AppResult<Tz> {
        let name = self.timezone.trim();
        if name.is_empty() || name.eq_ignore_ascii_case("local") {
            let system = iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string());
            return Ok(system.parse::<Tz>().unwrap_or(Tz::UTC));
        }

        name.parse::<Tz>()
            .map_err(|_| AppError::Config(format!("Unknown timezone '{}'", name)))
    }

    /// Directory holding the monthly Markdown archives.
    pub fn history_path(&self) -> PathBuf {
        let db_dir = PathBuf::from(&self.database)
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        if self.history_dir.trim().is_empty() {
            db_dir.join("history")
        } else {
            resolve_against(&db_dir, &self.history_dir)
        }
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<Config> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = match custom_name {
            Some(name) => resolve_against(&dir, &name),
            None => Self::database_file(),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file
        if !is_test {
            config.save()?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }
        println!("✅ Database:    {:?}", db_path);

        Ok(config)
    }
}
