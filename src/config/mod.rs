use crate::errors::{AppError, AppResult};
use crate::models::settings::{
    DEFAULT_EXERCISE_DURATION, DEFAULT_REMINDER_INTERVAL, DEFAULT_REPETITIONS, Settings,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const APP_DIR: &str = ".kegel-helper";
pub const CONFIG_FILE: &str = "kegel-helper.conf";
pub const DATABASE_FILE: &str = "kegel-helper.sqlite";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_reminder_interval")]
    pub default_reminder_interval: u32,
    #[serde(default = "default_exercise_duration")]
    pub default_exercise_duration: u32,
    #[serde(default = "default_repetitions")]
    pub default_repetitions: u32,
    #[serde(default = "default_true")]
    pub enable_notifications: bool,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_reminder_interval() -> u32 {
    DEFAULT_REMINDER_INTERVAL
}
fn default_exercise_duration() -> u32 {
    DEFAULT_EXERCISE_DURATION
}
fn default_repetitions() -> u32 {
    DEFAULT_REPETITIONS
}
fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            log_level: default_log_level(),
            default_reminder_interval: default_reminder_interval(),
            default_exercise_duration: default_exercise_duration(),
            default_repetitions: default_repetitions(),
            enable_notifications: default_true(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory (`~/.kegel-helper`).
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join(CONFIG_FILE)
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join(DATABASE_FILE)
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> AppResult<Self> {
        serde_yaml::from_str(content).map_err(|e| AppError::Config(e.to_string()))
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Settings used when the singleton row is created for the first time.
    /// Out-of-range config values fall back to the built-in defaults.
    pub fn default_settings(&self) -> Settings {
        let mut s = Settings {
            reminder_interval: self.default_reminder_interval,
            exercise_duration: self.default_exercise_duration,
            repetitions: self.default_repetitions,
            enable_notifications: self.enable_notifications,
            ..Settings::default()
        };
        if s.validate().is_err() {
            s = Settings {
                enable_notifications: self.enable_notifications,
                ..Settings::default()
            };
        }
        s
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<Config> {
        let dir = Self::config_dir();
        if !is_test {
            fs::create_dir_all(&dir)?;
        }

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_db {
            let p = crate::utils::path::expand_tilde(&name);
            if p.is_absolute() { p } else { dir.join(p) }
        } else {
            dir.join(DATABASE_FILE)
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file
        if !is_test {
            let yaml = config.to_yaml()?;
            let mut file = fs::File::create(Self::config_file()).map_err(|_| AppError::ConfigSave)?;
            file.write_all(yaml.as_bytes())
                .map_err(|_| AppError::ConfigSave)?;
        }

        // Create empty DB file if not exists
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        Ok(config)
    }
}
