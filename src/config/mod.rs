use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub mod migrate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    /// Personal id used when `--as` is not given.
    #[serde(default)]
    pub current_user: Option<String>,
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
    #[serde(default = "default_per_page")]
    pub per_page: usize,
    #[serde(default = "default_admin_range_days")]
    pub admin_range_days: i64,
    #[serde(default = "default_nearby_radius")]
    pub nearby_radius_km: f64,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_recent_limit() -> usize {
    5
}
fn default_per_page() -> usize {
    15
}
fn default_admin_range_days() -> i64 {
    7
}
fn default_nearby_radius() -> f64 {
    5.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            current_user: None,
            recent_limit: default_recent_limit(),
            per_page: default_per_page(),
            admin_range_days: default_admin_range_days(),
            nearby_radius_km: default_nearby_radius(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("timereg")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".timereg")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("timereg.conf")
    }

    /// Return the default path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("timereg.sqlite")
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
        let mut cfg: Config =
            serde_yaml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))?;
        cfg.database = expand_tilde(&cfg.database).to_string_lossy().to_string();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values no command can work with.
    pub fn validate(&self) -> AppResult<()> {
        if self.admin_range_days < 1 {
            return Err(AppError::Config(format!(
                "admin_range_days must be at least 1 (found {})",
                self.admin_range_days
            )));
        }
        if self.per_page == 0 {
            return Err(AppError::Config("per_page must be at least 1".into()));
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        let yaml = serde_yaml::to_string(self).map_err(|_| AppError::ConfigSave)?;
        fs::write(path, yaml).map_err(|_| AppError::ConfigSave)?;
        Ok(())
    }

    /// Create the config directory, the config file (unless `is_test`) and an
    /// empty database file. Returns the database path that was set up.
    pub fn init_all(custom_db: Option<&str>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();

        // DB path: user provided (absolute or relative to the config dir) or default
        let db_path = match custom_db {
            Some(name) => {
                let p = expand_tilde(name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => Self::database_file(),
        };

        if !is_test {
            fs::create_dir_all(&dir)?;
            let config = Config {
                database: db_path.to_string_lossy().to_string(),
                ..Config::default()
            };
            config.save(&Self::config_file())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(db_path)
    }
}
