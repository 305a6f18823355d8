use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_session_file")]
    pub session_file: String,
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
    #[serde(default = "default_bins_collection")]
    pub bins_collection: String,
    #[serde(default = "default_users_collection")]
    pub users_collection: String,
    #[serde(default = "default_roster_collection")]
    pub roster_collection: String,
}

fn default_session_file() -> String {
    Config::session_path().to_string_lossy().to_string()
}
fn default_refresh_interval_ms() -> u64 {
    5000
}
fn default_bins_collection() -> String {
    "bins".to_string()
}
fn default_users_collection() -> String {
    "users".to_string()
}
fn default_roster_collection() -> String {
    "all_users".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            session_file: default_session_file(),
            refresh_interval_ms: default_refresh_interval_ms(),
            bins_collection: default_bins_collection(),
            users_collection: default_users_collection(),
            roster_collection: default_roster_collection(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("envirosage")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".envirosage")
        }
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join("envirosage.conf")
    }

    pub fn database_file() -> PathBuf {
        Self::config_dir().join("envirosage.sqlite")
    }

    pub fn session_path() -> PathBuf {
        Self::config_dir().join("session.json")
    }

    /// Load configuration from file, or return defaults if not found.
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let yaml = serde_yaml::to_string(self).map_err(|_| AppError::ConfigSave)?;
        let mut file = fs::File::create(path)?;
        file.write_all(yaml.as_bytes())?;
        Ok(())
    }

    /// Resolve a database name: absolute paths are kept, anything else lives
    /// in the configuration directory.
    pub fn resolve_db_path(name: Option<&str>) -> PathBuf {
        match name {
            Some(n) if Path::new(n).is_absolute() => PathBuf::from(n),
            Some(n) => Self::config_dir().join(n),
            None => Self::database_file(),
        }
    }

    /// Initialize configuration and database files. With `is_test` the
    /// configuration file is left alone.
    pub fn init_all(custom_db: Option<&str>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let db_path = Self::resolve_db_path(custom_db);
        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        if !is_test {
            config.save_to(&Self::config_file())?;
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: Config = serde_yaml::from_str("database: /tmp/fleet.sqlite\n").unwrap();
        assert_eq!(cfg.database, "/tmp/fleet.sqlite");
        assert_eq!(cfg.refresh_interval_ms, 5000);
        assert_eq!(cfg.bins_collection, "bins");
        assert_eq!(cfg.roster_collection, "all_users");
    }

    #[test]
    fn absolute_db_names_are_kept() {
        let p = Config::resolve_db_path(Some("/var/tmp/x.sqlite"));
        assert_eq!(p, PathBuf::from("/var/tmp/x.sqlite"));
        assert!(Config::resolve_db_path(Some("x.sqlite")).ends_with(".envirosage/x.sqlite"));
    }
}
