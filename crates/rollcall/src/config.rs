//! Configuration management for rollcall.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use chrono::format::{Item, StrftimeItems};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "rollcall";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "attendance.db";

/// Key under which the record collection is stored.
pub const DEFAULT_STORAGE_KEY: &str = "lesson_attendance_records";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `ROLLCALL_`, sections split on `__`)
/// 2. TOML config file at `~/.config/rollcall/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Admin panel configuration.
    pub admin: AdminConfig,
    /// Dashboard display configuration.
    pub display: DisplayConfig,
    /// CSV export configuration.
    pub export: ExportConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/rollcall/attendance.db`
    pub database_path: Option<PathBuf>,
    /// Key the record collection is stored under.
    pub storage_key: String,
}

/// Admin panel configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Shared secret for the admin panel. Compared verbatim.
    pub secret: String,
}

/// How records are shown on the dashboard and in exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// `strftime` format for check-in times.
    pub timestamp_format: String,
    /// Shown in the note column when a record has no note.
    pub empty_note_placeholder: String,
}

/// CSV export configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory exports are written to when no explicit path is given.
    /// Defaults to the current directory.
    pub output_dir: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // Will be resolved to default at runtime
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            secret: "admin123".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            timestamp_format: "%Y-%m-%d %H:%M:%S".to_string(),
            empty_note_placeholder: "-".to_string(),
        }
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);
        Self::from_figment(Self::figment(&config_file))
    }

    /// Build the layered figment for the given config file.
    fn figment(config_file: &std::path::Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed("ROLLCALL_").split("__"))
    }

    fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage.storage_key.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "storage_key must not be empty".to_string(),
            });
        }

        if self.admin.secret.is_empty() {
            return Err(Error::ConfigValidation {
                message: "admin secret must not be empty".to_string(),
            });
        }

        let format = &self.display.timestamp_format;
        if format.is_empty() || StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return Err(Error::ConfigValidation {
                message: format!("invalid timestamp_format: {format:?}"),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the export directory, resolving defaults if not set.
    #[must_use]
    pub fn export_dir(&self) -> PathBuf {
        self.export
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "rollcall_config_{}_{name}.toml",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.database_path.is_none());
        assert_eq!(config.storage.storage_key, "lesson_attendance_records");
        assert_eq!(config.admin.secret, "admin123");
        assert_eq!(config.display.empty_note_placeholder, "-");
        assert!(config.export.output_dir.is_none());
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_storage_key() {
        let mut config = Config::default();
        config.storage.storage_key = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("storage_key"));
    }

    #[test]
    fn test_validate_empty_secret() {
        let mut config = Config::default();
        config.admin.secret = String::new();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("admin secret"));
    }

    #[test]
    fn test_validate_invalid_timestamp_format() {
        let mut config = Config::default();
        config.display.timestamp_format = "%Y-%Q".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("timestamp_format"));
    }

    #[test]
    fn test_database_path_default() {
        let path = Config::default().database_path();
        assert!(path.to_string_lossy().contains("attendance.db"));
        assert!(path.to_string_lossy().contains("rollcall"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_export_dir_default() {
        assert_eq!(Config::default().export_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("rollcall"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_toml() {
        let path = temp_config(
            "load",
            r#"
[admin]
secret = "s3cret"

[display]
empty_note_placeholder = "n/a"
"#,
        );

        let config = Config::load_from(Some(path.clone())).unwrap();
        assert_eq!(config.admin.secret, "s3cret");
        assert_eq!(config.display.empty_note_placeholder, "n/a");
        assert_eq!(config.storage.storage_key, DEFAULT_STORAGE_KEY);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_load_from_toml_top_level_sections() {
        let path = temp_config(
            "sections",
            r#"
[storage]
storage_key = "k2"
database_path = "/tmp/rollcall/custom.db"

[admin]
secret = "s3cret"

[export]
output_dir = "/tmp/exports"
"#,
        );

        let config = Config::load_from(Some(path.clone())).unwrap();
        assert_eq!(config.storage.storage_key, "k2");
        assert_eq!(
            config.database_path(),
            PathBuf::from("/tmp/rollcall/custom.db")
        );
        assert_eq!(config.admin.secret, "s3cret");
        assert_eq!(config.export_dir(), PathBuf::from("/tmp/exports"));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_load_from_toml_rejects_invalid() {
        let path = temp_config(
            "invalid",
            r#"
[storage]
storage_key = ""
"#,
        );

        let result = Config::load_from(Some(path.clone()));
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_display_config_deserialize_partial() {
        let json = r#"{"timestamp_format": "%H:%M"}"#;
        let display: DisplayConfig = serde_json::from_str(json).unwrap();
        assert_eq!(display.timestamp_format, "%H:%M");
        assert_eq!(display.empty_note_placeholder, "-");
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("storage_key"));
        assert!(json.contains("timestamp_format"));
    }
}
