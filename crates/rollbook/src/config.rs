//! Configuration management for rollbook.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "rollbook";

/// Prefix for environment overrides.
const ENV_PREFIX: &str = "ROLLBOOK_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `ROLLBOOK_`, `__` between levels)
/// 2. TOML config file at `~/.config/rollbook/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Attendance marking configuration.
    pub attendance: AttendanceConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the student snapshot and attendance records.
    /// Defaults to `~/.local/share/rollbook`
    pub data_dir: Option<PathBuf>,
    /// File name of the student snapshot inside the data directory.
    pub students_file: String,
    /// Directory name for per-date attendance files inside the data directory.
    pub attendance_dir: String,
}

/// Attendance marking configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttendanceConfig {
    /// Presence assumed when the operator answers a prompt with Enter.
    pub default_present: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None, // Will be resolved to default at runtime
            students_file: "students.json".to_string(),
            attendance_dir: "attendance_records".to_string(),
        }
    }
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            default_present: true,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `ROLLBOOK_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

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
        validate_file_name("students_file", &self.storage.students_file)?;
        validate_file_name("attendance_dir", &self.storage.attendance_dir)?;

        if self.storage.students_file == self.storage.attendance_dir {
            return Err(Error::ConfigValidation {
                message: format!(
                    "students_file and attendance_dir cannot both be '{}'",
                    self.storage.students_file
                ),
            });
        }

        Ok(())
    }

    /// Get the data directory, resolving defaults if not set.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Get the student snapshot path.
    #[must_use]
    pub fn students_path(&self) -> PathBuf {
        self.data_dir().join(&self.storage.students_file)
    }

    /// Get the attendance directory path.
    #[must_use]
    pub fn attendance_dir(&self) -> PathBuf {
        self.data_dir().join(&self.storage.attendance_dir)
    }
}

fn validate_file_name(key: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::ConfigValidation {
            message: format!("{key} must not be empty"),
        });
    }
    if value.contains(['/', '\\']) || value == "." || value == ".." {
        return Err(Error::ConfigValidation {
            message: format!("{key} must be a plain name, got '{value}'"),
        });
    }
    Ok(())
}
