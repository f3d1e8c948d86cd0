//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (`<config dir>/book-library/config.toml`)
//! 3. Environment variables (`BOOK_LIBRARY_*` prefix)
//!
//! Environment variables take precedence over config file values.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Environment variable prefix
const ENV_PREFIX: &str = "BOOK_LIBRARY";
/// Directory name used under the platform config/data directories.
const APP_DIR_NAME: &str = "book-library";
const LOG_FILE_NAME: &str = "book-library.log";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Tracing filter level (`error`, `warn`, `info`, `debug`, `trace`).
    /// Logging stays off while this is unset.
    #[serde(default)]
    pub log_level: Option<String>,

    /// Where log output goes. Defaults to the platform data directory.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default location and environment.
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration from a specific path. A missing file yields the
    /// defaults; environment overrides are applied either way.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        // BOOK_LIBRARY_LOG
        if let Ok(val) = std::env::var(format!("{}_LOG", ENV_PREFIX)) {
            self.log_level = if val.is_empty() { None } else { Some(val) };
        }

        // BOOK_LIBRARY_LOG_FILE
        if let Ok(val) = std::env::var(format!("{}_LOG_FILE", ENV_PREFIX)) {
            self.log_file = if val.is_empty() {
                None
            } else {
                Some(PathBuf::from(val))
            };
        }
    }

    /// Get the config file path
    ///
    /// Can be overridden with the BOOK_LIBRARY_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        project_dirs()
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".").join(APP_DIR_NAME))
            .join("config.toml")
    }

    /// Resolved log file path.
    pub fn log_path(&self) -> PathBuf {
        if let Some(path) = &self.log_file {
            return path.clone();
        }

        project_dirs()
            .map(|dirs| dirs.data_local_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".").join(APP_DIR_NAME))
            .join(LOG_FILE_NAME)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_DIR_NAME)
}
