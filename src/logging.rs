//! File-based tracing setup. The terminal belongs to the TUI, so log output
//! always goes to a file.

use std::fs::{self, File};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Build the filter directive for this crate at `level`.
fn filter_directive(level: &str) -> String {
    format!("book_library={}", level.trim())
}

/// Start logging to the configured file when a log level is set. Returns the
/// log file path, or `None` when logging stays disabled.
pub fn init_logging(config: &Config) -> Result<Option<PathBuf>> {
    let Some(level) = config.log_level.as_deref() else {
        return Ok(None);
    };

    let log_path = config.log_path();
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {:?}", parent))?;
    }
    let log_file = File::create(&log_path)
        .with_context(|| format!("Failed to create log file: {:?}", log_path))?;

    let env_filter = EnvFilter::try_new(filter_directive(level))
        .with_context(|| format!("Invalid log level: {level:?}"))?;

    // Ignore the error if a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("logging initialized to {:?}", log_path);
    Ok(Some(log_path))
}
