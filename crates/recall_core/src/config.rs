//! Runtime configuration resolved from the environment.
//!
//! # Responsibility
//! - Resolve database location and logging settings for front ends.
//!
//! # Invariants
//! - Blank environment values behave as unset.
//! - The interval table is never configurable.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "RECALL_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "RECALL_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "RECALL_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "recall.sqlite3";

/// Configuration error for unusable settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnsupportedLogLevel { variable: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLogLevel { variable, value } => write!(
                f,
                "{variable}: unsupported log level `{value}`; expected trace|debug|info|warn|error"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Resolved settings for one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecallConfig {
    /// SQLite database file backing the review store.
    pub db_path: PathBuf,
    /// Normalized log level.
    pub log_level: &'static str,
    /// Rolling log directory. Logging stays off when `None`.
    pub log_dir: Option<PathBuf>,
}

impl Default for RecallConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl RecallConfig {
    /// Resolves settings from `RECALL_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = non_blank(lookup(DB_PATH_ENV)) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = non_blank(lookup(LOG_LEVEL_ENV)) {
            config.log_level =
                normalize_level(&level).ok_or(ConfigError::UnsupportedLogLevel {
                    variable: LOG_LEVEL_ENV,
                    value: level,
                })?;
        }
        if let Some(dir) = non_blank(lookup(LOG_DIR_ENV)) {
            config.log_dir = Some(PathBuf::from(dir));
        }

        Ok(config)
    }
}

/// Returns `debug` for debug builds and `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

/// Maps user-provided level text to a canonical level name.
pub fn normalize_level(level: &str) -> Option<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" | "warning" => Some("warn"),
        "error" => Some("error"),
        _ => None,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}
