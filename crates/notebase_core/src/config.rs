//! Store configuration from process environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `NOTEBASE_DB_PATH` | `notebase.db` |
//! | `NOTEBASE_LOG_LEVEL` | `default_log_level()` |
//! | `NOTEBASE_LOG_DIR` | unset (file logging disabled) |

use crate::logging::{default_log_level, normalize_level};
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "NOTEBASE_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "NOTEBASE_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "NOTEBASE_LOG_DIR";

const DEFAULT_DB_PATH: &str = "notebase.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    pub log_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl StoreConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`; blank values count as unset.
    ///
    /// # Errors
    /// - Returns an error when the log level is unsupported.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = read(DB_PATH_VAR) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = read(LOG_LEVEL_VAR) {
            config.log_level = normalize_level(&level)?;
        }
        config.log_dir = read(LOG_DIR_VAR).map(PathBuf::from);

        Ok(config)
    }
}
