//! Runtime configuration for repository and logging.
//!
//! # Responsibility
//! - Provide defaults for the data file, listing order and logging.
//! - Apply `STOCKROOM_*` environment overrides with validation.
//!
//! # Invariants
//! - `log_level` is always a normalized level name.
//! - `log_dir`, when set, is absolute.

use crate::logging::{default_log_level, normalize_level};
use crate::repo::record_repo::RepositoryOptions;
use crate::search::query::ListOrder;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DATA_FILE: &str = "STOCKROOM_DATA_FILE";
pub const ENV_LIST_ORDER: &str = "STOCKROOM_LIST_ORDER";
pub const ENV_LOG_LEVEL: &str = "STOCKROOM_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "STOCKROOM_LOG_DIR";

const DEFAULT_DATA_FILE: &str = "inventory.json";

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Invalid { key: &'static str, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid { key, message } => write!(f, "invalid {key}: {message}"),
        }
    }
}

impl Error for ConfigError {}

/// Resolved application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockroomConfig {
    pub data_file: PathBuf,
    pub list_order: ListOrder,
    pub log_level: &'static str,
    /// File logging is enabled only when this is set.
    pub log_dir: Option<PathBuf>,
}

impl Default for StockroomConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            list_order: ListOrder::default(),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl StockroomConfig {
    /// Reads overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from defaults plus values returned by `lookup`.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = get(ENV_DATA_FILE) {
            config.data_file = PathBuf::from(path);
        }
        if let Some(order) = get(ENV_LIST_ORDER) {
            config.list_order = order.parse().map_err(|message| ConfigError::Invalid {
                key: ENV_LIST_ORDER,
                message,
            })?;
        }
        if let Some(level) = get(ENV_LOG_LEVEL) {
            config.log_level = normalize_level(&level).map_err(|message| ConfigError::Invalid {
                key: ENV_LOG_LEVEL,
                message,
            })?;
        }
        if let Some(dir) = get(ENV_LOG_DIR) {
            let dir = PathBuf::from(dir);
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid {
                    key: ENV_LOG_DIR,
                    message: format!("`{}` is not an absolute path", dir.display()),
                });
            }
            config.log_dir = Some(dir);
        }

        Ok(config)
    }

    pub fn repository_options(&self) -> RepositoryOptions {
        RepositoryOptions {
            list_order: self.list_order,
        }
    }
}
