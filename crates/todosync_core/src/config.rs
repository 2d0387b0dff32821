//! Runtime configuration.
//!
//! # Responsibility
//! - Describe collection, logging and seed settings in one JSON document.
//! - Validate settings before any controller or logger uses them.
//!
//! # Invariants
//! - Every field has a default; an empty JSON object is a valid config.
//! - Unknown keys are rejected.

use crate::logging::{default_log_level, normalize_level};
use crate::store::validate_collection;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Default collection mirrored by the remote list.
pub const DEFAULT_COLLECTION: &str = "todos";
/// Default seed endpoint of the in-memory list.
pub const DEFAULT_SEED_URL: &str = "https://jsonplaceholder.typicode.com/todos?_limit=10";
pub const DEFAULT_SEED_LIMIT: usize = 10;
pub const DEFAULT_LOCAL_ID_START: u64 = 10;

/// Settings shared by the library and the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TodoSyncConfig {
    /// Remote collection name.
    pub collection: String,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute log directory; logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    /// Endpoint returning the in-memory list's seed payload.
    pub seed_url: String,
    /// Maximum seed entries kept.
    pub seed_limit: usize,
    /// Lowest id counter of the in-memory list.
    pub local_id_start: u64,
}

impl Default for TodoSyncConfig {
    fn default() -> Self {
        Self {
            collection: DEFAULT_COLLECTION.to_string(),
            log_level: default_log_level().to_string(),
            log_dir: None,
            seed_url: DEFAULT_SEED_URL.to_string(),
            seed_limit: DEFAULT_SEED_LIMIT,
            local_id_start: DEFAULT_LOCAL_ID_START,
        }
    }
}

impl TodoSyncConfig {
    /// Parses and validates a JSON config document.
    pub fn from_json_str(body: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(body)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let body = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&body)
    }

    /// Checks cross-field rules that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_collection(&self.collection).map_err(|_| {
            ConfigError::Invalid(format!("collection `{}` is invalid", self.collection))
        })?;
        normalize_level(&self.log_level).map_err(ConfigError::Invalid)?;
        if let Some(log_dir) = &self.log_dir {
            if !log_dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "log_dir must be an absolute path, got `{}`",
                    log_dir.display()
                )));
            }
        }
        if self.seed_url.trim().is_empty() {
            return Err(ConfigError::Invalid("seed_url must not be empty".to_string()));
        }
        if self.seed_limit == 0 {
            return Err(ConfigError::Invalid("seed_limit must be > 0".to_string()));
        }
        Ok(())
    }
}

/// Config loading failures.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config json: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}
