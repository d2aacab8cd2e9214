//! Account defaults loaded from JSON
//!
//! Omitted fields take their defaults, so `{}` is a valid configuration.

use crate::crypto::keyless::MAX_UID_KEY_BYTES;
use crate::keyless::DEFAULT_UID_KEY;
use crate::keyless::ephemeral_key_pair::DEFAULT_EPHEMERAL_LIFETIME_SECS;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading the file failed
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// File that could not be read
        path: String,
        /// Underlying error
        source: std::io::Error,
    },

    /// The file is not valid JSON for [`AccountConfig`]
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration loading
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Defaults applied when constructing accounts and ephemeral key pairs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountConfig {
    /// Lifetime of a freshly generated ephemeral key pair
    pub ephemeral_lifetime_secs: u64,

    /// JWT claim used as the keyless user id
    pub default_uid_key: String,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            ephemeral_lifetime_secs: DEFAULT_EPHEMERAL_LIFETIME_SECS,
            default_uid_key: DEFAULT_UID_KEY.to_string(),
        }
    }
}

impl AccountConfig {
    /// Read and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&content)?;
        log::debug!("Loaded account config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.ephemeral_lifetime_secs == 0 {
            return Err(ConfigError::Invalid(
                "ephemeral_lifetime_secs must be positive".to_string(),
            ));
        }
        if self.default_uid_key.is_empty() {
            return Err(ConfigError::Invalid(
                "default_uid_key must not be empty".to_string(),
            ));
        }
        if self.default_uid_key.len() > MAX_UID_KEY_BYTES {
            return Err(ConfigError::Invalid(format!(
                "default_uid_key exceeds {MAX_UID_KEY_BYTES} bytes"
            )));
        }
        Ok(())
    }
}
