use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::crypto::{Cipher, HashAlgorithm, ThresholdError, ThresholdParams};

/// Errors that can occur while loading or saving a configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("toml deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error("invalid threshold parameters: {0}")]
    Threshold(#[from] ThresholdError),
}

/// Algorithm choices for an exchange
///
/// Both parties of an exchange must agree on `hash` and `cipher`; the
/// defaults match NaCl and Keccak-256 so that peers with no configuration
/// interoperate.
///
/// ```toml
/// hash = "keccak256"
/// cipher = "xsalsa20poly1305"
///
/// [threshold]
/// min_fragments = 3
/// total_fragments = 5
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// Digest used to derive message secrets and share commitments
    #[serde(default)]
    pub hash: HashAlgorithm,
    /// Authenticated cipher for envelopes
    #[serde(default)]
    pub cipher: Cipher,
    /// Default split parameters
    #[serde(default)]
    pub threshold: ThresholdParams,
}

impl ProtocolConfig {
    /// Parse a configuration from TOML, filling in defaults for missing fields
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.threshold.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Read a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path)?;
        Self::from_toml(&s)
    }

    /// Read a configuration file, or the defaults if it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}
