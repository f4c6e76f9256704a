use std::{fs, path::PathBuf};

use common::config::{ConfigError, ProtocolConfig};
use common::crypto::SecretKey;

pub const APP_NAME: &str = "veil";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const KEY_FILE_NAME: &str = "key.pem";

/// The on-disk state of a Veil user: algorithm choices and an identity key
#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the veil directory (~/.veil)
    pub veil_dir: PathBuf,
    /// Path to the identity key PEM file
    pub key_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: ProtocolConfig,
}

impl AppState {
    /// Get the veil directory path (custom or default ~/.veil)
    pub fn veil_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new veil state directory with a fresh identity key
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<ProtocolConfig>,
    ) -> Result<Self, StateError> {
        let veil_dir = Self::veil_dir(custom_path)?;

        if veil_dir.join(CONFIG_FILE_NAME).exists() || veil_dir.join(KEY_FILE_NAME).exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&veil_dir)?;

        let key = SecretKey::generate();
        let key_path = veil_dir.join(KEY_FILE_NAME);
        fs::write(&key_path, key.to_pem())?;

        let config = config.unwrap_or_default();
        let config_path = veil_dir.join(CONFIG_FILE_NAME);
        config.save(&config_path)?;

        tracing::debug!("initialized veil state at {}", veil_dir.display());

        Ok(Self {
            veil_dir,
            key_path,
            config_path,
            config,
        })
    }

    /// Load existing state from the veil directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let veil_dir = Self::veil_dir(custom_path)?;

        if !veil_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let key_path = veil_dir.join(KEY_FILE_NAME);
        let config_path = veil_dir.join(CONFIG_FILE_NAME);

        if !key_path.exists() {
            return Err(StateError::MissingFile(KEY_FILE_NAME.to_string()));
        }

        // a missing config means defaults
        let config = ProtocolConfig::load_or_default(&config_path)?;

        Ok(Self {
            veil_dir,
            key_path,
            config_path,
            config,
        })
    }

    /// Load only the protocol config, whether or not an identity key exists
    ///
    /// A missing directory or config file yields the defaults.
    pub fn load_config(custom_path: Option<PathBuf>) -> Result<ProtocolConfig, StateError> {
        let config_path = Self::veil_dir(custom_path)?.join(CONFIG_FILE_NAME);
        Ok(ProtocolConfig::load_or_default(&config_path)?)
    }

    /// Load the secret key from the key file
    pub fn load_key(&self) -> Result<SecretKey, StateError> {
        let pem = fs::read_to_string(&self.key_path)?;
        let key = SecretKey::from_pem(&pem).map_err(|e| StateError::InvalidKey(e.to_string()))?;
        Ok(key)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("veil directory not initialized. Run 'veil init' first")]
    NotInitialized,

    #[error("veil directory already initialized")]
    AlreadyInitialized,

    #[error("could not determine home directory")]
    NoHomeDirectory,

    #[error("missing file: {0}")]
    MissingFile(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod test {
    use super::*;
    use common::crypto::{Cipher, HashAlgorithm};

    #[test]
    fn test_init_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("veil");

        let config = ProtocolConfig {
            hash: HashAlgorithm::Sha256,
            cipher: Cipher::XChaCha20Poly1305,
            ..Default::default()
        };
        let state = AppState::init(Some(path.clone()), Some(config)).unwrap();
        assert!(state.key_path.exists());
        assert!(state.config_path.exists());

        let loaded = AppState::load(Some(path.clone())).unwrap();
        assert_eq!(loaded.config, config);
        assert_eq!(
            loaded.load_key().unwrap().public(),
            state.load_key().unwrap().public()
        );

        assert!(matches!(
            AppState::init(Some(path), None),
            Err(StateError::AlreadyInitialized)
        ));
    }

    #[test]
    fn test_not_initialized() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            AppState::load(Some(dir.path().join("missing"))),
            Err(StateError::NotInitialized)
        ));
        assert!(matches!(
            AppState::load(Some(dir.path().to_path_buf())),
            Err(StateError::MissingFile(_))
        ));
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::init(Some(dir.path().to_path_buf()), None).unwrap();
        fs::remove_file(&state.config_path).unwrap();

        let loaded = AppState::load(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(loaded.config, ProtocolConfig::default());
    }

    #[test]
    fn test_config_without_key() {
        let dir = tempfile::tempdir().unwrap();
        let config = ProtocolConfig {
            hash: HashAlgorithm::Blake3,
            cipher: Cipher::XChaCha20Poly1305,
            ..Default::default()
        };
        let state = AppState::init(Some(dir.path().to_path_buf()), Some(config)).unwrap();
        fs::remove_file(&state.key_path).unwrap();

        assert!(matches!(
            AppState::load(Some(dir.path().to_path_buf())),
            Err(StateError::MissingFile(_))
        ));
        assert_eq!(
            AppState::load_config(Some(dir.path().to_path_buf())).unwrap(),
            config
        );
        assert_eq!(
            AppState::load_config(Some(dir.path().join("missing"))).unwrap(),
            ProtocolConfig::default()
        );
    }
}
