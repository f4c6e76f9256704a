use std::error::Error;
use std::path::PathBuf;

use common::config::ProtocolConfig;
use common::crypto::SecretKey;
use common::protocol::Protocol;

use crate::state::{AppState, StateError};

#[derive(Debug, Clone)]
pub struct OpContext {
    /// Optional custom state directory (defaults to ~/.veil)
    pub config_path: Option<PathBuf>,
    /// Algorithm choices from config.toml, or the defaults
    pub config: ProtocolConfig,
}

impl OpContext {
    /// Build a context, reading config.toml if one exists
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, StateError> {
        // the config is honored even when no identity key was created
        let config = AppState::load_config(config_path.clone())?;
        tracing::debug!("using protocol config {:?}", config);

        Ok(Self {
            config_path,
            config,
        })
    }

    pub fn protocol(&self) -> Protocol {
        Protocol::new(self.config)
    }

    /// Load the identity key of the state directory
    pub fn load_key(&self) -> Result<SecretKey, StateError> {
        AppState::load(self.config_path.clone())?.load_key()
    }

    /// Use `explicit` (hex) if given, the identity key otherwise
    pub fn secret_key(&self, explicit: Option<&str>) -> Result<SecretKey, StateError> {
        match explicit {
            Some(hex) => SecretKey::from_hex(hex).map_err(|e| StateError::InvalidKey(e.to_string())),
            None => self.load_key(),
        }
    }
}

#[async_trait::async_trait]
pub trait Op: Send + Sync {
    type Error: Error + Send + Sync + 'static;
    type Output;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error>;
}

#[macro_export]
macro_rules! command_enum {
    ($(($variant:ident, $type:ty)),* $(,)?) => {
        #[derive(Subcommand, Debug, Clone)]
        pub enum Command {
            $($variant($type),)*
        }

        #[derive(Debug)]
        pub enum OpOutput {
            $($variant(<$type as $crate::cli::op::Op>::Output),)*
        }

        #[derive(Debug, thiserror::Error)]
        pub enum OpError {
            $(
                #[error(transparent)]
                $variant(<$type as $crate::cli::op::Op>::Error),
            )*
        }

        #[async_trait::async_trait]
        impl $crate::cli::op::Op for Command {
            type Output = OpOutput;
            type Error = OpError;

            async fn execute(&self, ctx: &$crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
                match self {
                    $(
                        Command::$variant(op) => {
                            op.execute(ctx).await
                                .map(OpOutput::$variant)
                                .map_err(OpError::$variant)
                        },
                    )*
                }
            }
        }

        impl std::fmt::Display for OpOutput {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        OpOutput::$variant(output) => write!(f, "{}", output),
                    )*
                }
            }
        }
    };
}
