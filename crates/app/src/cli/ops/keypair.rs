use std::fmt;
use std::path::PathBuf;

use clap::Args;
use common::crypto::{KeyError, KeyPair, SecretKey};
use common::protocol;

/// Generate a key pair, or derive the public half of an existing secret key
#[derive(Args, Debug, Clone)]
pub struct Keypair {
    /// Secret key as hex
    #[arg(long, conflicts_with_all = ["pem", "identity"])]
    pub secret_key: Option<String>,

    /// Secret key PEM file
    #[arg(long, conflicts_with = "identity")]
    pub pem: Option<PathBuf>,

    /// Use the identity key of the veil directory
    #[arg(long)]
    pub identity: bool,

    /// Also write the secret key to this PEM file
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum KeypairError {
    #[error("invalid key: {0}")]
    Key(#[from] KeyError),
    #[error("state error: {0}")]
    State(#[from] crate::state::StateError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug)]
pub struct KeypairOutput {
    pair: KeyPair,
    /// Only set for freshly generated keys
    show_secret: bool,
}

impl fmt::Display for KeypairOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "public key (hex):    {}", self.pair.public_key.to_hex())?;
        write!(f, "public key (base58): {}", self.pair.public_key.to_base58())?;
        if self.show_secret {
            write!(f, "\nsecret key (hex):    {}", self.pair.secret_key.to_hex())?;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Keypair {
    type Error = KeypairError;
    type Output = KeypairOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let (secret_key, generated) = if let Some(hex) = &self.secret_key {
            (SecretKey::from_hex(hex)?, false)
        } else if let Some(path) = &self.pem {
            (SecretKey::from_pem(&std::fs::read_to_string(path)?)?, false)
        } else if self.identity {
            (ctx.load_key()?, false)
        } else {
            (SecretKey::generate(), true)
        };

        if let Some(out) = &self.out {
            std::fs::write(out, secret_key.to_pem())?;
            tracing::info!("wrote secret key to {}", out.display());
        }

        Ok(KeypairOutput {
            pair: protocol::build_key_pair_from_secret(secret_key),
            show_secret: generated && self.out.is_none(),
        })
    }
}
