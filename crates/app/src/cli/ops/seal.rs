use clap::Args;
use common::crypto::{self, HashAlgorithm, KeyError, NonceError, SealedBoxError, SecretError};
use common::protocol;

use super::{parse_public_key, SecretArgs};
use crate::state::StateError;

/// Seal the message secret of an exchange for its revealer
#[derive(Args, Debug, Clone)]
pub struct Seal {
    /// Exchange nonce as hex
    #[arg(long)]
    pub nonce: String,

    #[command(flatten)]
    pub source: SecretArgs,

    /// Revealer public key, `0x` hex or base58
    #[arg(long)]
    pub revealer: String,

    /// Seller secret key as hex (defaults to the identity key)
    #[arg(long)]
    pub secret_key: Option<String>,

    /// Override the configured digest
    #[arg(long)]
    pub hash: Option<HashAlgorithm>,
}

#[derive(Debug, thiserror::Error)]
pub enum SealError {
    #[error("invalid nonce: {0}")]
    Nonce(#[from] NonceError),
    #[error("invalid message secret: {0}")]
    Secret(#[from] SecretError),
    #[error("invalid revealer key: {0}")]
    Key(#[from] KeyError),
    #[error("seller key unavailable: {0}")]
    State(#[from] StateError),
    #[error("seal failed: {0}")]
    SealedBox(#[from] SealedBoxError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Seal {
    type Error = SealError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let nonce = crypto::Nonce::from_hex(&self.nonce)?;
        let secret = self
            .source
            .resolve(&nonce, self.hash.unwrap_or(ctx.config.hash))?;
        let revealer = parse_public_key(&self.revealer)?;
        let seller = ctx.secret_key(self.secret_key.as_deref())?;

        let sealed = protocol::encrypt_secret_for_revealer(&secret, &nonce, &revealer, &seller)?;
        tracing::debug!("sealed message secret for {}", revealer);
        Ok(sealed.to_hex())
    }
}
