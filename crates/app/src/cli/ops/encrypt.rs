use std::path::PathBuf;

use clap::Args;
use common::crypto::{self, Cipher, HashAlgorithm, NonceError, SecretError};

use super::SecretArgs;

/// Seal a message under the message secret of an exchange
#[derive(Args, Debug, Clone)]
pub struct Encrypt {
    /// Exchange nonce as hex
    #[arg(long)]
    pub nonce: String,

    #[command(flatten)]
    pub source: SecretArgs,

    /// Message text
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub message: Option<String>,

    /// Read the message from a file
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Override the configured digest
    #[arg(long)]
    pub hash: Option<HashAlgorithm>,

    /// Override the configured cipher
    #[arg(long)]
    pub cipher: Option<Cipher>,
}

#[derive(Debug, thiserror::Error)]
pub enum EncryptError {
    #[error("invalid nonce: {0}")]
    Nonce(#[from] NonceError),
    #[error("encrypt failed: {0}")]
    Secret(#[from] SecretError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Encrypt {
    type Error = EncryptError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let nonce = crypto::Nonce::from_hex(&self.nonce)?;
        let hash = self.hash.unwrap_or(ctx.config.hash);
        let cipher = self.cipher.unwrap_or(ctx.config.cipher);
        let secret = self.source.resolve(&nonce, hash)?;

        let message = match (&self.message, &self.file) {
            (Some(message), _) => message.as_bytes().to_vec(),
            (None, Some(path)) => tokio::fs::read(path).await?,
            (None, None) => Vec::new(),
        };

        tracing::debug!("encrypting {} bytes with {}", message.len(), cipher);
        let envelope = secret.seal(&message, &nonce, cipher)?;
        Ok(envelope.to_hex())
    }
}
