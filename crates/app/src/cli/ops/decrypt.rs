use std::path::PathBuf;

use clap::Args;
use common::codec;
use common::crypto::{self, Cipher, Envelope, HashAlgorithm, NonceError, SecretError};

use super::SecretArgs;

/// Open an envelope with the message secret of its exchange
#[derive(Args, Debug, Clone)]
pub struct Decrypt {
    /// Exchange nonce as hex
    #[arg(long)]
    pub nonce: String,

    #[command(flatten)]
    pub source: SecretArgs,

    /// Envelope as hex
    #[arg(long)]
    pub envelope: String,

    /// Decode the message as JSON and pretty print it
    #[arg(long, conflicts_with_all = ["hex", "out"])]
    pub json: bool,

    /// Print the raw message bytes as hex
    #[arg(long, conflicts_with = "out")]
    pub hex: bool,

    /// Write the raw message bytes to a file
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Override the configured digest
    #[arg(long)]
    pub hash: Option<HashAlgorithm>,

    /// Override the configured cipher
    #[arg(long)]
    pub cipher: Option<Cipher>,
}

#[derive(Debug, thiserror::Error)]
pub enum DecryptError {
    #[error("invalid nonce: {0}")]
    Nonce(#[from] NonceError),
    #[error("decrypt failed: {0}")]
    Secret(#[from] SecretError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Decrypt {
    type Error = DecryptError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let nonce = crypto::Nonce::from_hex(&self.nonce)?;
        let hash = self.hash.unwrap_or(ctx.config.hash);
        let cipher = self.cipher.unwrap_or(ctx.config.cipher);
        let secret = self.source.resolve(&nonce, hash)?;
        let envelope = Envelope::from_hex(&self.envelope)?;

        if self.json {
            let value: serde_json::Value = secret.open_json(&envelope, &nonce, cipher)?;
            return Ok(serde_json::to_string_pretty(&value)?);
        }
        if self.hex || self.out.is_some() {
            let message = secret.open(&envelope, &nonce, cipher)?;
            if let Some(path) = &self.out {
                tokio::fs::write(path, &message).await?;
                return Ok(format!("wrote {} bytes to {}", message.len(), path.display()));
            }
            return Ok(codec::bytes_to_hex(&message));
        }
        Ok(secret.open_text(&envelope, &nonce, cipher)?)
    }
}
