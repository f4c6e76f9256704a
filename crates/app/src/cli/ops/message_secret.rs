use clap::Args;
use common::codec::{self, CodecError};
use common::crypto::{self, HashAlgorithm, NonceError};

/// Derive the message secret of an exchange from its nonce and the seller secret
#[derive(Args, Debug, Clone)]
pub struct MessageSecret {
    /// Exchange nonce as hex
    #[arg(long)]
    pub nonce: String,

    /// Seller secret as hex
    #[arg(long)]
    pub secret: String,

    /// Override the configured digest
    #[arg(long)]
    pub hash: Option<HashAlgorithm>,
}

#[derive(Debug, thiserror::Error)]
pub enum MessageSecretError {
    #[error("invalid nonce: {0}")]
    Nonce(#[from] NonceError),
    #[error("invalid secret: {0}")]
    Codec(#[from] CodecError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for MessageSecret {
    type Error = MessageSecretError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let nonce = crypto::Nonce::from_hex(&self.nonce)?;
        let secret = zeroize::Zeroizing::new(codec::hex_to_bytes(&self.secret)?);
        let hash = self.hash.unwrap_or(ctx.config.hash);

        let message_secret = crypto::MessageSecret::build(&nonce, &secret, hash);
        Ok(message_secret.to_hex())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cli::op::Op;
    use crate::cli::ops::test_util;

    #[tokio::test]
    async fn test_keccak_vector() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_util::bare_context(&dir);
        let op = MessageSecret {
            nonce: format!("0x{}", "01".repeat(24)),
            secret: format!("0x{}01", "00".repeat(31)),
            hash: None,
        };
        assert_eq!(
            op.execute(&ctx).await.unwrap(),
            "0x3b1d0180e62c554df48eb19a014d5ec043ce3fea694e25297d99c0ece3d217bf"
        );
    }

    #[tokio::test]
    async fn test_bad_nonce() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_util::bare_context(&dir);
        let op = MessageSecret {
            nonce: "0x0101".to_string(),
            secret: "0x01".to_string(),
            hash: Some(HashAlgorithm::Sha256),
        };
        assert!(matches!(
            op.execute(&ctx).await,
            Err(MessageSecretError::Nonce(_))
        ));
    }
}
