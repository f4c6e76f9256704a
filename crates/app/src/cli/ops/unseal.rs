use clap::Args;
use common::crypto::{self, KeyError, NonceError, SealedBox, SealedBoxError};
use common::protocol;

use super::parse_public_key;
use crate::state::StateError;

/// Recover a message secret sealed for us by the seller
#[derive(Args, Debug, Clone)]
pub struct Unseal {
    /// Exchange nonce as hex
    #[arg(long)]
    pub nonce: String,

    /// Sealed box as hex
    #[arg(long)]
    pub sealed: String,

    /// Seller public key, `0x` hex or base58
    #[arg(long)]
    pub seller: String,

    /// Revealer secret key as hex (defaults to the identity key)
    #[arg(long)]
    pub secret_key: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum UnsealError {
    #[error("invalid nonce: {0}")]
    Nonce(#[from] NonceError),
    #[error("invalid seller key: {0}")]
    Key(#[from] KeyError),
    #[error("revealer key unavailable: {0}")]
    State(#[from] StateError),
    #[error("unseal failed: {0}")]
    SealedBox(#[from] SealedBoxError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Unseal {
    type Error = UnsealError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let nonce = crypto::Nonce::from_hex(&self.nonce)?;
        let sealed = SealedBox::from_hex(&self.sealed)?;
        let seller = parse_public_key(&self.seller)?;
        let revealer = ctx.secret_key(self.secret_key.as_deref())?;

        let secret = protocol::decrypt_secret_from_seller(&sealed, &nonce, &seller, &revealer)?;
        Ok(secret.to_hex())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cli::op::Op;
    use crate::cli::ops::{test_util, Seal, SecretArgs};
    use common::crypto::KeyPair;

    #[tokio::test]
    async fn test_seal_unseal() {
        let seller_dir = tempfile::tempdir().unwrap();
        let seller_ctx = test_util::context(&seller_dir);
        let seller_pk = seller_ctx.load_key().unwrap().public();

        let revealer = KeyPair::generate();
        let nonce = common::protocol::create_nonce().to_hex();
        let key = format!("0x{}", "ab".repeat(32));

        let sealed = Seal {
            nonce: nonce.clone(),
            source: SecretArgs {
                key: Some(key.clone()),
                secret: None,
            },
            revealer: revealer.public_key.to_base58(),
            secret_key: None,
            hash: None,
        }
        .execute(&seller_ctx)
        .await
        .unwrap();

        let revealer_dir = tempfile::tempdir().unwrap();
        let revealer_ctx = test_util::bare_context(&revealer_dir);
        let mut unseal = Unseal {
            nonce,
            sealed,
            seller: seller_pk.to_hex(),
            secret_key: Some(revealer.secret_key.to_hex()),
        };
        assert_eq!(unseal.execute(&revealer_ctx).await.unwrap(), key);

        unseal.secret_key = Some(KeyPair::generate().secret_key.to_hex());
        assert!(matches!(
            unseal.execute(&revealer_ctx).await,
            Err(UnsealError::SealedBox(SealedBoxError::Authentication))
        ));

        // no identity key to fall back on
        unseal.secret_key = None;
        assert!(matches!(
            unseal.execute(&revealer_ctx).await,
            Err(UnsealError::State(_))
        ));
    }
}
