pub mod combine;
pub mod convert;
pub mod decrypt;
pub mod encrypt;
pub mod init;
pub mod keypair;
pub mod message_secret;
pub mod new_share;
pub mod nonce;
pub mod seal;
pub mod split;
pub mod unseal;
pub mod version;

pub use combine::Combine;
pub use convert::Convert;
pub use decrypt::Decrypt;
pub use encrypt::Encrypt;
pub use init::Init;
pub use keypair::Keypair;
pub use message_secret::MessageSecret;
pub use new_share::NewShare;
pub use nonce::Nonce;
pub use seal::Seal;
pub use split::Split;
pub use unseal::Unseal;
pub use version::Version;

use clap::Args;
use common::codec;
use common::crypto::{self, HashAlgorithm, KeyError, PublicKey, SecretError};

/// Where the message secret of an exchange comes from
#[derive(Args, Debug, Clone)]
pub struct SecretArgs {
    /// Message secret as hex
    #[arg(long, conflicts_with = "secret", required_unless_present = "secret")]
    pub key: Option<String>,

    /// Seller secret as hex; the message secret is derived from it and the nonce
    #[arg(long)]
    pub secret: Option<String>,
}

impl SecretArgs {
    pub fn resolve(
        &self,
        nonce: &crypto::Nonce,
        hash: HashAlgorithm,
    ) -> Result<crypto::MessageSecret, SecretError> {
        match (&self.key, &self.secret) {
            (Some(key), _) => crypto::MessageSecret::from_hex(key),
            (None, Some(secret)) => {
                let secret = zeroize::Zeroizing::new(codec::hex_to_bytes(secret)?);
                Ok(crypto::MessageSecret::build(nonce, &secret, hash))
            }
            (None, None) => Err(anyhow::anyhow!("either --key or --secret is required").into()),
        }
    }
}

/// Parse a public key given as `0x` hex or base58
pub fn parse_public_key(s: &str) -> Result<PublicKey, KeyError> {
    let s = s.trim();
    if s.starts_with(codec::HEX_PREFIX) {
        PublicKey::from_hex(s)
    } else {
        PublicKey::from_base58(s)
    }
}
