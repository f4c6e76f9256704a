//! The sealed-reveal exchange, one function per protocol step
//!
//! The free functions use the protocol defaults (Keccak-256, NaCl
//! `secretbox`). [`Protocol`] runs the same steps with the algorithms of a
//! [`ProtocolConfig`], and bundles them into a seller side
//! ([`Protocol::lock`]) and a revealer side ([`Protocol::reveal`]).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::ProtocolConfig;
use crate::crypto::threshold::{self, Commitment, ShareSet};
use crate::crypto::{
    Cipher, Envelope, HashAlgorithm, KeyPair, MessageSecret, Nonce, PublicKey, SealedBox,
    SealedBoxError, SecretError, SecretKey, ThresholdError,
};

/// Errors from a full exchange
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("secret error: {0}")]
    Secret(#[from] SecretError),
    #[error("sealed box error: {0}")]
    SealedBox(#[from] SealedBoxError),
    #[error("threshold error: {0}")]
    Threshold(#[from] ThresholdError),
}

/// Start a new exchange
pub fn create_nonce() -> Nonce {
    Nonce::generate()
}

/// `keccak256(nonce || seller_secret)`
pub fn build_message_secret(nonce: &Nonce, seller_secret: &[u8]) -> MessageSecret {
    MessageSecret::build(nonce, seller_secret, HashAlgorithm::Keccak256)
}

/// Seal a text message under the exchange's message secret
pub fn encrypt_message(
    message: &str,
    nonce: &Nonce,
    secret: &MessageSecret,
) -> Result<Envelope, SecretError> {
    secret.seal_text(message, nonce, Cipher::XSalsa20Poly1305)
}

/// Open an envelope and decode its JSON payload
pub fn decrypt_message<T: DeserializeOwned>(
    envelope: &Envelope,
    nonce: &Nonce,
    secret: &MessageSecret,
) -> Result<T, SecretError> {
    secret.open_json(envelope, nonce, Cipher::XSalsa20Poly1305)
}

/// Seal the message secret for the revealer
pub fn encrypt_secret_for_revealer(
    secret: &MessageSecret,
    nonce: &Nonce,
    revealer: &PublicKey,
    seller: &SecretKey,
) -> Result<SealedBox, SealedBoxError> {
    SealedBox::seal_message_secret(secret, nonce, revealer, seller)
}

/// The revealer's counterpart of [`encrypt_secret_for_revealer`]
pub fn decrypt_secret_from_seller(
    sealed: &SealedBox,
    nonce: &Nonce,
    seller: &PublicKey,
    revealer: &SecretKey,
) -> Result<MessageSecret, SealedBoxError> {
    sealed.open_message_secret(nonce, seller, revealer)
}

pub fn build_key_pair_from_secret(secret_key: SecretKey) -> KeyPair {
    KeyPair::from_secret_key(secret_key)
}

/// Split a raw secret into `total` shares, `min` of which recover it
pub fn create_secret_fragments(
    secret: &[u8],
    min: usize,
    total: usize,
) -> Result<ShareSet, ThresholdError> {
    threshold::split(secret, min, total)
}

/// Recover a raw secret from its shares
///
/// Too few shares produce a wrong secret rather than an error.
pub fn combine_secret_fragments<S: AsRef<str>>(fragments: &[S]) -> Result<Vec<u8>, ThresholdError> {
    threshold::combine(fragments)
}

/// Everything the seller publishes for one exchange
///
/// The message secret itself is never part of this; only the revealer can
/// recover it from `sealed_secret`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub nonce: Nonce,
    pub envelope: Envelope,
    pub sealed_secret: SealedBox,
}

/// The exchange steps bound to a set of algorithm choices
#[derive(Debug, Clone, Copy, Default)]
pub struct Protocol {
    config: ProtocolConfig,
}

impl From<ProtocolConfig> for Protocol {
    fn from(config: ProtocolConfig) -> Self {
        Self::new(config)
    }
}

impl Protocol {
    pub fn new(config: ProtocolConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    pub fn build_message_secret(&self, nonce: &Nonce, seller_secret: &[u8]) -> MessageSecret {
        tracing::debug!(
            "building message secret with {} over {} byte secret",
            self.config.hash,
            seller_secret.len()
        );
        MessageSecret::build(nonce, seller_secret, self.config.hash)
    }

    pub fn encrypt_message(
        &self,
        message: &[u8],
        nonce: &Nonce,
        secret: &MessageSecret,
    ) -> Result<Envelope, SecretError> {
        tracing::debug!(
            "sealing {} byte message with {}",
            message.len(),
            self.config.cipher
        );
        secret.seal(message, nonce, self.config.cipher)
    }

    pub fn decrypt_message(
        &self,
        envelope: &Envelope,
        nonce: &Nonce,
        secret: &MessageSecret,
    ) -> Result<Vec<u8>, SecretError> {
        tracing::debug!(
            "opening {} byte envelope with {}",
            envelope.len(),
            self.config.cipher
        );
        secret.open(envelope, nonce, self.config.cipher)
    }

    /// Split with the configured threshold
    pub fn create_secret_fragments(&self, secret: &[u8]) -> Result<ShareSet, ThresholdError> {
        let params = self.config.threshold;
        threshold::split(secret, params.min_fragments, params.total_fragments)
    }

    /// Commit to a secret with the configured digest
    pub fn commit(&self, secret: &[u8]) -> Commitment {
        Commitment::of(secret, self.config.hash)
    }

    /// Combine and check against a commitment made with [`Protocol::commit`]
    pub fn combine_verified<S: AsRef<str>>(
        &self,
        fragments: &[S],
        commitment: &Commitment,
    ) -> Result<Vec<u8>, ThresholdError> {
        threshold::combine_verified(fragments, commitment, self.config.hash)
    }

    /// Seller side: lock `message` for `revealer` under a fresh nonce
    pub fn lock(
        &self,
        message: &[u8],
        seller_secret: &[u8],
        revealer: &PublicKey,
        seller: &SecretKey,
    ) -> Result<Exchange, ProtocolError> {
        let nonce = create_nonce();
        let secret = self.build_message_secret(&nonce, seller_secret);
        let envelope = self.encrypt_message(message, &nonce, &secret)?;
        let sealed_secret = SealedBox::seal_message_secret(&secret, &nonce, revealer, seller)?;

        tracing::debug!("locked exchange {}", nonce.to_hex());
        Ok(Exchange {
            nonce,
            envelope,
            sealed_secret,
        })
    }

    /// Revealer side: recover the message secret, then the message
    pub fn reveal(
        &self,
        exchange: &Exchange,
        seller: &PublicKey,
        revealer: &SecretKey,
    ) -> Result<Vec<u8>, ProtocolError> {
        let secret = exchange
            .sealed_secret
            .open_message_secret(&exchange.nonce, seller, revealer)?;
        let message = self.decrypt_message(&exchange.envelope, &exchange.nonce, &secret)?;

        tracing::debug!("revealed exchange {}", exchange.nonce.to_hex());
        Ok(message)
    }
}
