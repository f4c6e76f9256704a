//! Public-key sealed transmission
//!
//! The seller hands the message secret of an exchange to a designated
//! revealer by sealing it in a NaCl `crypto_box`:
//!
//! 1. **Key agreement**: X25519 between the sender's secret key and the
//!    recipient's public key
//! 2. **Key derivation**: HSalsa20 over the shared point
//! 3. **Seal**: XSalsa20-Poly1305 under the derived key and the exchange nonce
//!
//! The recipient opens the box with its own secret key and the sender's public
//! key. Both identities are bound into the ciphertext: a box sealed for one
//! recipient cannot be opened by another, and a box opened against the wrong
//! sender key fails authentication.
//!
//! # Wire Format
//!
//! ```text
//! [ tag: 16 bytes ][ ciphertext: len(payload) bytes ]
//! ```

use crypto_box::aead::generic_array::GenericArray;
use crypto_box::aead::Aead;
use crypto_box::SalsaBox;
use serde::{Deserialize, Serialize};

use super::keys::{KeyError, PublicKey, SecretKey};
use super::nonce::Nonce;
use super::secret::{MessageSecret, SecretError, SECRET_SIZE, TAG_SIZE};
use crate::codec::{self, CodecError};

/// Size of a sealed message secret in bytes
pub const SEALED_SECRET_SIZE: usize = SECRET_SIZE + TAG_SIZE;

/// Errors that can occur while sealing or opening a box
#[derive(Debug, thiserror::Error)]
pub enum SealedBoxError {
    /// Wrong recipient key, wrong sender key, wrong nonce or tampered box
    #[error("sealed box authentication failed")]
    Authentication,
    #[error("key error: {0}")]
    Key(#[from] KeyError),
    #[error("secret error: {0}")]
    Secret(#[from] SecretError),
    #[error("sealed box decode error: {0}")]
    Codec(#[from] CodecError),
    #[error("sealed box error: {0}")]
    Default(#[from] anyhow::Error),
}

/// A payload sealed for exactly one recipient by exactly one sender
///
/// # Examples
///
/// ```ignore
/// // The seller seals the exchange secret for the revealer
/// let sealed = SealedBox::seal_message_secret(&secret, &nonce, &revealer.public_key, &seller.secret_key)?;
///
/// // The revealer opens it with their secret key and the seller's public key
/// let recovered = sealed.open_message_secret(&nonce, &seller.public_key, &revealer.secret_key)?;
/// assert_eq!(secret, recovered);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SealedBox(#[serde(with = "crate::codec::hex_serde")] Vec<u8>);

impl From<Vec<u8>> for SealedBox {
    fn from(bytes: Vec<u8>) -> Self {
        SealedBox(bytes)
    }
}

impl SealedBox {
    /// Seal `payload` for `recipient`, authenticated by `sender`
    ///
    /// # Errors
    ///
    /// Returns an error only if the underlying cipher rejects the input.
    pub fn seal(
        payload: &[u8],
        nonce: &Nonce,
        recipient: &PublicKey,
        sender: &SecretKey,
    ) -> Result<Self, SealedBoxError> {
        let salsa_box = salsa_box(recipient, sender);
        let sealed = salsa_box
            .encrypt(GenericArray::from_slice(nonce.bytes()), payload)
            .map_err(|_| anyhow::anyhow!("box encrypt error"))?;
        Ok(SealedBox(sealed))
    }

    /// Open a box sealed by `sender` for the holder of `recipient`
    ///
    /// # Errors
    ///
    /// Returns [`SealedBoxError::Authentication`] if the box was sealed for a
    /// different recipient, by a different sender, under a different nonce,
    /// or was modified in transit.
    pub fn open(
        &self,
        nonce: &Nonce,
        sender: &PublicKey,
        recipient: &SecretKey,
    ) -> Result<Vec<u8>, SealedBoxError> {
        let salsa_box = salsa_box(sender, recipient);
        salsa_box
            .decrypt(GenericArray::from_slice(nonce.bytes()), self.0.as_slice())
            .map_err(|_| SealedBoxError::Authentication)
    }

    /// Seal the message secret of an exchange for its revealer
    pub fn seal_message_secret(
        secret: &MessageSecret,
        nonce: &Nonce,
        revealer: &PublicKey,
        sender: &SecretKey,
    ) -> Result<Self, SealedBoxError> {
        Self::seal(secret.bytes(), nonce, revealer, sender)
    }

    /// Open a box holding a message secret
    pub fn open_message_secret(
        &self,
        nonce: &Nonce,
        sender: &PublicKey,
        revealer: &SecretKey,
    ) -> Result<MessageSecret, SealedBoxError> {
        let payload = zeroize::Zeroizing::new(self.open(nonce, sender, revealer)?);
        Ok(MessageSecret::from_slice(&payload)?)
    }

    pub fn from_hex(hex: &str) -> Result<Self, SealedBoxError> {
        Ok(SealedBox(codec::hex_to_bytes(hex)?))
    }

    pub fn to_hex(&self) -> String {
        codec::bytes_to_hex(&self.0)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }
}

fn salsa_box(public: &PublicKey, secret: &SecretKey) -> SalsaBox {
    let public = crypto_box::PublicKey::from(public.to_bytes());
    let secret = crypto_box::SecretKey::from(secret.to_bytes());
    SalsaBox::new(&public, &secret)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::crypto::keys::KeyPair;

    #[test]
    fn test_seal_open() {
        let seller = KeyPair::generate();
        let revealer = KeyPair::generate();
        let nonce = Nonce::generate();

        let sealed =
            SealedBox::seal(b"payload", &nonce, &revealer.public_key, &seller.secret_key).unwrap();
        let opened = sealed
            .open(&nonce, &seller.public_key, &revealer.secret_key)
            .unwrap();
        assert_eq!(opened, b"payload");
    }

    #[test]
    fn test_wrong_recipient_fails() {
        let seller = KeyPair::generate();
        let revealer = KeyPair::generate();
        let eve = KeyPair::generate();
        let nonce = Nonce::generate();

        let sealed =
            SealedBox::seal(b"payload", &nonce, &revealer.public_key, &seller.secret_key).unwrap();

        assert!(matches!(
            sealed.open(&nonce, &seller.public_key, &eve.secret_key),
            Err(SealedBoxError::Authentication)
        ));
        assert!(matches!(
            sealed.open(&nonce, &eve.public_key, &revealer.secret_key),
            Err(SealedBoxError::Authentication)
        ));
        assert!(matches!(
            sealed.open(&Nonce::generate(), &seller.public_key, &revealer.secret_key),
            Err(SealedBoxError::Authentication)
        ));
    }

    #[test]
    fn test_same_nonce_different_recipients() {
        let seller = KeyPair::generate();
        let alice = KeyPair::generate();
        let bob = KeyPair::generate();
        let nonce = Nonce::generate();

        let for_alice =
            SealedBox::seal(b"payload", &nonce, &alice.public_key, &seller.secret_key).unwrap();
        let for_bob =
            SealedBox::seal(b"payload", &nonce, &bob.public_key, &seller.secret_key).unwrap();
        assert_ne!(for_alice, for_bob);
        assert!(for_alice
            .open(&nonce, &seller.public_key, &bob.secret_key)
            .is_err());
    }

    #[test]
    fn test_message_secret_roundtrip() {
        let seller = KeyPair::generate();
        let revealer = KeyPair::generate();
        let nonce = Nonce::generate();
        let secret = MessageSecret::from([5; SECRET_SIZE]);

        let sealed = SealedBox::seal_message_secret(
            &secret,
            &nonce,
            &revealer.public_key,
            &seller.secret_key,
        )
        .unwrap();
        assert_eq!(sealed.bytes().len(), SEALED_SECRET_SIZE);

        let hex = sealed.to_hex();
        let sealed = SealedBox::from_hex(&hex).unwrap();
        let recovered = sealed
            .open_message_secret(&nonce, &seller.public_key, &revealer.secret_key)
            .unwrap();
        assert_eq!(secret, recovered);
    }

    #[test]
    fn test_short_payload_is_not_a_message_secret() {
        let seller = KeyPair::generate();
        let revealer = KeyPair::generate();
        let nonce = Nonce::generate();

        let sealed =
            SealedBox::seal(b"short", &nonce, &revealer.public_key, &seller.secret_key).unwrap();
        assert!(matches!(
            sealed.open_message_secret(&nonce, &seller.public_key, &revealer.secret_key),
            Err(SealedBoxError::Secret(SecretError::Size(5)))
        ));
    }
}
