//! Message secrets and the symmetric envelope
//!
//! A [`MessageSecret`] is derived per exchange by hashing the exchange nonce
//! together with the seller's long-term secret. It keys an authenticated
//! cipher that seals the exchange payload into an [`Envelope`]:
//!
//! ```text
//! message_secret = digest(nonce || seller_secret)[..32]
//! envelope       = tag (16 bytes) || ciphertext     xsalsa20poly1305
//!                = ciphertext || tag (16 bytes)     xchacha20poly1305
//! ```
//!
//! The default cipher is XSalsa20-Poly1305, which is byte-for-byte NaCl
//! `secretbox` and carries the tag in front. XChaCha20-Poly1305 is available
//! as an alternative with the same nonce, key and tag sizes; it appends the
//! tag, as the AEAD construction defines.

use std::fmt;
use std::str::FromStr;

use chacha20poly1305::aead::generic_array::GenericArray;
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::XChaCha20Poly1305;
use crypto_secretbox::XSalsa20Poly1305;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::hash::HashAlgorithm;
use super::nonce::Nonce;
use crate::codec::{self, CodecError};

/// Size of a message secret in bytes (256 bits)
pub const SECRET_SIZE: usize = 32;
/// Size of the Poly1305 authentication tag in bytes
pub const TAG_SIZE: usize = 16;

/// Errors that can occur during sealing or opening an envelope
#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    /// Wrong key, wrong nonce or tampered envelope. Never retried.
    #[error("envelope authentication failed")]
    Authentication,
    #[error("invalid secret size, expected 32 bytes, got {0}")]
    Size(usize),
    #[error("secret decode error: {0}")]
    Codec(#[from] CodecError),
    #[error("opened payload is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("opened payload is not valid json: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("secret error: {0}")]
    Default(#[from] anyhow::Error),
}

/// Authenticated ciphers usable for the envelope
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cipher {
    /// NaCl `secretbox`
    #[default]
    #[serde(rename = "xsalsa20poly1305")]
    XSalsa20Poly1305,
    #[serde(rename = "xchacha20poly1305")]
    XChaCha20Poly1305,
}

impl Cipher {
    fn encrypt(
        &self,
        key: &[u8; SECRET_SIZE],
        nonce: &Nonce,
        plaintext: &[u8],
    ) -> Result<Vec<u8>, SecretError> {
        let nonce = GenericArray::from_slice(nonce.bytes());
        let sealed = match self {
            Cipher::XSalsa20Poly1305 => XSalsa20Poly1305::new(GenericArray::from_slice(key))
                .encrypt(nonce, plaintext),
            Cipher::XChaCha20Poly1305 => XChaCha20Poly1305::new(GenericArray::from_slice(key))
                .encrypt(nonce, plaintext),
        };
        sealed.map_err(|_| anyhow::anyhow!("encrypt error").into())
    }

    fn decrypt(
        &self,
        key: &[u8; SECRET_SIZE],
        nonce: &Nonce,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, SecretError> {
        let nonce = GenericArray::from_slice(nonce.bytes());
        let opened = match self {
            Cipher::XSalsa20Poly1305 => XSalsa20Poly1305::new(GenericArray::from_slice(key))
                .decrypt(nonce, ciphertext),
            Cipher::XChaCha20Poly1305 => XChaCha20Poly1305::new(GenericArray::from_slice(key))
                .decrypt(nonce, ciphertext),
        };
        opened.map_err(|_| SecretError::Authentication)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Cipher::XSalsa20Poly1305 => "xsalsa20poly1305",
            Cipher::XChaCha20Poly1305 => "xchacha20poly1305",
        }
    }
}

impl fmt::Display for Cipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cipher {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xsalsa20poly1305" | "secretbox" => Ok(Cipher::XSalsa20Poly1305),
            "xchacha20poly1305" => Ok(Cipher::XChaCha20Poly1305),
            other => Err(format!("unknown cipher: {}", other)),
        }
    }
}

/// A sealed payload
///
/// Laid out as `tag || ciphertext` under [`Cipher::XSalsa20Poly1305`] and as
/// `ciphertext || tag` under [`Cipher::XChaCha20Poly1305`]. Either way it is
/// exactly [`TAG_SIZE`] bytes longer than the plaintext.
///
/// Bound to exactly one `(nonce, message secret)` pair. The nonce is not part
/// of the envelope and has to be carried alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Envelope(#[serde(with = "crate::codec::hex_serde")] Vec<u8>);

impl From<Vec<u8>> for Envelope {
    fn from(bytes: Vec<u8>) -> Self {
        Envelope(bytes)
    }
}

impl From<Envelope> for Vec<u8> {
    fn from(envelope: Envelope) -> Self {
        envelope.0
    }
}

impl Envelope {
    pub fn from_hex(hex: &str) -> Result<Self, SecretError> {
        Ok(Envelope(codec::hex_to_bytes(hex)?))
    }

    pub fn to_hex(&self) -> String {
        codec::bytes_to_hex(&self.0)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The 256-bit symmetric key of one exchange
///
/// Always recomputed from its inputs and never serialized: it leaves the
/// process only inside a [`SealedBox`](super::SealedBox). The bytes are wiped
/// on drop and `Debug` output is redacted.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MessageSecret([u8; SECRET_SIZE]);

impl fmt::Debug for MessageSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MessageSecret(..)")
    }
}

impl PartialEq for MessageSecret {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for MessageSecret {}

impl From<[u8; SECRET_SIZE]> for MessageSecret {
    fn from(bytes: [u8; SECRET_SIZE]) -> Self {
        MessageSecret(bytes)
    }
}

impl MessageSecret {
    /// Derive the message secret for one exchange
    ///
    /// Computes `hash(nonce || secret)` and keeps the leading `SECRET_SIZE`
    /// bytes. The concatenation order is part of the wire protocol.
    pub fn build(nonce: &Nonce, secret: &[u8], hash: HashAlgorithm) -> Self {
        let mut digest = hash.digest_parts(&[nonce.bytes(), secret]);
        let mut buff = [0; SECRET_SIZE];
        buff.copy_from_slice(&digest[..SECRET_SIZE]);
        digest.zeroize();
        Self(buff)
    }

    /// Create a secret from a byte slice
    ///
    /// # Errors
    ///
    /// Returns an error if the slice length is not exactly `SECRET_SIZE` bytes.
    pub fn from_slice(data: &[u8]) -> Result<Self, SecretError> {
        if data.len() != SECRET_SIZE {
            return Err(SecretError::Size(data.len()));
        }
        let mut buff = [0; SECRET_SIZE];
        buff.copy_from_slice(data);
        Ok(buff.into())
    }

    pub fn from_hex(hex: &str) -> Result<Self, SecretError> {
        let mut bytes = codec::hex_to_bytes(hex)?;
        let secret = Self::from_slice(&bytes);
        bytes.zeroize();
        secret
    }

    pub fn to_hex(&self) -> String {
        codec::bytes_to_hex(&self.0)
    }

    /// Get a reference to the secret key bytes
    pub fn bytes(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Seal `plaintext` under this secret and `nonce`
    ///
    /// The caller must not reuse `nonce` with this secret for a different
    /// plaintext.
    ///
    /// # Errors
    ///
    /// Returns an error only if the underlying cipher rejects the input, which
    /// cannot happen for in-memory buffers of sane size.
    pub fn seal(
        &self,
        plaintext: &[u8],
        nonce: &Nonce,
        cipher: Cipher,
    ) -> Result<Envelope, SecretError> {
        cipher.encrypt(&self.0, nonce, plaintext).map(Envelope)
    }

    /// Open an envelope sealed under this secret and `nonce`
    ///
    /// The tag is checked before any plaintext is released.
    ///
    /// # Errors
    ///
    /// Returns [`SecretError::Authentication`] for a wrong secret, a wrong nonce,
    /// a wrong cipher or any modification of the envelope.
    pub fn open(
        &self,
        envelope: &Envelope,
        nonce: &Nonce,
        cipher: Cipher,
    ) -> Result<Vec<u8>, SecretError> {
        cipher.decrypt(&self.0, nonce, envelope.bytes())
    }

    /// Seal a text payload (UTF-8 encoded)
    pub fn seal_text(
        &self,
        message: &str,
        nonce: &Nonce,
        cipher: Cipher,
    ) -> Result<Envelope, SecretError> {
        self.seal(message.as_bytes(), nonce, cipher)
    }

    /// Open an envelope holding a text payload
    ///
    /// # Errors
    ///
    /// Authentication failures are reported as [`SecretError::Authentication`];
    /// an authentic payload that is not UTF-8 as [`SecretError::Utf8`].
    pub fn open_text(
        &self,
        envelope: &Envelope,
        nonce: &Nonce,
        cipher: Cipher,
    ) -> Result<String, SecretError> {
        let plaintext = self.open(envelope, nonce, cipher)?;
        Ok(String::from_utf8(plaintext)?)
    }

    /// Serialize `payload` as JSON and seal it
    pub fn seal_json<T: Serialize>(
        &self,
        payload: &T,
        nonce: &Nonce,
        cipher: Cipher,
    ) -> Result<Envelope, SecretError> {
        let json = serde_json::to_string(payload)?;
        self.seal_text(&json, nonce, cipher)
    }

    /// Open an envelope and decode its JSON payload
    ///
    /// # Errors
    ///
    /// Decoding failures are reported as [`SecretError::Payload`], distinct from
    /// [`SecretError::Authentication`].
    pub fn open_json<T: DeserializeOwned>(
        &self,
        envelope: &Envelope,
        nonce: &Nonce,
        cipher: Cipher,
    ) -> Result<T, SecretError> {
        let text = self.open_text(envelope, nonce, cipher)?;
        Ok(serde_json::from_str(&text)?)
    }
}
