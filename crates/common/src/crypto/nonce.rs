use std::ops::Deref;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::codec::{self, CodecError};

/// Size of an XSalsa20 / XChaCha20 nonce in bytes
pub const NONCE_SIZE: usize = 24;

/// Errors that can occur when building a nonce
#[derive(Debug, thiserror::Error)]
pub enum NonceError {
    #[error("invalid nonce size, expected 24 bytes, got {0}")]
    Size(usize),
    #[error("nonce decode error: {0}")]
    Codec(#[from] CodecError),
}

/// A 192-bit one-time value for a single exchange
///
/// One nonce drives one whole exchange: it is hashed into the message secret,
/// used to seal the envelope under that secret and used again to seal the
/// secret for the revealer (under a different key). Nonces are not secret and
/// are shipped next to the ciphertexts they belong to.
///
/// Never seal two different payloads under the same `(nonce, key)` pair.
/// Doing so leaks the XOR of the plaintexts and allows tag forgery. Nothing in
/// this crate tracks used nonces; always start an exchange with
/// [`Nonce::generate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Nonce(#[serde(with = "crate::codec::hex_serde")] [u8; NONCE_SIZE]);

impl Deref for Nonce {
    type Target = [u8; NONCE_SIZE];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<[u8; NONCE_SIZE]> for Nonce {
    fn from(bytes: [u8; NONCE_SIZE]) -> Self {
        Nonce(bytes)
    }
}

impl TryFrom<&[u8]> for Nonce {
    type Error = NonceError;
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(bytes)
    }
}

impl Nonce {
    /// Generate a fresh random nonce from the thread-local CSPRNG
    pub fn generate() -> Self {
        let mut buff = [0; NONCE_SIZE];
        rand::rng().fill_bytes(&mut buff);
        Self(buff)
    }

    /// Create a nonce from a byte slice
    ///
    /// # Errors
    ///
    /// Returns an error if the slice length is not exactly `NONCE_SIZE` bytes.
    pub fn from_slice(data: &[u8]) -> Result<Self, NonceError> {
        if data.len() != NONCE_SIZE {
            return Err(NonceError::Size(data.len()));
        }
        let mut buff = [0; NONCE_SIZE];
        buff.copy_from_slice(data);
        Ok(buff.into())
    }

    pub fn from_hex(hex: &str) -> Result<Self, NonceError> {
        let bytes = codec::hex_to_bytes(hex)?;
        Self::from_slice(&bytes)
    }

    pub fn to_hex(&self) -> String {
        codec::bytes_to_hex(&self.0)
    }

    pub fn bytes(&self) -> &[u8] {
        self.0.as_ref()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_generate_is_fresh() {
        let a = Nonce::generate();
        let b = Nonce::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_nonce_size_validation() {
        assert!(matches!(Nonce::from_slice(&[0; 12]), Err(NonceError::Size(12))));
        assert!(Nonce::from_slice(&[0; 32]).is_err());
        assert!(Nonce::from_slice(&[0; NONCE_SIZE]).is_ok());
    }

    #[test]
    fn test_nonce_hex() {
        let nonce = Nonce::from([1; NONCE_SIZE]);
        let hex = nonce.to_hex();
        assert_eq!(hex, format!("0x{}", "01".repeat(NONCE_SIZE)));
        assert_eq!(Nonce::from_hex(&hex).unwrap(), nonce);
        assert!(Nonce::from_hex("0x0101").is_err());
    }

    #[test]
    fn test_serde_as_hex() {
        let nonce = Nonce::from([0x01; NONCE_SIZE]);
        let json = serde_json::to_string(&nonce).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "01".repeat(NONCE_SIZE)));
        assert_eq!(serde_json::from_str::<Nonce>(&json).unwrap(), nonce);
        assert!(serde_json::from_str::<Nonce>("\"0x0101\"").is_err());
        assert!(serde_json::from_str::<Nonce>("[1,1,1]").is_err());
    }
}
