use std::fmt;
use std::ops::Deref;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::codec::{self, CodecError};

/// Size of an X25519 secret key in bytes
pub const SECRET_KEY_SIZE: usize = 32;
/// Size of an X25519 public key in bytes
pub const PUBLIC_KEY_SIZE: usize = 32;
/// PEM tag used for persisted secret keys
pub const PEM_TAG: &str = "PRIVATE KEY";

/// Errors that can occur during key operations
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("invalid key size, expected 32 bytes, got {0}")]
    Size(usize),
    #[error("key decode error: {0}")]
    Codec(#[from] CodecError),
    #[error("key error: {0}")]
    Default(#[from] anyhow::Error),
}

/// Public half of a box key pair
///
/// Shared freely. A sender seals for a recipient's `PublicKey`; the recipient
/// opens with the sender's `PublicKey`.
///
/// # Examples
///
/// ```ignore
/// let secret_key = SecretKey::generate();
/// let public_key = secret_key.public();
///
/// // Serialize to hex for storage/transmission
/// let hex = public_key.to_hex();
/// let recovered = PublicKey::from_hex(&hex)?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PublicKey(#[serde(with = "crate::codec::hex_serde")] [u8; PUBLIC_KEY_SIZE]);

impl Deref for PublicKey {
    type Target = [u8; PUBLIC_KEY_SIZE];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<[u8; PUBLIC_KEY_SIZE]> for PublicKey {
    fn from(bytes: [u8; PUBLIC_KEY_SIZE]) -> Self {
        PublicKey(bytes)
    }
}

impl TryFrom<&[u8]> for PublicKey {
    type Error = KeyError;
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != PUBLIC_KEY_SIZE {
            return Err(KeyError::Size(bytes.len()));
        }
        let mut buff = [0; PUBLIC_KEY_SIZE];
        buff.copy_from_slice(bytes);
        Ok(buff.into())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl PublicKey {
    /// Parse a public key from a hexadecimal string
    ///
    /// Accepts both plain hex and "0x"-prefixed hex strings.
    pub fn from_hex(hex: &str) -> Result<Self, KeyError> {
        let bytes = codec::hex_to_bytes(hex)?;
        Self::try_from(bytes.as_slice())
    }

    pub fn from_base58(base58: &str) -> Result<Self, KeyError> {
        let bytes = codec::base58_to_bytes(base58)?;
        Self::try_from(bytes.as_slice())
    }

    /// Convert public key to raw bytes
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.0
    }

    /// Convert public key to a `0x`-prefixed hexadecimal string
    pub fn to_hex(&self) -> String {
        codec::bytes_to_hex(&self.0)
    }

    pub fn to_base58(&self) -> String {
        codec::bytes_to_base58(&self.0)
    }
}

/// Secret half of a box key pair
///
/// Never leaves the owning party. Losing it makes every box sealed for the
/// matching public key permanently unreadable; there is no recovery path.
///
/// # Examples
///
/// ```ignore
/// // Generate a new keypair
/// let secret_key = SecretKey::generate();
/// let public_key = secret_key.public();
///
/// // Persist to PEM format
/// let pem = secret_key.to_pem();
/// std::fs::write("key.pem", pem)?;
///
/// // Load from PEM
/// let pem = std::fs::read_to_string("key.pem")?;
/// let recovered = SecretKey::from_pem(&pem)?;
/// ```
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey([u8; SECRET_KEY_SIZE]);

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SecretKey").field(&self.public()).finish()
    }
}

impl From<[u8; SECRET_KEY_SIZE]> for SecretKey {
    fn from(secret: [u8; SECRET_KEY_SIZE]) -> Self {
        Self(secret)
    }
}

impl TryFrom<&[u8]> for SecretKey {
    type Error = KeyError;
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != SECRET_KEY_SIZE {
            return Err(KeyError::Size(bytes.len()));
        }
        let mut buff = [0; SECRET_KEY_SIZE];
        buff.copy_from_slice(bytes);
        Ok(Self(buff))
    }
}

impl SecretKey {
    /// Parse a secret key from a hexadecimal string
    ///
    /// Accepts both plain hex and "0x"-prefixed hex strings.
    pub fn from_hex(hex: &str) -> Result<Self, KeyError> {
        let mut bytes = codec::hex_to_bytes(hex)?;
        let key = Self::try_from(bytes.as_slice());
        bytes.zeroize();
        key
    }

    /// Generate a new random secret key using a cryptographically secure RNG
    pub fn generate() -> Self {
        let mut bytes = [0u8; SECRET_KEY_SIZE];
        rand::rng().fill_bytes(&mut bytes);
        Self::from(bytes)
    }

    /// Derive the public key from this secret key
    ///
    /// X25519 base-point multiplication of the (clamped) secret scalar, the
    /// same derivation NaCl's `crypto_box_keypair` uses.
    pub fn public(&self) -> PublicKey {
        let public = X25519PublicKey::from(&self.to_x25519());
        PublicKey(public.to_bytes())
    }

    /// Convert secret key to raw bytes
    pub fn to_bytes(&self) -> [u8; SECRET_KEY_SIZE] {
        self.0
    }

    /// Convert secret key to a `0x`-prefixed hexadecimal string
    pub fn to_hex(&self) -> String {
        codec::bytes_to_hex(&self.0)
    }

    /// Encode secret key in PEM format for storage
    ///
    /// Returns a PEM-encoded string with tag "PRIVATE KEY".
    pub fn to_pem(&self) -> String {
        let pem = pem::Pem::new(PEM_TAG, self.0.to_vec());
        pem::encode(&pem)
    }

    /// Parse a secret key from PEM format
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The PEM string is malformed
    /// - The PEM tag is not "PRIVATE KEY"
    /// - The key size is incorrect
    pub fn from_pem(pem_str: &str) -> Result<Self, KeyError> {
        let pem = pem::parse(pem_str).map_err(|e| anyhow::anyhow!("failed to parse PEM: {}", e))?;

        if pem.tag() != PEM_TAG {
            return Err(anyhow::anyhow!("invalid PEM tag, expected {}", PEM_TAG).into());
        }

        Self::try_from(pem.contents())
    }

    pub(crate) fn to_x25519(&self) -> StaticSecret {
        StaticSecret::from(self.0)
    }
}

/// A box key pair
///
/// The public half is always recomputable from the secret half, so only the
/// secret key needs to be stored.
#[derive(Debug, Clone)]
pub struct KeyPair {
    pub public_key: PublicKey,
    pub secret_key: SecretKey,
}

impl KeyPair {
    pub fn generate() -> Self {
        Self::from_secret_key(SecretKey::generate())
    }

    /// Rebuild a key pair from its secret half
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        Self {
            public_key: secret_key.public(),
            secret_key,
        }
    }
}
