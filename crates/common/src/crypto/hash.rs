//! Digest functions used to derive message secrets and share commitments
//!
//! Keccak-256 is the protocol default; the other algorithms exist for
//! deployments that do not need to interoperate with Keccak-based peers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Sha256, Sha512};
use sha3::{Digest, Keccak256};

/// Size of a Keccak-256 digest in bytes
pub const KECCAK256_SIZE: usize = 32;

/// Supported digest algorithms
///
/// Every algorithm produces at least 32 bytes. Consumers that need a fixed
/// 32-byte key take the leading 32 bytes of the digest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    #[default]
    Keccak256,
    Sha256,
    Sha512,
    Blake3,
}

impl HashAlgorithm {
    /// Digest `data` as a whole buffer
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            HashAlgorithm::Keccak256 => keccak256(data).to_vec(),
            HashAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
            HashAlgorithm::Sha512 => Sha512::digest(data).to_vec(),
            HashAlgorithm::Blake3 => blake3::hash(data).as_bytes().to_vec(),
        }
    }

    /// Digest the concatenation of `parts`, in order
    pub fn digest_parts(&self, parts: &[&[u8]]) -> Vec<u8> {
        let total = parts.iter().map(|p| p.len()).sum();
        let mut buff = Vec::with_capacity(total);
        for part in parts {
            buff.extend_from_slice(part);
        }
        self.digest(&buff)
    }

    /// Output length in bytes
    pub fn output_size(&self) -> usize {
        match self {
            HashAlgorithm::Sha512 => 64,
            _ => 32,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Keccak256 => "keccak256",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha512 => "sha512",
            HashAlgorithm::Blake3 => "blake3",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "keccak256" | "keccak-256" => Ok(HashAlgorithm::Keccak256),
            "sha256" | "sha-256" => Ok(HashAlgorithm::Sha256),
            "sha512" | "sha-512" => Ok(HashAlgorithm::Sha512),
            "blake3" => Ok(HashAlgorithm::Blake3),
            other => Err(format!("unknown hash algorithm: {}", other)),
        }
    }
}

/// Keccak-256 (the pre-standard SHA-3 padding used by Ethereum)
pub fn keccak256(data: &[u8]) -> [u8; KECCAK256_SIZE] {
    Keccak256::digest(data).into()
}
