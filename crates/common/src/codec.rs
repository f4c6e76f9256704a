//! Text and integer encodings for byte buffers
//!
//! Everything that crosses a process boundary (keys, nonces, envelopes,
//! sealed boxes) travels as text. This module holds the canonical forms:
//!
//! - **Hex**: `0x`-prefixed, two lowercase digits per byte. Parsing accepts
//!   the prefix as optional and either case.
//! - **Base58**: Bitcoin alphabet.
//! - **Big integers**: big-endian interpretation of a byte buffer.
//! - **Hex arrays**: one unpadded `0x`-prefixed string per byte.

use num_bigint::BigUint;

/// Prefix used on every hex string we emit
pub const HEX_PREFIX: &str = "0x";

/// Errors that can occur while decoding text into bytes
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("invalid base58: {0}")]
    Base58(#[from] bs58::decode::Error),
    #[error("invalid length, expected {expected} bytes, got {got}")]
    Length { expected: usize, got: usize },
    #[error("integer does not fit in {0} bytes")]
    Overflow(usize),
    #[error("invalid byte literal: {0}")]
    Byte(String),
}

/// Encode bytes as a `0x`-prefixed lowercase hex string
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    format!("{}{}", HEX_PREFIX, hex::encode(bytes))
}

/// Decode a hex string, with or without the `0x` prefix
pub fn hex_to_bytes(hex: &str) -> Result<Vec<u8>, CodecError> {
    let hex = strip_hex_prefix(hex);
    Ok(hex::decode(hex)?)
}

/// Decode a hex string into a fixed-width array
///
/// # Errors
///
/// Returns [`CodecError::Length`] if the decoded value is not exactly `N` bytes.
pub fn hex_to_array<const N: usize>(hex: &str) -> Result<[u8; N], CodecError> {
    let bytes = hex_to_bytes(hex)?;
    if bytes.len() != N {
        return Err(CodecError::Length {
            expected: N,
            got: bytes.len(),
        });
    }
    let mut buff = [0; N];
    buff.copy_from_slice(&bytes);
    Ok(buff)
}

pub fn bytes_to_base58(bytes: &[u8]) -> String {
    bs58::encode(bytes).into_string()
}

pub fn base58_to_bytes(base58: &str) -> Result<Vec<u8>, CodecError> {
    Ok(bs58::decode(base58).into_vec()?)
}

/// Interpret bytes as a big-endian unsigned integer
pub fn bytes_to_bigint(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Write an integer as exactly `length` big-endian bytes, left-padded with zeros
///
/// # Errors
///
/// Returns [`CodecError::Overflow`] if the integer needs more than `length` bytes.
pub fn bigint_to_bytes(value: &BigUint, length: usize) -> Result<Vec<u8>, CodecError> {
    let bytes = value.to_bytes_be();
    // zero encodes as a single 0x00 byte
    let significant = match bytes.iter().position(|b| *b != 0) {
        Some(start) => &bytes[start..],
        None => &[][..],
    };
    if significant.len() > length {
        return Err(CodecError::Overflow(length));
    }
    let mut out = vec![0; length];
    out[length - significant.len()..].copy_from_slice(significant);
    Ok(out)
}

/// Encode each byte as its own unpadded hex literal (`0x0`, `0xff`, ...)
pub fn bytes_to_hex_array(bytes: &[u8]) -> Vec<String> {
    bytes.iter().map(|b| format!("{}{:x}", HEX_PREFIX, b)).collect()
}

/// Parse a sequence of per-byte hex literals back into bytes
pub fn hex_array_to_bytes<S: AsRef<str>>(items: &[S]) -> Result<Vec<u8>, CodecError> {
    items
        .iter()
        .map(|item| {
            let item = item.as_ref();
            u8::from_str_radix(strip_hex_prefix(item), 16)
                .map_err(|_| CodecError::Byte(item.to_string()))
        })
        .collect()
}

/// Serde adapter that writes byte buffers as `0x` hex strings
///
/// Use with `#[serde(with = "crate::codec::hex_serde")]` on any field that is
/// `AsRef<[u8]>` and `TryFrom<Vec<u8>>`, so fixed-size arrays get their length
/// checked on the way in.
pub mod hex_serde {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<T, S>(bytes: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: AsRef<[u8]>,
        S: Serializer,
    {
        serializer.serialize_str(&super::bytes_to_hex(bytes.as_ref()))
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: TryFrom<Vec<u8>>,
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = super::hex_to_bytes(&s).map_err(de::Error::custom)?;
        let got = bytes.len();
        T::try_from(bytes)
            .map_err(|_| de::Error::custom(format!("unexpected byte length {}", got)))
    }
}

pub(crate) fn strip_hex_prefix(hex: &str) -> &str {
    hex.strip_prefix(HEX_PREFIX)
        .or_else(|| hex.strip_prefix("0X"))
        .unwrap_or(hex)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_hex_prefix_and_case() {
        assert_eq!(bytes_to_hex(&[0x00, 0xab, 0x0f]), "0x00ab0f");
        assert_eq!(bytes_to_hex(&[]), "0x");
        assert_eq!(hex_to_bytes("0x00AB0f").unwrap(), vec![0x00, 0xab, 0x0f]);
        assert_eq!(hex_to_bytes("00ab0f").unwrap(), vec![0x00, 0xab, 0x0f]);
    }

    #[test]
    fn test_hex_rejects_garbage() {
        assert!(hex_to_bytes("0xzz").is_err());
        assert!(hex_to_bytes("0xabc").is_err());
    }

    #[test]
    fn test_hex_to_array_length() {
        let arr: [u8; 2] = hex_to_array("0x0102").unwrap();
        assert_eq!(arr, [1, 2]);

        let err = hex_to_array::<3>("0x0102").unwrap_err();
        assert!(matches!(
            err,
            CodecError::Length {
                expected: 3,
                got: 2
            }
        ));
    }

    #[test]
    fn test_base58_known_value() {
        // leading zero bytes map to leading '1's in the bitcoin alphabet
        assert_eq!(bytes_to_base58(&[0, 0, 1]), "112");
        assert_eq!(base58_to_bytes("112").unwrap(), vec![0, 0, 1]);
        assert!(base58_to_bytes("0OIl").is_err());
    }

    #[test]
    fn test_bigint_padding() {
        let value = bytes_to_bigint(&[0x00, 0x00, 0x01, 0x00]);
        assert_eq!(value, BigUint::from(256u32));
        assert_eq!(bigint_to_bytes(&value, 4).unwrap(), vec![0, 0, 1, 0]);
        assert_eq!(bigint_to_bytes(&BigUint::from(0u8), 2).unwrap(), vec![0, 0]);
        assert!(matches!(
            bigint_to_bytes(&value, 1),
            Err(CodecError::Overflow(1))
        ));
    }

    #[test]
    fn test_hex_array() {
        let items = bytes_to_hex_array(&[0, 10, 255]);
        assert_eq!(items, vec!["0x0", "0xa", "0xff"]);
        assert_eq!(hex_array_to_bytes(&items).unwrap(), vec![0, 10, 255]);
        assert!(hex_array_to_bytes(&["0x100"]).is_err());
    }
}
