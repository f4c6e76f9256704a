use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

use super::ThresholdError;

/// Bit width of the field, as the leading base-36 digit of a share string
pub(crate) const BITS: u32 = 8;
const BITS_DIGIT: char = '8';

/// One share of a split secret
///
/// The text form is `"8" || id (2 hex digits) || data (hex)`, e.g.
/// `801535353...52f8`. `data[k]` is the evaluation of the `k`th byte's
/// polynomial at `x = id`.
#[derive(Clone, PartialEq, Eq, Hash, Zeroize)]
pub struct Share {
    id: u8,
    data: Vec<u8>,
}

impl fmt::Debug for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Share")
            .field("id", &self.id)
            .field("len", &self.data.len())
            .finish()
    }
}

impl Share {
    pub(crate) fn new(id: u8, data: Vec<u8>) -> Self {
        Self { id, data }
    }

    /// The x coordinate of this share, in `1..=255`
    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Display for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02x}{}", BITS_DIGIT, self.id, hex::encode(&self.data))
    }
}

impl FromStr for Share {
    type Err = ThresholdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = |reason: &str| ThresholdError::InvalidShare(reason.to_string());

        let mut chars = s.chars();
        let bits = chars
            .next()
            .and_then(|c| c.to_digit(36))
            .ok_or_else(|| invalid("missing bit width"))?;
        if bits != BITS {
            return Err(ThresholdError::InvalidShare(format!(
                "unsupported bit width {}",
                bits
            )));
        }

        let rest = chars.as_str();
        if rest.len() < 2 || !rest.is_char_boundary(2) {
            return Err(invalid("missing share id"));
        }
        let (id, data) = rest.split_at(2);

        let id = u8::from_str_radix(id, 16).map_err(|_| invalid("share id is not hex"))?;
        if id == 0 {
            return Err(invalid("share id must not be zero"));
        }
        if data.is_empty() {
            return Err(invalid("share has no data"));
        }
        let data = hex::decode(data).map_err(|e| ThresholdError::InvalidShare(e.to_string()))?;

        Ok(Self { id, data })
    }
}

impl Serialize for Share {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Share {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
