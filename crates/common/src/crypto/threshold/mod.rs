//! Threshold secret sharing
//!
//! Shamir's scheme over GF(2^8), share-for-share compatible with the
//! `secrets.js` library in its default 8-bit configuration.
//!
//! # Layout
//!
//! Before splitting, the secret is prefixed with a single `1` marker bit and
//! left-padded with zeros to a multiple of 128 bits:
//!
//! ```text
//! padded = 0x00 .. 0x00 || 0x01 || secret      (len = ceil((1 + 8 * n) / 128) * 16)
//! ```
//!
//! Every padded byte is the constant term of its own random polynomial of
//! degree `min - 1`. Share `i` holds the evaluations of all of them at
//! `x = i` for `i` in `1..=total`.
//!
//! # Reconstruction contract
//!
//! [`combine`] interpolates whatever it is given. Fewer than `min` distinct
//! shares produce a wrong value, not an error. Callers who need to detect
//! that keep a [`Commitment`] next to the shares and use [`combine_verified`].

mod field;
mod share;

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use self::field::FieldElement;
use super::hash::HashAlgorithm;
use crate::codec::{self, CodecError};

pub use share::Share;

/// Largest secret accepted by [`split`], in bytes
pub const MAX_SECRET_SIZE: usize = 4096;
/// Largest number of shares a secret can be split into
pub const MAX_SHARES: usize = 255;
/// Padded secrets are a whole number of these blocks
const PAD_BYTES: usize = 16;

/// Errors that can occur while splitting or combining
#[derive(Debug, thiserror::Error)]
pub enum ThresholdError {
    #[error("invalid threshold configuration: {0}")]
    Config(String),
    #[error("no shares to combine")]
    NoShares,
    #[error("invalid share: {0}")]
    InvalidShare(String),
    #[error("shares have inconsistent lengths")]
    InconsistentShares,
    #[error("reconstructed secret does not match its commitment")]
    CommitmentMismatch,
    #[error("commitment decode error: {0}")]
    Codec(#[from] CodecError),
}

/// How many shares to create and how many are needed to recover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdParams {
    pub min_fragments: usize,
    pub total_fragments: usize,
}

impl Default for ThresholdParams {
    fn default() -> Self {
        Self {
            min_fragments: 3,
            total_fragments: 5,
        }
    }
}

impl ThresholdParams {
    pub fn new(min_fragments: usize, total_fragments: usize) -> Result<Self, ThresholdError> {
        let params = Self {
            min_fragments,
            total_fragments,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check `1 <= min <= total <= 255`
    pub fn validate(&self) -> Result<(), ThresholdError> {
        if self.min_fragments < 1 {
            return Err(ThresholdError::Config(
                "min fragments must be at least 1".to_string(),
            ));
        }
        if self.min_fragments > self.total_fragments {
            return Err(ThresholdError::Config(format!(
                "min fragments ({}) exceeds total fragments ({})",
                self.min_fragments, self.total_fragments
            )));
        }
        if self.total_fragments > MAX_SHARES {
            return Err(ThresholdError::Config(format!(
                "total fragments ({}) exceeds {}",
                self.total_fragments, MAX_SHARES
            )));
        }
        Ok(())
    }
}

/// The output of a split: `total_fragments` shares, any `min_fragments` of
/// which recover the secret
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareSet {
    min_fragments: usize,
    shares: Vec<Share>,
}

impl ShareSet {
    pub fn min_fragments(&self) -> usize {
        self.min_fragments
    }

    pub fn total_fragments(&self) -> usize {
        self.shares.len()
    }

    pub fn shares(&self) -> &[Share] {
        &self.shares
    }

    pub fn into_shares(self) -> Vec<Share> {
        self.shares
    }

    /// Text form of every share, in id order
    pub fn to_strings(&self) -> Vec<String> {
        self.shares.iter().map(Share::to_string).collect()
    }
}

impl IntoIterator for ShareSet {
    type Item = Share;
    type IntoIter = std::vec::IntoIter<Share>;

    fn into_iter(self) -> Self::IntoIter {
        self.shares.into_iter()
    }
}

/// A digest of the secret, kept alongside its shares to check reconstructions
///
/// The digest is unsalted. Only commit to secrets with enough entropy that
/// guessing them from the digest is infeasible.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commitment(#[serde(with = "crate::codec::hex_serde")] Vec<u8>);

impl Commitment {
    pub fn of(secret: &[u8], hash: HashAlgorithm) -> Self {
        Commitment(hash.digest(secret))
    }

    /// Constant-time check that `secret` is the committed value
    pub fn verify(&self, secret: &[u8], hash: HashAlgorithm) -> bool {
        let digest = hash.digest(secret);
        bool::from(self.0.as_slice().ct_eq(digest.as_slice()))
    }

    pub fn from_hex(hex: &str) -> Result<Self, ThresholdError> {
        Ok(Commitment(codec::hex_to_bytes(hex)?))
    }

    pub fn to_hex(&self) -> String {
        codec::bytes_to_hex(&self.0)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Split `secret` into `total` shares, any `min` of which recover it
pub fn split(secret: &[u8], min: usize, total: usize) -> Result<ShareSet, ThresholdError> {
    split_with_rng(secret, ThresholdParams::new(min, total)?, &mut rand::rng())
}

/// Split with an explicit source of randomness for the polynomial coefficients
pub fn split_with_rng<R: CryptoRng + ?Sized>(
    secret: &[u8],
    params: ThresholdParams,
    rng: &mut R,
) -> Result<ShareSet, ThresholdError> {
    params.validate()?;
    if secret.len() > MAX_SECRET_SIZE {
        return Err(ThresholdError::Config(format!(
            "secret is {} bytes, at most {} can be split",
            secret.len(),
            MAX_SECRET_SIZE
        )));
    }

    let padded = pad(secret);
    let min = params.min_fragments;
    let total = params.total_fragments;

    tracing::debug!(
        "splitting {} byte secret ({} padded) into {} shares, {} required",
        secret.len(),
        padded.len(),
        total,
        min
    );

    let mut data: Vec<Vec<u8>> = vec![Vec::with_capacity(padded.len()); total];
    let mut coeffs = Zeroizing::new(vec![0u8; min]);

    for &byte in padded.iter() {
        coeffs[0] = byte;
        rng.fill_bytes(&mut coeffs[1..]);

        for (i, share) in data.iter_mut().enumerate() {
            let x = FieldElement::from((i + 1) as u8);
            share.push(FieldElement::evaluate(&coeffs, x).into());
        }
    }

    let shares = data
        .into_iter()
        .enumerate()
        .map(|(i, data)| Share::new((i + 1) as u8, data))
        .collect();

    Ok(ShareSet {
        min_fragments: min,
        shares,
    })
}

/// Combine shares given in their text form
///
/// See [`combine_shares`].
pub fn combine<S: AsRef<str>>(shares: &[S]) -> Result<Vec<u8>, ThresholdError> {
    let shares = shares
        .iter()
        .map(|s| s.as_ref().parse())
        .collect::<Result<Vec<Share>, _>>()?;
    combine_shares(&shares)
}

/// Recover a secret from its shares
///
/// Share order does not matter and repeated ids are ignored after the first.
/// With fewer than the original `min` distinct shares the result is some
/// other byte string; this function cannot tell.
///
/// # Errors
///
/// Only for malformed input: an empty slice or shares whose data lengths
/// differ.
pub fn combine_shares(shares: &[Share]) -> Result<Vec<u8>, ThresholdError> {
    let unique = distinct(shares)?;
    tracing::debug!("combining {} distinct shares", unique.len());
    let padded = interpolate(&unique, FieldElement::ZERO);
    Ok(unpad(&padded))
}

/// Combine, then check the result against a commitment to the secret
pub fn combine_verified<S: AsRef<str>>(
    shares: &[S],
    commitment: &Commitment,
    hash: HashAlgorithm,
) -> Result<Vec<u8>, ThresholdError> {
    let secret = Zeroizing::new(combine(shares)?);
    if !commitment.verify(&secret, hash) {
        tracing::warn!("reconstructed secret does not match commitment");
        return Err(ThresholdError::CommitmentMismatch);
    }
    Ok(secret.to_vec())
}

/// Derive the share at `id` from existing shares of the same secret
///
/// Needs at least `min` distinct shares to produce a share consistent with
/// the others. Asking for an id that already exists returns that share.
pub fn new_share<S: AsRef<str>>(id: u8, shares: &[S]) -> Result<Share, ThresholdError> {
    if id == 0 {
        return Err(ThresholdError::Config(
            "share id must be between 1 and 255".to_string(),
        ));
    }
    let shares = shares
        .iter()
        .map(|s| s.as_ref().parse())
        .collect::<Result<Vec<Share>, _>>()?;
    let unique = distinct(&shares)?;

    tracing::debug!("deriving share {} from {} shares", id, unique.len());
    let data = interpolate(&unique, FieldElement::from(id));
    Ok(Share::new(id, data.to_vec()))
}

/// Drop repeated ids (first wins) and check all shares have the same length
fn distinct(shares: &[Share]) -> Result<Vec<&Share>, ThresholdError> {
    let first = shares.first().ok_or(ThresholdError::NoShares)?;
    let len = first.data().len();

    let mut seen = [false; 256];
    let mut unique = Vec::with_capacity(shares.len());
    for share in shares {
        if share.data().len() != len {
            return Err(ThresholdError::InconsistentShares);
        }
        if seen[share.id() as usize] {
            tracing::warn!("skipping duplicate share id {}", share.id());
            continue;
        }
        seen[share.id() as usize] = true;
        unique.push(share);
    }
    Ok(unique)
}

fn interpolate(shares: &[&Share], at: FieldElement) -> Zeroizing<Vec<u8>> {
    let len = shares.first().map(|s| s.data().len()).unwrap_or(0);
    let mut out = Zeroizing::new(Vec::with_capacity(len));
    let mut points = Zeroizing::new(Vec::with_capacity(shares.len()));

    for k in 0..len {
        points.clear();
        points.extend(
            shares
                .iter()
                .map(|s| (FieldElement::from(s.id()), FieldElement::from(s.data()[k]))),
        );
        out.push(FieldElement::interpolate(&points, at).into());
    }
    out
}

fn pad(secret: &[u8]) -> Zeroizing<Vec<u8>> {
    let bits = 1 + 8 * secret.len();
    let blocks = bits.div_ceil(8 * PAD_BYTES);
    let len = blocks * PAD_BYTES;

    let mut padded = Zeroizing::new(vec![0u8; len]);
    let start = len - secret.len();
    padded[start - 1] = 0x01;
    padded[start..].copy_from_slice(secret);
    padded
}

/// Strip leading zeros and the marker bit
///
/// Bits left over in the marker's byte are kept as a (zero-extended) byte of
/// their own. For a correct reconstruction the marker is exactly `0x01` and
/// nothing is left over. An all-zero input has no marker and is returned
/// unchanged.
fn unpad(padded: &[u8]) -> Vec<u8> {
    let Some(start) = padded.iter().position(|&b| b != 0) else {
        return padded.to_vec();
    };

    let lead = padded[start];
    let marker = 7 - lead.leading_zeros();

    let mut out = Vec::with_capacity(padded.len() - start);
    if marker > 0 {
        out.push(lead & ((1u8 << marker) - 1));
    }
    out.extend_from_slice(&padded[start + 1..]);
    out
}
