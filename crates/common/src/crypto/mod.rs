//! Cryptographic primitives for Veil
//!
//! Veil lets a seller lock a message behind a per-exchange secret and later
//! hand that secret to a designated revealer, optionally spreading a raw
//! secret over several custodians:
//!
//! - **Hashing**: Keccak-256 (or another [`HashAlgorithm`]) derives the
//!   [`MessageSecret`] from a [`Nonce`] and the seller's long-term secret
//! - **Envelope**: XSalsa20-Poly1305 (NaCl `secretbox`) seals the message
//!   under the message secret
//! - **Sealed transmission**: X25519 + XSalsa20-Poly1305 (NaCl `box`) carries
//!   the message secret to the revealer's [`PublicKey`]
//! - **Threshold sharing**: Shamir over GF(2^8) splits a raw secret into
//!   shares, any `min` of which recover it
//!
//! # Exchange
//!
//! ```text
//! seller                                             revealer
//! ------                                             --------
//! nonce          = random 24 bytes
//! message_secret = keccak256(nonce || seller_secret)
//! envelope       = secretbox(message, nonce, message_secret)
//! sealed         = box(message_secret, nonce, revealer_pk, seller_sk)
//!                    --- nonce, envelope, sealed --->
//!                                                    message_secret = box_open(sealed, nonce, seller_pk, revealer_sk)
//!                                                    message        = secretbox_open(envelope, nonce, message_secret)
//! ```
//!
//! All operations are pure; nothing here keeps state between calls.

mod hash;
mod keys;
mod nonce;
mod sealed;
mod secret;
pub mod threshold;

pub use hash::{keccak256, HashAlgorithm, KECCAK256_SIZE};
pub use keys::{KeyError, KeyPair, PublicKey, SecretKey, PUBLIC_KEY_SIZE, SECRET_KEY_SIZE};
pub use nonce::{Nonce, NonceError, NONCE_SIZE};
pub use sealed::{SealedBox, SealedBoxError, SEALED_SECRET_SIZE};
pub use secret::{Cipher, Envelope, MessageSecret, SecretError, SECRET_SIZE, TAG_SIZE};
pub use threshold::{Commitment, Share, ShareSet, ThresholdError, ThresholdParams};
