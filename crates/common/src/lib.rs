/**
 * Text and integer encodings for bytes:
 *  hex, base58, big integers and hex arrays.
 */
pub mod codec;
/**
 * Algorithm choices and threshold defaults,
 *  loadable from TOML.
 */
pub mod config;
/**
 * Cryptographic types and operations.
 *  - Message secret derivation
 *  - Symmetric envelopes
 *  - Sealed transmission between key pairs
 *  - Threshold secret sharing
 */
pub mod crypto;
/**
 * The sealed-reveal exchange, composed
 *  from the primitives in `crypto`.
 */
pub mod protocol;

pub mod prelude {
    pub use crate::config::ProtocolConfig;
    pub use crate::crypto::{
        Cipher, Envelope, HashAlgorithm, KeyPair, MessageSecret, Nonce, PublicKey, SealedBox,
        SecretKey, Share, ShareSet,
    };
    pub use crate::protocol::{Exchange, Protocol, ProtocolError};
}
