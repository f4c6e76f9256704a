pub mod args;
pub mod op;
pub mod ops;

pub use ops::{
    Combine, Convert, Decrypt, Encrypt, Init, Keypair, MessageSecret, NewShare, Nonce, Seal,
    Split, Unseal, Version,
};
