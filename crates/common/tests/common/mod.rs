//! Shared test utilities for exchange and threshold integration tests
#![allow(dead_code)]

use ::common::crypto::{KeyPair, Nonce};

/// A seller and a revealer with fresh key pairs
pub struct Parties {
    pub seller: KeyPair,
    pub revealer: KeyPair,
}

pub fn setup_parties() -> Parties {
    Parties {
        seller: KeyPair::generate(),
        revealer: KeyPair::generate(),
    }
}

/// Nonce of the Keccak interop vector: 24 bytes of 0x01
pub fn vector_nonce() -> Nonce {
    Nonce::from([0x01; 24])
}

/// Secret of the Keccak interop vector: 31 zero bytes then 0x01
pub fn vector_secret() -> [u8; 32] {
    let mut secret = [0u8; 32];
    secret[31] = 0x01;
    secret
}

/// Every k-element subset of 0..n, as index lists
pub fn subsets(n: usize, k: usize) -> Vec<Vec<usize>> {
    if k == 0 {
        return vec![vec![]];
    }
    if n < k {
        return vec![];
    }
    let mut out = subsets(n - 1, k);
    for mut s in subsets(n - 1, k - 1) {
        s.push(n - 1);
        out.push(s);
    }
    out
}

/// Pick the strings at `indices`
pub fn pick(shares: &[String], indices: &[usize]) -> Vec<String> {
    indices.iter().map(|&i| shares[i].clone()).collect()
}

/// Install a test subscriber once; honours RUST_LOG
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
