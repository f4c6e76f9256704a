//! Property tests for the envelope, sealed boxes and threshold sharing

mod common;

use ::common::crypto::threshold::{self, ThresholdParams};
use ::common::crypto::{
    Cipher, Envelope, HashAlgorithm, MessageSecret, Nonce, SealedBox, SecretError,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn cipher_strategy() -> impl Strategy<Value = Cipher> {
    prop_oneof![
        Just(Cipher::XSalsa20Poly1305),
        Just(Cipher::XChaCha20Poly1305)
    ]
}

fn hash_strategy() -> impl Strategy<Value = HashAlgorithm> {
    prop_oneof![
        Just(HashAlgorithm::Keccak256),
        Just(HashAlgorithm::Sha256),
        Just(HashAlgorithm::Sha512),
        Just(HashAlgorithm::Blake3),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Opening what was sealed gives back the plaintext
    #[test]
    fn prop_envelope_roundtrip(
        plaintext in prop::collection::vec(any::<u8>(), 0..512),
        seller_secret in prop::collection::vec(any::<u8>(), 0..64),
        nonce in any::<[u8; 24]>(),
        hash in hash_strategy(),
        cipher in cipher_strategy(),
    ) {
        let nonce = Nonce::from(nonce);
        let secret = MessageSecret::build(&nonce, &seller_secret, hash);
        let envelope = secret.seal(&plaintext, &nonce, cipher).unwrap();
        prop_assert_eq!(envelope.len(), plaintext.len() + 16);
        prop_assert_eq!(secret.open(&envelope, &nonce, cipher).unwrap(), plaintext);
    }

    /// Flipping any single bit of an envelope is detected
    #[test]
    fn prop_every_bit_flip_rejected(
        plaintext in prop::collection::vec(any::<u8>(), 0..48),
        nonce in any::<[u8; 24]>(),
        cipher in cipher_strategy(),
    ) {
        let nonce = Nonce::from(nonce);
        let secret = MessageSecret::build(&nonce, b"seller", HashAlgorithm::Keccak256);
        let envelope = secret.seal(&plaintext, &nonce, cipher).unwrap();

        for bit in 0..envelope.len() * 8 {
            let mut bytes = envelope.bytes().to_vec();
            bytes[bit / 8] ^= 1 << (bit % 8);
            let tampered = Envelope::from(bytes);
            prop_assert!(matches!(
                secret.open(&tampered, &nonce, cipher),
                Err(SecretError::Authentication)
            ));
        }
    }

    /// The message secret is a function of exactly (nonce, secret)
    #[test]
    fn prop_message_secret_determinism(
        seller_secret in prop::collection::vec(any::<u8>(), 1..64),
        nonce in any::<[u8; 24]>(),
        flip in any::<prop::sample::Index>(),
        hash in hash_strategy(),
    ) {
        let nonce = Nonce::from(nonce);
        let a = MessageSecret::build(&nonce, &seller_secret, hash);
        let b = MessageSecret::build(&nonce, &seller_secret, hash);
        prop_assert_eq!(&a, &b);

        let mut changed = seller_secret.clone();
        let i = flip.index(changed.len());
        changed[i] ^= 0x01;
        prop_assert_ne!(a, MessageSecret::build(&nonce, &changed, hash));
    }

    /// A sealed box opens for its recipient and nobody else
    #[test]
    fn prop_sealed_box_recipient_only(
        payload in prop::collection::vec(any::<u8>(), 0..128),
        nonce in any::<[u8; 24]>(),
    ) {
        let parties = common::setup_parties();
        let other = common::setup_parties();
        let nonce = Nonce::from(nonce);

        let sealed = SealedBox::seal(
            &payload,
            &nonce,
            &parties.revealer.public_key,
            &parties.seller.secret_key,
        ).unwrap();
        prop_assert_eq!(
            sealed.open(&nonce, &parties.seller.public_key, &parties.revealer.secret_key).unwrap(),
            payload
        );
        prop_assert!(sealed.open(&nonce, &parties.seller.public_key, &other.revealer.secret_key).is_err());
    }

    /// Any `min` shares recover the secret, in any order
    #[test]
    fn prop_threshold_roundtrip(
        secret in prop::collection::vec(any::<u8>(), 0..96),
        total in 1..8usize,
        min_seed in any::<prop::sample::Index>(),
        pick_seed in any::<u64>(),
    ) {
        let min = min_seed.index(total) + 1;
        let shares = threshold::split(&secret, min, total).unwrap().to_strings();

        let mut rng = StdRng::seed_from_u64(pick_seed);
        let picked: Vec<_> = rand::seq::index::sample(&mut rng, total, min)
            .into_iter()
            .map(|i| shares[i].clone())
            .collect();
        prop_assert_eq!(threshold::combine(&picked).unwrap(), secret);
    }

    /// One short of the threshold never yields the secret
    #[test]
    fn prop_below_threshold_is_wrong(
        secret in prop::collection::vec(any::<u8>(), 16..64),
        total in 2..8usize,
        min_seed in any::<prop::sample::Index>(),
    ) {
        let min = min_seed.index(total - 1) + 2;
        let shares = threshold::split(&secret, min, total).unwrap().to_strings();
        let recovered = threshold::combine(&shares[..min - 1]).unwrap();
        prop_assert_ne!(recovered, secret);
    }

    /// Seeded splits are reproducible
    #[test]
    fn prop_seeded_split_deterministic(
        secret in prop::collection::vec(any::<u8>(), 0..64),
        seed in any::<u64>(),
    ) {
        let params = ThresholdParams::new(2, 4).unwrap();
        let a = threshold::split_with_rng(&secret, params, &mut StdRng::seed_from_u64(seed)).unwrap();
        let b = threshold::split_with_rng(&secret, params, &mut StdRng::seed_from_u64(seed)).unwrap();
        prop_assert_eq!(a, b);
    }
}
