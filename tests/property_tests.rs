//! Property-based tests for the RSA engine.
//!
//! Each property draws a seed for `StdRng` so failures shrink to a
//! reproducible random stream. Key generation uses 16-bit primes to keep
//! cases fast; the properties do not depend on key size.
//!
//! ```bash
//! cargo test --test property_tests
//! PROPTEST_CASES=1000 cargo test --test property_tests
//! ```

use num_integer::Integer;
use num_traits::One;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use rsa_engine::rsa::bigint::{from_u64, mod_inverse};
use rsa_engine::rsa::primality::{is_prime_miller_rabin, is_prime_trial_division};
use rsa_engine::rsa::{
    decrypt, encrypt, generate_candidate, generate_keypair, open, seal, Algorithm, RsaKeyPair,
};

fn keypair(seed: u64) -> RsaKeyPair {
    let mut rng = StdRng::seed_from_u64(seed);
    generate_keypair(16, Algorithm::MillerRabin, 20, &mut rng).unwrap()
}

#[test]
fn three_byte_roundtrip_with_sixteen_bit_primes() {
    let keypair = keypair(0xC0FFEE);
    let plaintext = [0x01, 0x02, 0x03];

    let ciphertext = encrypt(&plaintext, keypair.public_key()).unwrap();
    assert_eq!(ciphertext.len(), 1);
    assert_eq!(decrypt(&ciphertext, keypair.private_key()).unwrap(), plaintext);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_candidate_has_exact_bits_and_is_odd(bits in 2u64..1024, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let candidate = generate_candidate(bits, &mut rng);
        prop_assert_eq!(candidate.bits(), bits);
        prop_assert!(candidate.is_odd());
    }

    #[test]
    fn prop_miller_rabin_agrees_with_trial_division(k in 2u64..=10_000, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let n = from_u64(k);
        prop_assert_eq!(is_prime_miller_rabin(&n, 20, &mut rng), is_prime_trial_division(&n));
    }

    #[test]
    fn prop_exponent_inverse_law(seed in any::<u64>(), m in any::<u64>()) {
        let keypair = keypair(seed);
        let (public, private) = (keypair.public_key(), keypair.private_key());
        let m = from_u64(m) % public.n();

        let c = m.modpow(public.e(), public.n());
        prop_assert_eq!(c.modpow(private.d(), private.n()), m);
    }

    #[test]
    fn prop_roundtrip_without_leading_zero(
        seed in any::<u64>(),
        first in 1u8..=255,
        rest in prop::collection::vec(any::<u8>(), 0..3),
    ) {
        let keypair = keypair(seed);
        let mut plaintext = vec![first];
        plaintext.extend(rest);

        let ciphertext = encrypt(&plaintext, keypair.public_key()).unwrap();
        prop_assert_eq!(decrypt(&ciphertext, keypair.private_key()).unwrap(), plaintext);
    }

    #[test]
    fn prop_leading_zero_payloads_lose_bytes(
        seed in any::<u64>(),
        rest in prop::collection::vec(any::<u8>(), 0..3),
    ) {
        let keypair = keypair(seed);
        let mut plaintext = vec![0u8];
        plaintext.extend(rest);

        let ciphertext = encrypt(&plaintext, keypair.public_key()).unwrap();
        prop_assert_ne!(decrypt(&ciphertext, keypair.private_key()).unwrap(), plaintext);
    }

    #[test]
    fn prop_sealed_roundtrip_any_bytes(
        seed in any::<u64>(),
        plaintext in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        let keypair = keypair(seed);
        let sealed = seal(&plaintext, keypair.public_key()).unwrap();
        prop_assert_eq!(open(&sealed, keypair.private_key()).unwrap(), plaintext);
    }

    #[test]
    fn prop_encryption_is_deterministic(
        seed in any::<u64>(),
        plaintext in prop::collection::vec(any::<u8>(), 0..32),
    ) {
        let keypair = keypair(seed);
        let first = encrypt(&plaintext, keypair.public_key()).unwrap();
        let second = encrypt(&plaintext, keypair.public_key()).unwrap();
        for c in &first {
            prop_assert!(c < keypair.public_key().n());
        }
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_mod_inverse_is_inverse(a in 1u64..1_000_000, m in 2u64..1_000_000) {
        let (a, m) = (from_u64(a), from_u64(m));
        match mod_inverse(&a, &m) {
            Some(inv) => {
                prop_assert!(inv < m);
                prop_assert_eq!((a * inv) % &m, from_u64(1) % &m);
            }
            None => prop_assert!(!a.gcd(&m).is_one()),
        }
    }
}
