// Prime Generation
// Samples odd candidates of an exact bit length until a primality test accepts one

use std::sync::{Mutex, PoisonError};

use num_bigint::RandBigInt;
use num_traits::{One, Zero};
use rand::rngs::StdRng;
use rand::{CryptoRng, RngCore, SeedableRng};
use rayon::prelude::*;
use tracing::debug;

use super::bigint::RsaBigInt;
use super::primality::{is_prime, Algorithm, TRIAL_DIVISION_MAX_BITS};
use crate::error::{Error, Result};

/// Smallest bit length with an odd prime of exactly that size (3 = 0b11).
pub const MIN_PRIME_BITS: u64 = 2;

/// Random odd integer with exactly `bit_length` bits: top and bottom bits forced to 1.
pub fn generate_candidate<R>(bit_length: u64, rng: &mut R) -> RsaBigInt
where
    R: RngCore + ?Sized,
{
    if bit_length == 0 {
        return RsaBigInt::zero();
    }
    let top = RsaBigInt::one() << (bit_length - 1);
    rng.gen_biguint(bit_length) | top | RsaBigInt::one()
}

fn check_bit_length(bit_length: u64, algorithm: Algorithm) -> Result<()> {
    if bit_length < MIN_PRIME_BITS {
        return Err(Error::InvalidBitLength {
            bits: bit_length,
            min: MIN_PRIME_BITS,
        });
    }
    if algorithm == Algorithm::TrialDivision && bit_length > TRIAL_DIVISION_MAX_BITS {
        return Err(Error::TrialDivisionTooLarge {
            bits: bit_length,
            max: TRIAL_DIVISION_MAX_BITS,
        });
    }
    Ok(())
}

/// Generate a random prime of exactly `bit_length` bits.
///
/// The sampling loop has no iteration bound; callers on latency-sensitive
/// paths need their own timeout.
pub fn generate_prime<R>(
    bit_length: u64,
    algorithm: Algorithm,
    test_rounds: u32,
    rng: &mut R,
) -> Result<RsaBigInt>
where
    R: RngCore + CryptoRng + ?Sized,
{
    check_bit_length(bit_length, algorithm)?;

    let mut attempts = 0u64;
    loop {
        attempts += 1;
        let candidate = generate_candidate(bit_length, rng);
        if is_prime(&candidate, algorithm, test_rounds, rng) {
            debug!(bit_length, %algorithm, attempts, "prime found");
            return Ok(candidate);
        }
    }
}

/// Parallel variant of [`generate_prime`]: rayon workers race on independent
/// candidate streams and the first acceptance wins.
///
/// Each worker seeds its own `StdRng` from `rng`, taken one at a time under a
/// lock, so no seed bits are shared between workers.
pub fn generate_prime_parallel<R>(
    bit_length: u64,
    algorithm: Algorithm,
    test_rounds: u32,
    rng: &mut R,
) -> Result<RsaBigInt>
where
    R: RngCore + CryptoRng + Send + ?Sized,
{
    check_bit_length(bit_length, algorithm)?;

    let seeder = Mutex::new(rng);
    let found = rayon::iter::repeat(())
        .map_init(
            || {
                let mut seed = <StdRng as SeedableRng>::Seed::default();
                seeder
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .fill_bytes(&mut seed);
                StdRng::from_seed(seed)
            },
            |worker_rng, ()| {
                let candidate = generate_candidate(bit_length, worker_rng);
                is_prime(&candidate, algorithm, test_rounds, worker_rng).then_some(candidate)
            },
        )
        .find_map_any(|candidate| candidate);

    match found {
        Some(prime) => {
            debug!(bit_length, %algorithm, "prime found by parallel search");
            Ok(prime)
        }
        // the candidate stream is endless, so the search only ends on a hit
        None => generate_prime(
            bit_length,
            algorithm,
            test_rounds,
            seeder.into_inner().unwrap_or_else(PoisonError::into_inner),
        ),
    }
}
