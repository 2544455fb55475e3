// Compositeness Witnesses
// Counts Fermat, divisor and gcd witnesses for small composites

use num_integer::Integer;

use crate::error::{Error, Result};

/// Largest limit accepted by [`composite_witness_table`].
/// Each row costs O(c), so the table grows quadratically in the limit.
pub const MAX_WITNESS_LIMIT: u64 = 100_000;

/// Witness counts for one composite number.
///
/// For a composite `c`, each field counts the `x` in `[2, c)` that expose it:
/// Fermat (`x^(c-1) mod c != 1`), exact division (`x | c`) and shared factor
/// (`gcd(x, c) != 1`). For Carmichael numbers every Fermat witness also
/// shares a factor with `c`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WitnessCounts {
    pub composite: u64,
    pub fermat: u64,
    pub divisor: u64,
    pub gcd: u64,
}

impl WitnessCounts {
    /// Share of `[1, c]` that are Fermat witnesses
    pub fn fermat_ratio(&self) -> f64 {
        self.fermat as f64 / self.composite as f64
    }
}

/// Sieve of Eratosthenes: `sieve(limit)[k]` is true iff `k` is prime.
/// Callers keep `limit` at or below [`MAX_WITNESS_LIMIT`].
fn sieve(limit: usize) -> Vec<bool> {
    let mut is_prime = vec![true; limit + 1];
    for flag in is_prime.iter_mut().take(2) {
        *flag = false;
    }

    let mut p = 2;
    while p * p <= limit {
        if is_prime[p] {
            for multiple in (p * p..=limit).step_by(p) {
                is_prime[multiple] = false;
            }
        }
        p += 1;
    }
    is_prime
}

/// Modular exponentiation on u64 with 128-bit intermediates.
fn pow_mod(mut base: u64, mut exp: u64, modulus: u64) -> u64 {
    if modulus == 1 {
        return 0;
    }
    let mut result: u64 = 1;
    base %= modulus;
    while exp > 0 {
        if exp & 1 == 1 {
            result = (result as u128 * base as u128 % modulus as u128) as u64;
        }
        exp >>= 1;
        base = (base as u128 * base as u128 % modulus as u128) as u64;
    }
    result
}

pub fn fermat_witness_count(c: u64) -> u64 {
    (2..c).filter(|&x| pow_mod(x, c - 1, c) != 1).count() as u64
}

pub fn divisor_witness_count(c: u64) -> u64 {
    (2..c).filter(|&x| c % x == 0).count() as u64
}

pub fn gcd_witness_count(c: u64) -> u64 {
    (2..c).filter(|&x| x.gcd(&c) != 1).count() as u64
}

/// Witness counts for every composite in `[6, limit]`, ascending.
pub fn composite_witness_table(limit: u64) -> Result<Vec<WitnessCounts>> {
    if limit > MAX_WITNESS_LIMIT {
        return Err(Error::WitnessLimitTooLarge { limit, max: MAX_WITNESS_LIMIT });
    }

    let is_prime = sieve(limit as usize);
    let table = (6..=limit)
        .filter(|&c| !is_prime[c as usize])
        .map(|c| WitnessCounts {
            composite: c,
            fermat: fermat_witness_count(c),
            divisor: divisor_witness_count(c),
            gcd: gcd_witness_count(c),
        })
        .collect();
    Ok(table)
}
