// Primality Testing
// Trial division, Miller-Rabin and a simplified AKS-style deterministic test

use std::fmt;
use std::str::FromStr;

use num_bigint::RandBigInt;
use num_integer::{Integer, Roots};
use num_traits::{One, Pow, ToPrimitive};
use rand::{CryptoRng, RngCore};

use super::bigint::{from_u64, log2, mod_pow, RsaBigInt};
use crate::error::Error;

/// Largest candidate, in bits, that prime generation will hand to trial division.
pub const TRIAL_DIVISION_MAX_BITS: u64 = 64;

/// Bound for the small-divisor sweep of the AKS-style test.
const AKS_SMALL_DIVISOR_BOUND: u64 = 100;

/// Primality decision procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Exact O(sqrt n) division sweep
    TrialDivision,
    /// Probabilistic, error at most 4^-rounds per composite
    MillerRabin,
    /// Simplified AKS: perfect-power, small-divisor and Fermat-style checks.
    ///
    /// This omits the binomial congruence (X + a)^n = X^n + a (mod X^r - 1, n)
    /// of the canonical algorithm, so it is not a primality certificate. A
    /// composite that is not a perfect power, has no prime factor below 100
    /// and satisfies a^n = a (mod n) for every a <= ceil(log2(n)^2) is
    /// reported prime.
    Aks,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::TrialDivision, Algorithm::MillerRabin, Algorithm::Aks];

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::TrialDivision => "trial",
            Algorithm::MillerRabin => "miller-rabin",
            Algorithm::Aks => "aks",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trial" | "sqrt" | "trial-division" | "trial_division" => Ok(Algorithm::TrialDivision),
            "miller-rabin" | "miller_rabin" | "mr" => Ok(Algorithm::MillerRabin),
            "aks" => Ok(Algorithm::Aks),
            _ => Err(Error::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Decide whether `n` is prime with the selected algorithm.
///
/// `test_rounds` only affects Miller-Rabin; `rng` supplies its witnesses.
pub fn is_prime<R>(n: &RsaBigInt, algorithm: Algorithm, test_rounds: u32, rng: &mut R) -> bool
where
    R: RngCore + CryptoRng + ?Sized,
{
    match algorithm {
        Algorithm::TrialDivision => is_prime_trial_division(n),
        Algorithm::MillerRabin => is_prime_miller_rabin(n, test_rounds, rng),
        Algorithm::Aks => is_prime_aks(n),
    }
}

/// Trial division by odd divisors up to floor(sqrt(n)).
pub fn is_prime_trial_division(n: &RsaBigInt) -> bool {
    if let Some(small) = n.to_u64() {
        return trial_division_u64(small);
    }
    if n.is_even() {
        return false;
    }

    let limit = n.sqrt();
    let mut divisor = from_u64(3);
    while divisor <= limit {
        if n.is_multiple_of(&divisor) {
            return false;
        }
        divisor += 2u8;
    }
    true
}

fn trial_division_u64(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n == 2 || n == 3 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }

    let limit = n.sqrt();
    let mut divisor = 3u64;
    while divisor <= limit {
        if n % divisor == 0 {
            return false;
        }
        divisor += 2;
    }
    true
}

/// Miller-Rabin probabilistic test with `rounds` random witnesses.
/// Returns true if n is probably prime
pub fn is_prime_miller_rabin<R>(n: &RsaBigInt, rounds: u32, rng: &mut R) -> bool
where
    R: RngCore + CryptoRng + ?Sized,
{
    let two = from_u64(2);
    if n == &two || n == &from_u64(3) {
        return true;
    }
    if n <= &RsaBigInt::one() || n.is_even() {
        return false;
    }

    // Write n-1 as 2^r * d with d odd
    let n_minus_one = n - 1u8;
    let mut d = n_minus_one.clone();
    let mut r = 0u32;
    while d.is_even() {
        d >>= 1;
        r += 1;
    }

    'witness: for _ in 0..rounds {
        // Pick random witness a in [2, n-2]
        let a = rng.gen_biguint_range(&two, &n_minus_one);
        let mut x = mod_pow(&a, &d, n);

        if x.is_one() || x == n_minus_one {
            continue;
        }

        for _ in 1..r {
            x = mod_pow(&x, &two, n);
            if x == n_minus_one {
                continue 'witness;
            }
            if x.is_one() {
                return false;
            }
        }

        // Composite
        return false;
    }

    // Probably prime
    true
}

/// Simplified AKS-style deterministic test. See [`Algorithm::Aks`] for how
/// it differs from the textbook algorithm.
pub fn is_prime_aks(n: &RsaBigInt) -> bool {
    if n <= &RsaBigInt::one() {
        return false;
    }
    if n == &from_u64(2) || n == &from_u64(3) {
        return true;
    }
    if n.is_even() {
        return false;
    }

    !is_perfect_power(n) && !has_small_prime_divisor(n) && passes_fermat_sweep(n)
}

/// True if n = a^b for some integers a >= 1, b >= 2.
pub fn is_perfect_power(n: &RsaBigInt) -> bool {
    if n <= &RsaBigInt::one() {
        return false;
    }

    // floor(log2 n) is one less than the bit length
    let max_exponent = n.bits() - 1;
    for b in 2..=max_exponent {
        let Ok(b) = u32::try_from(b) else {
            break;
        };
        let a = n.nth_root(b);
        if &Pow::pow(&a, b) == n || &Pow::pow(&a + 1u8, b) == n {
            return true;
        }
        if a > RsaBigInt::one() && &Pow::pow(&a - 1u8, b) == n {
            return true;
        }
    }
    false
}

fn has_small_prime_divisor(n: &RsaBigInt) -> bool {
    let bound = n.to_u64().map_or(AKS_SMALL_DIVISOR_BOUND, |v| v.min(AKS_SMALL_DIVISOR_BOUND));
    (2..bound)
        .filter(|&p| trial_division_u64(p))
        .any(|p| n.is_multiple_of(&from_u64(p)))
}

fn passes_fermat_sweep(n: &RsaBigInt) -> bool {
    let log = log2(n);
    let k = (log * log).ceil() as u64;

    (1..=k).all(|a| {
        let a = from_u64(a);
        mod_pow(&a, n, n) == &a % n
    })
}
