// RSA Key Generation
// Implements RSA key pair generation (public and private keys)

use std::fmt;

use num_traits::One;
use rand::{CryptoRng, RngCore};
use tracing::{info, warn};

use super::bigint::{from_u64, gcd, mod_inverse, RsaBigInt};
use super::primality::Algorithm;
use super::prime::generate_prime;
use crate::error::{Error, Result};

/// Preferred public exponent
pub const DEFAULT_PUBLIC_EXPONENT: u64 = 65537;

/// Public exponent used when 65537 shares a factor with φ(n)
pub const FALLBACK_PUBLIC_EXPONENT: u64 = 3;

/// Smallest per-prime bit length accepted for key generation.
/// Two distinct 9-bit primes give n >= 257 * 263 > 65537, keeping 1 < e < n.
pub const MIN_KEY_PRIME_BITS: u64 = 9;

/// RSA Public Key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RsaPublicKey {
    e: RsaBigInt, // Public exponent
    n: RsaBigInt, // Modulus
}

/// RSA Private Key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RsaPrivateKey {
    d: RsaBigInt, // Private exponent
    n: RsaBigInt, // Modulus (same as public)
}

/// RSA Key Pair (both public and private keys)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaKeyPair {
    public_key: RsaPublicKey,
    private_key: RsaPrivateKey,
    prime_bit_length: u64,
}

/// Bytes per plaintext chunk: strictly fewer bits than the modulus, so every
/// chunk value is below n.
fn chunk_size_for(n: &RsaBigInt) -> usize {
    (n.bits().saturating_sub(1) / 8) as usize
}

impl RsaPublicKey {
    pub fn new(e: RsaBigInt, n: RsaBigInt) -> Self {
        Self { e, n }
    }

    pub fn e(&self) -> &RsaBigInt {
        &self.e
    }

    pub fn n(&self) -> &RsaBigInt {
        &self.n
    }

    /// Get the bit length of the modulus
    pub fn modulus_bits(&self) -> u64 {
        self.n.bits()
    }

    pub fn chunk_size(&self) -> usize {
        chunk_size_for(&self.n)
    }

    /// Encrypt a message using this public key
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<RsaBigInt>> {
        super::encrypt::encrypt(plaintext, self)
    }
}

impl RsaPrivateKey {
    pub fn new(d: RsaBigInt, n: RsaBigInt) -> Self {
        Self { d, n }
    }

    pub fn d(&self) -> &RsaBigInt {
        &self.d
    }

    pub fn n(&self) -> &RsaBigInt {
        &self.n
    }

    /// Get the bit length of the modulus
    pub fn modulus_bits(&self) -> u64 {
        self.n.bits()
    }

    pub fn chunk_size(&self) -> usize {
        chunk_size_for(&self.n)
    }

    /// Decrypt a ciphertext using this private key
    pub fn decrypt(&self, ciphertext: &[RsaBigInt]) -> Result<Vec<u8>> {
        super::decrypt::decrypt(ciphertext, self)
    }
}

impl fmt::Display for RsaPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.e, self.n)
    }
}

impl fmt::Display for RsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.d, self.n)
    }
}

impl RsaKeyPair {
    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public_key
    }

    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.private_key
    }

    /// Bit length requested for each prime factor
    pub fn prime_bit_length(&self) -> u64 {
        self.prime_bit_length
    }

    /// Get the bit length of the modulus
    pub fn modulus_bits(&self) -> u64 {
        self.public_key.modulus_bits()
    }

    pub fn into_keys(self) -> (RsaPublicKey, RsaPrivateKey) {
        (self.public_key, self.private_key)
    }
}

/// Generate an RSA key pair from two random primes of `bit_length` bits each.
///
/// If the two draws collide, the second prime is redrawn until distinct.
pub fn generate_keypair<R>(
    bit_length: u64,
    algorithm: Algorithm,
    test_rounds: u32,
    rng: &mut R,
) -> Result<RsaKeyPair>
where
    R: RngCore + CryptoRng + ?Sized,
{
    if bit_length < MIN_KEY_PRIME_BITS {
        return Err(Error::InvalidBitLength {
            bits: bit_length,
            min: MIN_KEY_PRIME_BITS,
        });
    }

    // Step 1: Generate two random primes p and q
    let p = generate_prime(bit_length, algorithm, test_rounds, rng)?;
    let mut q = generate_prime(bit_length, algorithm, test_rounds, rng)?;
    while q == p {
        warn!(bit_length, "second prime equals the first, redrawing");
        q = generate_prime(bit_length, algorithm, test_rounds, rng)?;
    }

    let mut keypair = derive_keypair(&p, &q)?;
    keypair.prime_bit_length = bit_length;

    info!(
        prime_bits = bit_length,
        modulus_bits = keypair.modulus_bits(),
        e = %keypair.public_key.e,
        %algorithm,
        "generated RSA key pair"
    );
    Ok(keypair)
}

/// Derive the key pair for the given prime factors.
///
/// Uses e = 65537, falling back to e = 3 when 65537 divides φ(n). Fails with
/// [`Error::ExponentNotBelowModulus`] when the chosen e is not below n, and
/// with [`Error::InverseDoesNotExist`] when neither exponent is coprime to φ(n).
pub fn derive_keypair(p: &RsaBigInt, q: &RsaBigInt) -> Result<RsaKeyPair> {
    // Step 2: Compute n = p * q
    let n = p * q;

    // Step 3: Compute φ(n) = (p-1)(q-1)
    let phi_n = (p - 1u8) * (q - 1u8);

    // Step 4: Pick e coprime to φ(n)
    let mut exponent = DEFAULT_PUBLIC_EXPONENT;
    if !gcd(&from_u64(exponent), &phi_n).is_one() {
        warn!(
            fallback = FALLBACK_PUBLIC_EXPONENT,
            "65537 is not coprime with phi(n), using fallback exponent"
        );
        exponent = FALLBACK_PUBLIC_EXPONENT;
    }
    let e = from_u64(exponent);
    if e >= n {
        return Err(Error::ExponentNotBelowModulus {
            e: exponent,
            n: n.to_string(),
        });
    }

    // Step 5: Compute d = e^(-1) mod φ(n)
    let d = mod_inverse(&e, &phi_n).ok_or(Error::InverseDoesNotExist)?;

    Ok(RsaKeyPair {
        public_key: RsaPublicKey { e, n: n.clone() },
        private_key: RsaPrivateKey { d, n },
        prime_bit_length: p.bits().max(q.bits()),
    })
}
