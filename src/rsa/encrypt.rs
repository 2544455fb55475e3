// RSA Encryption Implementation
// Splits plaintext into chunks below the modulus and applies c = m^e mod n

use super::bigint::{from_bytes, mod_pow, RsaBigInt};
use super::keygen::RsaPublicKey;
use crate::error::{Error, Result};

/// Ciphertext together with the plaintext length it decrypts to.
///
/// Every chunk but the last carries exactly `chunk_size` plaintext bytes; the
/// last carries the remainder. Knowing the length lets decryption restore
/// each chunk at its exact width, so leading zero bytes survive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ciphertext {
    chunks: Vec<RsaBigInt>,
    plaintext_len: usize,
}

impl Ciphertext {
    pub fn new(chunks: Vec<RsaBigInt>, plaintext_len: usize) -> Self {
        Self {
            chunks,
            plaintext_len,
        }
    }

    pub fn chunks(&self) -> &[RsaBigInt] {
        &self.chunks
    }

    pub fn plaintext_len(&self) -> usize {
        self.plaintext_len
    }

    pub fn into_chunks(self) -> Vec<RsaBigInt> {
        self.chunks
    }
}

/// Chunk width for the key, or an error when the modulus cannot hold a byte
pub(crate) fn checked_chunk_size(chunk_size: usize, modulus_bits: u64) -> Result<usize> {
    if chunk_size == 0 {
        return Err(Error::ModulusTooSmall { bits: modulus_bits });
    }
    Ok(chunk_size)
}

/// Encrypt a single integer block: m^e mod n
pub fn encrypt_block(m: &RsaBigInt, public_key: &RsaPublicKey) -> RsaBigInt {
    mod_pow(m, public_key.e(), public_key.n())
}

/// Encrypt bytes chunk by chunk, one integer per chunk, in plaintext order.
///
/// Each chunk is read as a big-endian unsigned integer. Encryption is
/// deterministic: the same key and plaintext always give the same chunks.
pub fn encrypt(plaintext: &[u8], public_key: &RsaPublicKey) -> Result<Vec<RsaBigInt>> {
    let chunk_size = checked_chunk_size(public_key.chunk_size(), public_key.modulus_bits())?;

    Ok(plaintext
        .chunks(chunk_size)
        .map(|chunk| encrypt_block(&from_bytes(chunk), public_key))
        .collect())
}

/// Encrypt a string using RSA public key
pub fn encrypt_string(plaintext: &str, public_key: &RsaPublicKey) -> Result<Vec<RsaBigInt>> {
    encrypt(plaintext.as_bytes(), public_key)
}

/// Encrypt and record the plaintext length, see [`Ciphertext`].
pub fn seal(plaintext: &[u8], public_key: &RsaPublicKey) -> Result<Ciphertext> {
    let chunks = encrypt(plaintext, public_key)?;
    Ok(Ciphertext::new(chunks, plaintext.len()))
}
