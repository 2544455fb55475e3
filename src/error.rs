// Engine Errors
// Error kinds surfaced by key generation, prime search and the block cipher

use thiserror::Error;

/// Errors produced by the engine.
///
/// Primality verdicts are never errors; these cover configuration,
/// arithmetic impossibility and ciphertext/key mismatches.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Algorithm selector string did not name a known test
    #[error("unknown primality algorithm: {0:?}")]
    UnknownAlgorithm(String),

    #[error("prime bit length {bits} is below the supported minimum of {min}")]
    InvalidBitLength { bits: u64, min: u64 },

    /// Trial division cost grows with sqrt(n); candidates above the ceiling are refused
    #[error("trial division is limited to {max}-bit candidates, got {bits}")]
    TrialDivisionTooLarge { bits: u64, max: u64 },

    /// Public exponent must satisfy 1 < e < n
    #[error("public exponent {e} is not below the modulus {n}")]
    ExponentNotBelowModulus { e: u64, n: String },

    #[error("modular inverse does not exist")]
    InverseDoesNotExist,

    #[error("modulus of {bits} bits is too small to carry a single byte per chunk")]
    ModulusTooSmall { bits: u64 },

    /// Wrong key or corrupted ciphertext; retrying will not help
    #[error("ciphertext chunk {index} is not below the modulus (wrong key or corrupted data)")]
    ChunkOutOfRange { index: usize },

    /// Decrypted value does not fit its chunk width; the key does not match the ciphertext
    #[error("ciphertext chunk {index} decrypts to a value wider than a plaintext chunk (wrong key or corrupted data)")]
    ImplausiblePlaintext { index: usize },

    #[error("witness table limit {limit} exceeds the supported maximum of {max}")]
    WitnessLimitTooLarge { limit: u64, max: u64 },

    #[error("declared plaintext length {expected} cannot be carried by the chunks (max {max})")]
    LengthMismatch { expected: usize, max: usize },
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;
