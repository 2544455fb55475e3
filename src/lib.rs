// RSA Engine
// Primality testing, prime generation, key pair derivation and chunked encryption
//
// Every randomized call takes its random source explicitly: a CSPRNG such as
// `rand::thread_rng()` for key material, or a seeded `StdRng` for reproducible runs.

pub mod error;
pub mod rsa;
pub mod util;
pub mod witness;

pub use error::{Error, Result};
