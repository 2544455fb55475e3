// RSA Module - Main module file
// Exports primality testing, prime generation, key generation and the block cipher

pub mod bigint;
pub mod primality;
pub mod prime;
pub mod keygen;
pub mod encrypt;
pub mod decrypt;

pub use bigint::RsaBigInt;
pub use primality::{is_prime, Algorithm};
pub use prime::{generate_candidate, generate_prime, generate_prime_parallel};
pub use keygen::{derive_keypair, generate_keypair, RsaKeyPair, RsaPrivateKey, RsaPublicKey};
pub use encrypt::{encrypt, encrypt_block, encrypt_string, seal, Ciphertext};
pub use decrypt::{decrypt, decrypt_block, decrypt_to_string, open};
