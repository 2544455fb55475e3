// RSA Decryption Implementation
// Applies m = c^d mod n per chunk and reassembles the plaintext bytes

use super::bigint::{mod_pow, to_bytes_fixed, RsaBigInt};
use super::encrypt::{checked_chunk_size, Ciphertext};
use super::keygen::RsaPrivateKey;
use crate::error::{Error, Result};

/// Decrypt a single integer block: c^d mod n
pub fn decrypt_block(c: &RsaBigInt, private_key: &RsaPrivateKey) -> RsaBigInt {
    mod_pow(c, private_key.d(), private_key.n())
}

/// Decrypt chunk `index` and re-encode it at `width` bytes.
fn decrypt_chunk(
    index: usize,
    c: &RsaBigInt,
    width: usize,
    private_key: &RsaPrivateKey,
) -> Result<Vec<u8>> {
    if c >= private_key.n() {
        return Err(Error::ChunkOutOfRange { index });
    }
    let m = decrypt_block(c, private_key);
    to_bytes_fixed(&m, width).ok_or(Error::ImplausiblePlaintext { index })
}

/// Decrypt a chunk sequence produced by [`encrypt`](super::encrypt::encrypt).
///
/// Each chunk is re-encoded at the full chunk width and its leading zero
/// bytes are stripped before concatenation. The chunk width is not carried
/// by the ciphertext, so plaintext chunks that legitimately start with zero
/// bytes lose them. Use [`open`] on a [`Ciphertext`] when the plaintext may
/// contain zero bytes.
pub fn decrypt(ciphertext: &[RsaBigInt], private_key: &RsaPrivateKey) -> Result<Vec<u8>> {
    let chunk_size = checked_chunk_size(private_key.chunk_size(), private_key.modulus_bits())?;

    let mut plaintext = Vec::with_capacity(ciphertext.len() * chunk_size);
    for (index, c) in ciphertext.iter().enumerate() {
        let chunk = decrypt_chunk(index, c, chunk_size, private_key)?;
        let start = chunk.iter().position(|&b| b != 0).unwrap_or(chunk.len());
        plaintext.extend_from_slice(&chunk[start..]);
    }
    Ok(plaintext)
}

/// Decrypt ciphertext to a string
pub fn decrypt_to_string(ciphertext: &[RsaBigInt], private_key: &RsaPrivateKey) -> Result<String> {
    let plaintext = decrypt(ciphertext, private_key)?;
    Ok(String::from_utf8_lossy(&plaintext).into_owned())
}

/// Decrypt a [`Ciphertext`] exactly, restoring every chunk at its original width.
pub fn open(ciphertext: &Ciphertext, private_key: &RsaPrivateKey) -> Result<Vec<u8>> {
    let chunk_size = checked_chunk_size(private_key.chunk_size(), private_key.modulus_bits())?;
    let chunks = ciphertext.chunks();
    let len = ciphertext.plaintext_len();

    // the last chunk must carry between 1 and chunk_size bytes
    let max = chunks.len() * chunk_size;
    let min = chunks.len().saturating_sub(1) * chunk_size;
    let fits = if chunks.is_empty() { len == 0 } else { len > min && len <= max };
    if !fits {
        return Err(Error::LengthMismatch { expected: len, max });
    }

    let mut plaintext = Vec::with_capacity(len);
    for (index, c) in chunks.iter().enumerate() {
        let width = chunk_size.min(len - index * chunk_size);
        plaintext.extend(decrypt_chunk(index, c, width, private_key)?);
    }
    Ok(plaintext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::from_u64;
    use crate::rsa::encrypt::{encrypt, seal};
    use crate::rsa::keygen::{derive_keypair, RsaKeyPair};

    fn test_keypair() -> RsaKeyPair {
        derive_keypair(&from_u64(65_537), &from_u64(65_539)).unwrap()
    }

    fn roundtrip(keypair: &RsaKeyPair, message: &[u8]) -> Vec<u8> {
        let ciphertext = keypair.public_key().encrypt(message).unwrap();
        keypair.private_key().decrypt(&ciphertext).unwrap()
    }

    #[test]
    fn test_decrypt_roundtrip() {
        let keypair = test_keypair();
        let messages: [&[u8]; 5] = [b"A", b"AB", b"Hello", b"Hello, World!", &[0xff; 100]];
        for message in messages {
            assert_eq!(roundtrip(&keypair, message), message);
        }
    }

    #[test]
    fn test_decrypt_to_string() {
        let keypair = test_keypair();
        let message = "Test message for RSA decryption";
        let ciphertext = encrypt(message.as_bytes(), keypair.public_key()).unwrap();
        assert_eq!(decrypt_to_string(&ciphertext, keypair.private_key()).unwrap(), message);
    }

    #[test]
    fn test_leading_zero_bytes_are_lost() {
        let keypair = test_keypair();

        let message = [0x00, 0x01, 0x02];
        assert_eq!(roundtrip(&keypair, &message), vec![0x01, 0x02]);

        // a later chunk starting with zero is also shortened
        let message = [0x41, 0x42, 0x43, 0x44, 0x00, 0x45];
        assert_eq!(roundtrip(&keypair, &message), vec![0x41, 0x42, 0x43, 0x44, 0x45]);
    }

    #[test]
    fn test_open_preserves_zero_bytes() {
        let keypair = test_keypair();
        let messages: [&[u8]; 4] = [
            &[0x00, 0x01, 0x02],
            &[0x41, 0x42, 0x43, 0x44, 0x00, 0x45],
            &[0; 9],
            &[],
        ];
        for message in messages {
            let sealed = seal(message, keypair.public_key()).unwrap();
            assert_eq!(open(&sealed, keypair.private_key()).unwrap(), message);
        }
    }

    #[test]
    fn test_open_length_mismatch() {
        let keypair = test_keypair();
        let sealed = seal(b"abcdefgh", keypair.public_key()).unwrap();
        assert_eq!(sealed.chunks().len(), 2);

        let too_long = Ciphertext::new(sealed.chunks().to_vec(), 9);
        assert_eq!(
            open(&too_long, keypair.private_key()),
            Err(Error::LengthMismatch { expected: 9, max: 8 })
        );

        let too_short = Ciphertext::new(sealed.chunks().to_vec(), 4);
        assert_eq!(
            open(&too_short, keypair.private_key()),
            Err(Error::LengthMismatch { expected: 4, max: 8 })
        );
    }

    #[test]
    fn test_chunk_out_of_range() {
        let keypair = test_keypair();
        let n = keypair.private_key().n().clone();
        let mut ciphertext = encrypt(b"ok", keypair.public_key()).unwrap();
        ciphertext.push(n);
        assert_eq!(
            decrypt(&ciphertext, keypair.private_key()),
            Err(Error::ChunkOutOfRange { index: 1 })
        );
    }

    #[test]
    fn test_decrypt_with_wrong_key() {
        let keypair = test_keypair();
        // same chunk size, different modulus
        let other = derive_keypair(&from_u64(524_309), &from_u64(524_341)).unwrap();
        assert_eq!(other.private_key().chunk_size(), keypair.private_key().chunk_size());

        let ciphertext = encrypt(b"hello world", keypair.public_key()).unwrap();
        assert_eq!(
            decrypt(&ciphertext, other.private_key()),
            Err(Error::ImplausiblePlaintext { index: 0 })
        );
    }

    #[test]
    fn test_decrypt_empty() {
        let keypair = test_keypair();
        assert!(decrypt(&[], keypair.private_key()).unwrap().is_empty());
    }
}
