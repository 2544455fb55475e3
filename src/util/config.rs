// Engine Configuration
// Bit length, primality algorithm and Miller-Rabin rounds for key generation

use rand::{CryptoRng, RngCore};

use crate::error::{Error, Result};
use crate::rsa::keygen::{generate_keypair, RsaKeyPair, MIN_KEY_PRIME_BITS};
use crate::rsa::primality::{Algorithm, TRIAL_DIVISION_MAX_BITS};
use crate::rsa::prime::generate_prime;
use crate::rsa::RsaBigInt;

/// Configuration for key and prime generation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Bits per prime factor
    pub bit_length: u64,
    pub algorithm: Algorithm,
    /// Miller-Rabin witness count
    pub test_rounds: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bit_length: 16,
            algorithm: Algorithm::MillerRabin,
            test_rounds: 10,
        }
    }
}

impl EngineConfig {
    pub fn with_bit_length(mut self, bit_length: u64) -> Self {
        self.bit_length = bit_length;
        self
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_test_rounds(mut self, test_rounds: u32) -> Self {
        self.test_rounds = test_rounds;
        self
    }

    /// Reject settings key generation cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.bit_length < MIN_KEY_PRIME_BITS {
            return Err(Error::InvalidBitLength {
                bits: self.bit_length,
                min: MIN_KEY_PRIME_BITS,
            });
        }
        if self.algorithm == Algorithm::TrialDivision && self.bit_length > TRIAL_DIVISION_MAX_BITS {
            return Err(Error::TrialDivisionTooLarge {
                bits: self.bit_length,
                max: TRIAL_DIVISION_MAX_BITS,
            });
        }
        Ok(())
    }

    pub fn generate_keypair<R>(&self, rng: &mut R) -> Result<RsaKeyPair>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        self.validate()?;
        generate_keypair(self.bit_length, self.algorithm, self.test_rounds, rng)
    }

    pub fn generate_prime<R>(&self, rng: &mut R) -> Result<RsaBigInt>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        generate_prime(self.bit_length, self.algorithm, self.test_rounds, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.bit_length, 16);
        assert_eq!(config.algorithm, Algorithm::MillerRabin);
        assert_eq!(config.test_rounds, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::default()
            .with_bit_length(32)
            .with_algorithm(Algorithm::Aks)
            .with_test_rounds(40);
        assert_eq!(
            config,
            EngineConfig {
                bit_length: 32,
                algorithm: Algorithm::Aks,
                test_rounds: 40,
            }
        );
    }

    #[test]
    fn test_validate() {
        let too_small = EngineConfig::default().with_bit_length(4);
        assert!(matches!(too_small.validate(), Err(Error::InvalidBitLength { bits: 4, .. })));

        let too_big_for_trial = EngineConfig::default()
            .with_algorithm(Algorithm::TrialDivision)
            .with_bit_length(512);
        assert!(matches!(
            too_big_for_trial.validate(),
            Err(Error::TrialDivisionTooLarge { bits: 512, .. })
        ));
    }

    #[test]
    fn test_generate_keypair() {
        let mut rng = StdRng::seed_from_u64(17);
        let keypair = EngineConfig::default().generate_keypair(&mut rng).unwrap();
        assert_eq!(keypair.prime_bit_length(), 16);
    }

    #[test]
    fn test_generate_prime() {
        let mut rng = StdRng::seed_from_u64(23);
        let prime = EngineConfig::default().with_bit_length(20).generate_prime(&mut rng).unwrap();
        assert_eq!(prime.bits(), 20);
    }
}
