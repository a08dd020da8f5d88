// Workbench Configuration
// Tunable parameters for prime search, primality testing and key enumeration

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RsaError, RsaResult};
use crate::rsa::keygen::DEFAULT_ENUMERATION_BOUND;
use crate::rsa::prime::{DEFAULT_MAX_ATTEMPTS, DEFAULT_ROUNDS};

/// Bit width used when drawing random primes
pub const DEFAULT_PRIME_BITS: u32 = 10;

/// Configuration for key generation and enumeration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RsaConfig {
    /// Public exponents are enumerated below `min(phi, enumeration_bound)`
    pub enumeration_bound: u64,
    pub miller_rabin_rounds: u32,
    pub prime_bits: u32,
    /// Candidates drawn before prime generation gives up
    pub max_prime_attempts: u64,
}

impl Default for RsaConfig {
    fn default() -> Self {
        Self {
            enumeration_bound: DEFAULT_ENUMERATION_BOUND,
            miller_rabin_rounds: DEFAULT_ROUNDS,
            prime_bits: DEFAULT_PRIME_BITS,
            max_prime_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl RsaConfig {
    /// Set the exclusive upper limit for enumerated public exponents
    pub fn with_enumeration_bound(mut self, bound: u64) -> Self {
        self.enumeration_bound = bound;
        self
    }

    /// Set the Miller-Rabin round count
    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.miller_rabin_rounds = rounds;
        self
    }

    /// Set the bit width of generated primes
    pub fn with_prime_bits(mut self, bits: u32) -> Self {
        self.prime_bits = bits;
        self
    }

    /// Set how many candidates the prime search may draw
    pub fn with_max_prime_attempts(mut self, attempts: u64) -> Self {
        self.max_prime_attempts = attempts;
        self
    }

    /// Parse a JSON document; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> RsaResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| RsaError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn from_file(path: &Path) -> RsaResult<Self> {
        let json = fs::read_to_string(path)
            .map_err(|e| RsaError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    /// Reject values the key and prime routines cannot work with
    pub fn validate(&self) -> RsaResult<()> {
        if self.enumeration_bound < 2 {
            return Err(RsaError::Config(format!(
                "enumeration_bound must be at least 2, got {}",
                self.enumeration_bound
            )));
        }
        if self.miller_rabin_rounds == 0 {
            return Err(RsaError::Config("miller_rabin_rounds must be positive".to_string()));
        }
        if self.prime_bits < 2 {
            return Err(RsaError::Config(format!(
                "prime_bits must be at least 2, got {}",
                self.prime_bits
            )));
        }
        if self.max_prime_attempts == 0 {
            return Err(RsaError::Config("max_prime_attempts must be positive".to_string()));
        }
        Ok(())
    }
}
