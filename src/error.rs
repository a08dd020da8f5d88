// Error types for the RSA workbench
// Every fallible operation in the crate reports one of these variants

use num_bigint::BigUint;
use thiserror::Error;

/// Errors raised by the RSA core and the workflow built on it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RsaError {
    /// Generic rejection of caller-supplied parameters
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// p and q must be two different primes
    #[error("p and q must be distinct (both are {0})")]
    IdenticalPrimes(BigUint),

    /// A value that must be prime failed the primality test
    #[error("{0} is not prime")]
    NotPrime(BigUint),

    /// Modular exponentiation needs a modulus greater than 1
    #[error("modulus must be greater than 1, got {0}")]
    InvalidModulus(BigUint),

    /// A block is not below the modulus, so it cannot round-trip
    #[error("value {value} at index {index} is not below the modulus {modulus}")]
    ValueOutOfRange {
        index: usize,
        value: BigUint,
        modulus: BigUint,
    },

    /// The attempt guard on prime sampling ran out
    #[error("no {bits}-bit prime found after {attempts} attempts")]
    PrimeSearchExhausted { bits: u32, attempts: u64 },

    /// A key was requested from a table with no rows
    #[error("no valid key pair exists for these primes")]
    EmptyKeyTable,

    #[error("key index {index} out of range for a table of {len} keys")]
    KeyIndexOutOfRange { index: usize, len: usize },

    /// The workflow cannot accept this input in its current stage
    #[error("cannot apply {input} while in stage {stage}")]
    InvalidTransition {
        stage: &'static str,
        input: &'static str,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Result alias used across the crate
pub type RsaResult<T> = Result<T, RsaError>;
