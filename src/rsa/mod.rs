// RSA Module - Main module file
// Exports all RSA-related functionality

pub mod bigint;
pub mod prime;
pub mod keygen;
pub mod encrypt;
pub mod decrypt;

pub use bigint::{extended_gcd, gcd, mod_inverse, mod_pow, RsaBigInt};
pub use prime::{
    generate_distinct_primes, generate_distinct_primes_with_rng, generate_prime,
    generate_prime_with_rng, is_probable_prime, is_probable_prime_with_rng,
};
pub use keygen::{
    enumerate_keys, KeyPair, KeyParameters, KeyTable, RsaPrivateKey, RsaPublicKey,
    DEFAULT_ENUMERATION_BOUND,
};
pub use encrypt::{encrypt, encrypt_u64, transform, transform_checked};
pub use decrypt::{decrypt, decrypt_to_u64};
