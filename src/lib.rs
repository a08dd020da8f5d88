// RSA Workbench
// Textbook RSA: primality, key-pair enumeration and block encryption of integers

pub mod error;
pub mod rsa;
pub mod ui;
pub mod util;

pub use error::{RsaError, RsaResult};
pub use rsa::{
    decrypt, encrypt, enumerate_keys, extended_gcd, gcd, generate_distinct_primes,
    generate_prime, is_probable_prime, mod_inverse, transform, transform_checked, KeyPair,
    KeyParameters, KeyTable, RsaBigInt, RsaPrivateKey, RsaPublicKey,
};
pub use ui::{Input, Session, Stage};
pub use util::RsaConfig;
