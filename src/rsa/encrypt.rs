// RSA Encryption Implementation
// Block-wise modular exponentiation over a sequence of integers

use num_traits::One;

use super::bigint::{mod_pow, RsaBigInt};
use super::keygen::RsaPublicKey;
use crate::error::{RsaError, RsaResult};

/// Raise every value to `exponent` modulo `modulus`
///
/// Encryption and decryption are the same operation with `e` or `d` as the
/// exponent. Output has one block per input block, in the same order.
/// Values at or above the modulus are reduced silently and will not survive
/// a round trip; [`transform_checked`] rejects them instead.
pub fn transform(
    values: &[RsaBigInt],
    exponent: &RsaBigInt,
    modulus: &RsaBigInt,
) -> RsaResult<Vec<RsaBigInt>> {
    ensure_modulus(modulus)?;

    Ok(values
        .iter()
        .map(|v| mod_pow(v, exponent, modulus))
        .collect())
}

/// Like [`transform`], but every value must be strictly below the modulus
pub fn transform_checked(
    values: &[RsaBigInt],
    exponent: &RsaBigInt,
    modulus: &RsaBigInt,
) -> RsaResult<Vec<RsaBigInt>> {
    ensure_modulus(modulus)?;

    if let Some((index, value)) = values.iter().enumerate().find(|(_, v)| *v >= modulus) {
        return Err(RsaError::ValueOutOfRange {
            index,
            value: value.clone(),
            modulus: modulus.clone(),
        });
    }

    transform(values, exponent, modulus)
}

pub(crate) fn ensure_modulus(modulus: &RsaBigInt) -> RsaResult<()> {
    if modulus <= &RsaBigInt::one() {
        return Err(RsaError::InvalidModulus(modulus.clone()));
    }
    Ok(())
}

/// Encrypt blocks with a public key, refusing blocks that do not fit under `n`
pub fn encrypt(values: &[RsaBigInt], public_key: &RsaPublicKey) -> RsaResult<Vec<RsaBigInt>> {
    transform_checked(values, &public_key.e, &public_key.n)
}

/// Encrypt u64 blocks with a public key
pub fn encrypt_u64(values: &[u64], public_key: &RsaPublicKey) -> RsaResult<Vec<RsaBigInt>> {
    let values: Vec<RsaBigInt> = values.iter().map(|&v| RsaBigInt::from(v)).collect();
    encrypt(&values, public_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::bigint::from_u64;

    fn blocks(values: &[u64]) -> Vec<RsaBigInt> {
        values.iter().map(|&v| from_u64(v)).collect()
    }

    #[test]
    fn test_transform_textbook() {
        let ciphertext = transform(&blocks(&[10, 25, 50]), &from_u64(7), &from_u64(143)).unwrap();
        assert_eq!(ciphertext, blocks(&[59, 60, 5]));
    }

    #[test]
    fn test_transform_preserves_input() {
        let plaintext = blocks(&[10, 25, 50]);
        let copy = plaintext.clone();
        let _ = transform(&plaintext, &from_u64(7), &from_u64(143)).unwrap();
        assert_eq!(plaintext, copy);
    }

    #[test]
    fn test_transform_empty() {
        assert!(transform(&[], &from_u64(7), &from_u64(143)).unwrap().is_empty());
    }

    #[test]
    fn test_transform_rejects_degenerate_modulus() {
        for m in [0, 1] {
            assert_eq!(
                transform(&blocks(&[3]), &from_u64(7), &from_u64(m)),
                Err(RsaError::InvalidModulus(from_u64(m)))
            );
        }
    }

    #[test]
    fn test_transform_reduces_large_values() {
        // 153 ≡ 10 (mod 143), so it encrypts like 10 and cannot round-trip
        let ciphertext = transform(&blocks(&[153]), &from_u64(7), &from_u64(143)).unwrap();
        assert_eq!(ciphertext, blocks(&[59]));
    }

    #[test]
    fn test_transform_checked_rejects_large_values() {
        let result = transform_checked(&blocks(&[10, 143, 200]), &from_u64(7), &from_u64(143));
        assert_eq!(
            result,
            Err(RsaError::ValueOutOfRange {
                index: 1,
                value: from_u64(143),
                modulus: from_u64(143),
            })
        );
    }

    #[test]
    fn test_encrypt_u64() {
        let public_key = RsaPublicKey { n: from_u64(143), e: from_u64(7) };
        assert_eq!(encrypt_u64(&[10, 25, 50], &public_key).unwrap(), blocks(&[59, 60, 5]));
        assert!(encrypt_u64(&[500], &public_key).is_err());
    }
}
