// RSA Key Generation
// Builds key parameters from two primes and enumerates every valid (e, d) pair

use log::debug;
use num_bigint::BigInt;
use num_traits::{One, ToPrimitive, Zero};
use serde::Serialize;

use super::bigint::{decimal, from_u64, gcd, mod_inverse, to_signed, RsaBigInt};
use super::prime::{is_probable_prime, DEFAULT_ROUNDS};
use crate::error::{RsaError, RsaResult};

/// Default cap on public exponents tried by [`enumerate_keys`]
pub const DEFAULT_ENUMERATION_BOUND: u64 = 1000;

/// RSA Public Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    pub n: RsaBigInt, // Modulus
    pub e: RsaBigInt, // Public exponent
}

/// RSA Private Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    pub n: RsaBigInt, // Modulus (same as public)
    pub d: RsaBigInt, // Private exponent
}

/// One row of a key table: a public exponent and its inverse mod phi
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyPair {
    #[serde(serialize_with = "decimal::serialize")]
    pub e: RsaBigInt,
    #[serde(serialize_with = "decimal::serialize")]
    pub d: RsaBigInt,
}

impl KeyPair {
    /// Check `1 < e < phi`, `gcd(e, phi) == 1` and `e * d ≡ 1 (mod phi)`
    pub fn is_valid_for(&self, phi: &RsaBigInt) -> bool {
        self.e > RsaBigInt::one()
            && &self.e < phi
            && gcd(&to_signed(&self.e), &to_signed(phi)).is_one()
            && (&self.e * &self.d) % phi == RsaBigInt::one()
    }
}

/// Every valid key pair for one totient, ascending by `e`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct KeyTable {
    rows: Vec<KeyPair>,
}

impl KeyTable {
    /// Number of valid pairs found
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when no exponent in range was usable
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row at `index`, in enumeration order
    pub fn get(&self, index: usize) -> Option<&KeyPair> {
        self.rows.get(index)
    }

    /// Row whose public exponent is `e`
    pub fn find_by_e(&self, e: &RsaBigInt) -> Option<&KeyPair> {
        self.rows.iter().find(|pair| &pair.e == e)
    }

    /// Rows in ascending `e` order
    pub fn iter(&self) -> impl Iterator<Item = &KeyPair> {
        self.rows.iter()
    }

    /// Borrow the rows as a slice
    pub fn as_slice(&self) -> &[KeyPair] {
        &self.rows
    }
}

impl<'a> IntoIterator for &'a KeyTable {
    type Item = &'a KeyPair;
    type IntoIter = std::slice::Iter<'a, KeyPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Two distinct primes with their modulus and totient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyParameters {
    pub p: RsaBigInt,
    pub q: RsaBigInt,
    pub n: RsaBigInt,
    pub phi: RsaBigInt,
}

impl KeyParameters {
    /// Validate `p` and `q` and derive `n = p*q`, `phi = (p-1)*(q-1)`
    pub fn new(p: RsaBigInt, q: RsaBigInt) -> RsaResult<Self> {
        Self::with_rounds(p, q, DEFAULT_ROUNDS)
    }

    /// Same as [`KeyParameters::new`] with an explicit Miller-Rabin round count
    ///
    /// At least one Miller-Rabin round is required: with zero rounds any
    /// composite free of small factors would be accepted.
    pub fn with_rounds(p: RsaBigInt, q: RsaBigInt, rounds: u32) -> RsaResult<Self> {
        if rounds == 0 {
            return Err(RsaError::InvalidInput(
                "primality check needs at least one Miller-Rabin round".to_string(),
            ));
        }
        if p == q {
            return Err(RsaError::IdenticalPrimes(p));
        }
        for candidate in [&p, &q] {
            if !is_probable_prime(&BigInt::from(candidate.clone()), rounds) {
                return Err(RsaError::NotPrime(candidate.clone()));
            }
        }

        let (n, phi) = modulus_and_totient(&p, &q);
        Ok(Self { p, q, n, phi })
    }

    /// Enumerate the key table for these primes
    pub fn key_table(&self, bound: u64) -> KeyTable {
        enumerate_for_phi(&self.phi, bound)
    }

    /// Attach the modulus to a chosen pair
    pub fn bind(&self, pair: &KeyPair) -> (RsaPublicKey, RsaPrivateKey) {
        let public_key = RsaPublicKey {
            n: self.n.clone(),
            e: pair.e.clone(),
        };
        let private_key = RsaPrivateKey {
            n: self.n.clone(),
            d: pair.d.clone(),
        };
        (public_key, private_key)
    }
}

fn modulus_and_totient(p: &RsaBigInt, q: &RsaBigInt) -> (RsaBigInt, RsaBigInt) {
    let n = p * q;
    // A zero factor has no predecessor; phi = 0 leaves the table empty
    if p.is_zero() || q.is_zero() {
        return (n, RsaBigInt::zero());
    }
    (n, (p - 1u8) * (q - 1u8))
}

/// Enumerate every `(e, d)` with `e` in `[2, min(phi, bound))`
///
/// `n = p*q` and `phi = (p-1)*(q-1)`. Rows come out in ascending `e`. The
/// table is empty when no exponent in range is coprime to `phi`, which
/// happens for tiny primes such as `p = 2, q = 3`. The primes are not
/// validated here; use [`KeyParameters::new`] for that.
pub fn enumerate_keys(p: &RsaBigInt, q: &RsaBigInt, bound: u64) -> KeyTable {
    let (_, phi) = modulus_and_totient(p, q);
    enumerate_for_phi(&phi, bound)
}

fn enumerate_for_phi(phi: &RsaBigInt, bound: u64) -> KeyTable {
    let limit = phi.to_u64().map_or(bound, |phi| phi.min(bound));
    let phi_signed = to_signed(phi);

    let rows: Vec<KeyPair> = (2..limit)
        .filter(|&e| gcd(&BigInt::from(e), &phi_signed).is_one())
        .filter_map(|e| {
            let e = from_u64(e);
            mod_inverse(&e, phi).map(|d| KeyPair { e, d })
        })
        .collect();

    debug!("enumerated {} key pairs for phi={phi} below {limit}", rows.len());
    KeyTable { rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(e: u64, d: u64) -> KeyPair {
        KeyPair {
            e: from_u64(e),
            d: from_u64(d),
        }
    }

    #[test]
    fn test_key_parameters() {
        let params = KeyParameters::new(from_u64(11), from_u64(13)).unwrap();
        assert_eq!(params.n, from_u64(143));
        assert_eq!(params.phi, from_u64(120));
    }

    #[test]
    fn test_key_parameters_rejects_bad_primes() {
        assert_eq!(
            KeyParameters::new(from_u64(11), from_u64(11)),
            Err(RsaError::IdenticalPrimes(from_u64(11)))
        );
        assert_eq!(
            KeyParameters::new(from_u64(11), from_u64(15)),
            Err(RsaError::NotPrime(from_u64(15)))
        );
        assert_eq!(
            KeyParameters::new(from_u64(1), from_u64(13)),
            Err(RsaError::NotPrime(from_u64(1)))
        );
    }

    #[test]
    fn test_enumerate_keys_contains_textbook_pair() {
        let table = enumerate_keys(&from_u64(11), &from_u64(13), DEFAULT_ENUMERATION_BOUND);
        assert!(table.iter().any(|row| row == &pair(7, 103)));
        assert_eq!(table.find_by_e(&from_u64(7)), Some(&pair(7, 103)));
        // phi = 120 has 32 units; 1 is excluded
        assert_eq!(table.len(), 31);
        assert_eq!(table.get(0), Some(&pair(7, 103)));
    }

    #[test]
    fn test_key_properties() {
        let phi = from_u64(120);
        let table = enumerate_keys(&from_u64(11), &from_u64(13), DEFAULT_ENUMERATION_BOUND);
        for row in &table {
            assert!(row.is_valid_for(&phi), "{row:?}");
            assert!(row.d < phi);
        }
    }

    #[test]
    fn test_enumeration_is_ascending() {
        let table = enumerate_keys(&from_u64(61), &from_u64(53), DEFAULT_ENUMERATION_BOUND);
        let es: Vec<_> = table.iter().map(|row| row.e.clone()).collect();
        let mut sorted = es.clone();
        sorted.sort();
        assert_eq!(es, sorted);
        assert!(table.iter().all(|row| row.e < from_u64(DEFAULT_ENUMERATION_BOUND)));
    }

    #[test]
    fn test_enumerate_keys_empty() {
        assert!(enumerate_keys(&from_u64(2), &from_u64(3), DEFAULT_ENUMERATION_BOUND).is_empty());
    }

    #[test]
    fn test_bound_caps_exponents() {
        let table = enumerate_keys(&from_u64(11), &from_u64(13), 12);
        let es: Vec<_> = table.iter().map(|row| row.e.clone()).collect();
        assert_eq!(es, vec![from_u64(7), from_u64(11)]);

        assert!(enumerate_keys(&from_u64(11), &from_u64(13), 0).is_empty());
    }

    #[test]
    fn test_bind_keys() {
        let params = KeyParameters::new(from_u64(11), from_u64(13)).unwrap();
        let table = params.key_table(DEFAULT_ENUMERATION_BOUND);
        let chosen = table.find_by_e(&from_u64(7)).unwrap();
        let (public_key, private_key) = params.bind(chosen);
        assert_eq!(public_key, RsaPublicKey { n: from_u64(143), e: from_u64(7) });
        assert_eq!(private_key, RsaPrivateKey { n: from_u64(143), d: from_u64(103) });
    }

    #[test]
    fn test_key_table_json() {
        let table = enumerate_keys(&from_u64(5), &from_u64(7), DEFAULT_ENUMERATION_BOUND);
        let json = serde_json::to_string(&table).unwrap();
        assert!(json.starts_with(r#"[{"e":"5","d":"5"}"#), "{json}");
        assert!(json.ends_with(r#"{"e":"23","d":"23"}]"#), "{json}");
    }

    #[test]
    fn test_key_parameters_need_a_witness_round() {
        // 961 = 31^2 has no factor below 31, so only Miller-Rabin can reject it
        assert!(matches!(
            KeyParameters::with_rounds(from_u64(961), from_u64(13), 0),
            Err(RsaError::InvalidInput(_))
        ));
        assert_eq!(
            KeyParameters::with_rounds(from_u64(961), from_u64(13), 20),
            Err(RsaError::NotPrime(from_u64(961)))
        );
    }
}
