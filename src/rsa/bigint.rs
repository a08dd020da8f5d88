// RSA Big Integer Operations
// Modular arithmetic toolkit on top of num-bigint: gcd, Bézout, inverse, modpow

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

/// RSA Big Integer type alias
pub type RsaBigInt = BigUint;

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RsaBigInt {
    RsaBigInt::from(n)
}

/// Convert big integer to bytes (big-endian)
pub fn to_bytes(n: &RsaBigInt) -> Vec<u8> {
    n.to_bytes_be()
}

/// Widen an unsigned value into the signed domain
pub fn to_signed(n: &RsaBigInt) -> BigInt {
    BigInt::from_biguint(Sign::Plus, n.clone())
}

/// Modular exponentiation: base^exp mod modulus
/// Uses square-and-multiply algorithm
///
/// `modulus` must be non-zero; callers check this before reaching here.
pub fn mod_pow(base: &RsaBigInt, exp: &RsaBigInt, modulus: &RsaBigInt) -> RsaBigInt {
    if modulus.is_one() {
        return RsaBigInt::zero();
    }

    let mut result = RsaBigInt::one();
    let mut base = base % modulus;
    let mut exp = exp.clone();

    while !exp.is_zero() {
        if exp.is_odd() {
            result = (&result * &base) % modulus;
        }
        base = (&base * &base) % modulus;
        exp >>= 1;
    }

    result
}

/// Greatest common divisor (Euclid)
///
/// Defined for every pair of integers. The result is never negative and
/// `gcd(0, 0) == 0`.
pub fn gcd(a: &BigInt, b: &BigInt) -> BigInt {
    let mut a = a.abs();
    let mut b = b.abs();

    while !b.is_zero() {
        let r = &a % &b;
        a = b;
        b = r;
    }

    a
}

/// Extended Euclidean Algorithm
/// Returns (gcd, x, y) such that a*x + b*y = gcd = gcd(a, b)
///
/// The returned gcd is non-negative, matching [`gcd`].
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let (g, x, y) = bezout(a, b);
    if g.is_negative() {
        (-g, -x, -y)
    } else {
        (g, x, y)
    }
}

fn bezout(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    if b.is_zero() {
        return (a.clone(), BigInt::one(), BigInt::zero());
    }

    // Truncating division keeps a = (a / b) * b + (a % b) for any signs
    let (g, x1, y1) = bezout(b, &(a % b));
    let y = &x1 - (a / b) * &y1;

    (g, y1, y)
}

/// Compute modular inverse: e^(-1) mod phi
///
/// Returns the unique `d` in `[0, phi)` with `(e * d) mod phi == 1`, or
/// `None` when `gcd(e, phi) != 1`. A modulus of 0 or 1 has no such `d`.
pub fn mod_inverse(e: &RsaBigInt, phi: &RsaBigInt) -> Option<RsaBigInt> {
    if phi <= &RsaBigInt::one() {
        return None;
    }

    let phi = to_signed(phi);
    let (g, x, _) = extended_gcd(&to_signed(e), &phi);

    if !g.is_one() {
        // Inverse doesn't exist
        return None;
    }

    x.mod_floor(&phi).to_biguint()
}

/// Serde adapter writing big integers as decimal strings
pub(crate) mod decimal {
    use super::RsaBigInt;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &RsaBigInt, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(n: i64) -> BigInt {
        BigInt::from(n)
    }

    #[test]
    fn test_mod_pow() {
        // 3^5 mod 7 = 243 mod 7 = 5
        let base = from_u64(3);
        let exp = from_u64(5);
        let modulus = from_u64(7);
        let result = mod_pow(&base, &exp, &modulus);
        assert_eq!(result, from_u64(5));
    }

    #[test]
    fn test_mod_pow_edge_exponents() {
        let modulus = from_u64(143);
        assert_eq!(mod_pow(&from_u64(10), &from_u64(0), &modulus), from_u64(1));
        assert_eq!(mod_pow(&from_u64(0), &from_u64(7), &modulus), from_u64(0));
        assert_eq!(mod_pow(&from_u64(99), &from_u64(7), &from_u64(1)), from_u64(0));
        // 10^7 mod 143 = 59
        assert_eq!(mod_pow(&from_u64(10), &from_u64(7), &modulus), from_u64(59));
    }

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(&big(12), &big(18)), big(6));
        assert_eq!(gcd(&big(17), &big(0)), big(17));
        assert_eq!(gcd(&big(0), &big(0)), big(0));
        assert_eq!(gcd(&big(0), &big(9)), big(9));
        assert_eq!(gcd(&big(-12), &big(18)), big(6));
        assert_eq!(gcd(&big(-7), &big(0)), big(7));
        assert_eq!(gcd(&big(7), &big(120)), big(1));
    }

    #[test]
    fn test_extended_gcd_bezout() {
        let cases = [(240, 46), (7, 120), (120, 7), (-35, 15), (0, 5), (5, 0), (-4, -6)];
        for (a, b) in cases {
            let (a, b) = (big(a), big(b));
            let (g, x, y) = extended_gcd(&a, &b);
            assert_eq!(g, gcd(&a, &b));
            assert_eq!(&a * &x + &b * &y, g);
        }
    }

    #[test]
    fn test_mod_inverse() {
        // 3 * 5 = 15 ≡ 1 mod 7, so inverse of 3 mod 7 is 5
        let a = from_u64(3);
        let m = from_u64(7);
        let inv = mod_inverse(&a, &m).unwrap();
        assert_eq!(inv, from_u64(5));

        // Verify: 3 * 5 = 15 ≡ 1 (mod 7)
        assert_eq!((a * inv) % m, from_u64(1));

        assert_eq!(mod_inverse(&from_u64(7), &from_u64(120)), Some(from_u64(103)));
    }

    #[test]
    fn test_mod_inverse_missing() {
        assert_eq!(mod_inverse(&from_u64(4), &from_u64(8)), None);
        assert_eq!(mod_inverse(&from_u64(6), &from_u64(120)), None);
        assert_eq!(mod_inverse(&from_u64(0), &from_u64(7)), None);
        assert_eq!(mod_inverse(&from_u64(3), &from_u64(1)), None);
        assert_eq!(mod_inverse(&from_u64(3), &from_u64(0)), None);
    }

    #[test]
    fn test_mod_inverse_reduces_large_e() {
        // e larger than phi still yields d in [0, phi)
        let d = mod_inverse(&from_u64(127), &from_u64(120)).unwrap();
        assert_eq!(d, from_u64(103));
    }

    #[test]
    fn test_decimal_serde() {
        #[derive(serde::Serialize)]
        struct Wrapper {
            #[serde(serialize_with = "decimal::serialize")]
            value: RsaBigInt,
        }

        let wrapper = Wrapper { value: from_u64(1234567890123) };
        let json = serde_json::to_string(&wrapper).unwrap();
        assert_eq!(json, r#"{"value":"1234567890123"}"#);
    }
}
