// Prime Testing and Generation
// Miller-Rabin primality test and bounded random prime search

use log::{debug, warn};
use num_bigint::{BigInt, RandBigInt};
use num_integer::Integer;
use num_traits::One;
use rand::{thread_rng, Rng};

use super::bigint::{mod_pow, RsaBigInt};
use crate::error::{RsaError, RsaResult};

/// Default number of Miller-Rabin rounds (error probability <= 4^-5)
pub const DEFAULT_ROUNDS: u32 = 5;

/// Default cap on candidates drawn by the prime generator
pub const DEFAULT_MAX_ATTEMPTS: u64 = 100_000;

/// Primes used for trial division before Miller-Rabin
pub const SMALL_PRIMES: [u32; 10] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29];

/// Miller-Rabin primality test using the thread-local RNG
/// Returns true if n is probably prime
pub fn is_probable_prime(n: &BigInt, rounds: u32) -> bool {
    is_probable_prime_with_rng(n, rounds, &mut thread_rng())
}

/// Miller-Rabin primality test drawing witnesses from `rng`
///
/// Anything below 2, including negatives, is rejected outright. Numbers
/// that equal or are divisible by one of [`SMALL_PRIMES`] are settled by
/// trial division; the rest go through `rounds` random witnesses.
pub fn is_probable_prime_with_rng<R: Rng + ?Sized>(
    n: &BigInt,
    rounds: u32,
    rng: &mut R,
) -> bool {
    let n = match n.to_biguint() {
        Some(n) if n >= RsaBigInt::from(2u8) => n,
        _ => return false,
    };

    for p in SMALL_PRIMES {
        let p = RsaBigInt::from(p);
        if n == p {
            return true;
        }
        if n.is_multiple_of(&p) {
            return false;
        }
    }

    // Write n-1 as d * 2^s with d odd
    let n_minus_one = &n - 1u8;
    let mut d = n_minus_one.clone();
    let mut s = 0u32;
    while d.is_even() {
        d >>= 1;
        s += 1;
    }

    // Witness loop
    let two = RsaBigInt::from(2u8);

    'witness: for _ in 0..rounds {
        // Pick random witness a in [2, n-2]
        let a = rng.gen_biguint_range(&two, &n_minus_one);

        // Compute x = a^d mod n
        let mut x = mod_pow(&a, &d, &n);

        if x.is_one() || x == n_minus_one {
            continue;
        }

        for _ in 1..s {
            x = mod_pow(&x, &two, &n);
            if x == n_minus_one {
                continue 'witness;
            }
        }

        // Composite
        return false;
    }

    // Probably prime
    true
}

/// Generate a random prime of specified bit length
///
/// Uses the thread-local RNG, [`DEFAULT_ROUNDS`] and [`DEFAULT_MAX_ATTEMPTS`].
pub fn generate_prime(bits: u32) -> RsaResult<RsaBigInt> {
    generate_prime_with_rng(bits, DEFAULT_ROUNDS, DEFAULT_MAX_ATTEMPTS, &mut thread_rng())
}

/// Sample uniformly from `[2^(bits-1), 2^bits)` until a candidate passes
/// the primality test, giving up after `max_attempts` candidates.
pub fn generate_prime_with_rng<R: Rng + ?Sized>(
    bits: u32,
    rounds: u32,
    max_attempts: u64,
    rng: &mut R,
) -> RsaResult<RsaBigInt> {
    if bits < 2 {
        return Err(RsaError::InvalidInput(format!(
            "prime bit width must be at least 2, got {bits}"
        )));
    }

    let lower = RsaBigInt::one() << (bits - 1);
    let upper = RsaBigInt::one() << bits;

    for attempt in 1..=max_attempts {
        let candidate = rng.gen_biguint_range(&lower, &upper);

        if is_probable_prime_with_rng(&BigInt::from(candidate.clone()), rounds, rng) {
            debug!("found {bits}-bit prime after {attempt} attempts");
            return Ok(candidate);
        }
    }

    warn!("prime search for {bits} bits exhausted {max_attempts} attempts");
    Err(RsaError::PrimeSearchExhausted {
        bits,
        attempts: max_attempts,
    })
}

/// Generate two different primes of the same bit length
pub fn generate_distinct_primes(bits: u32) -> RsaResult<(RsaBigInt, RsaBigInt)> {
    generate_distinct_primes_with_rng(bits, DEFAULT_ROUNDS, DEFAULT_MAX_ATTEMPTS, &mut thread_rng())
}

/// Draw `p`, then redraw `q` until it differs from `p`
///
/// A 2-bit width only holds the primes 2 and 3, the smallest width where
/// two distinct primes exist.
pub fn generate_distinct_primes_with_rng<R: Rng + ?Sized>(
    bits: u32,
    rounds: u32,
    max_attempts: u64,
    rng: &mut R,
) -> RsaResult<(RsaBigInt, RsaBigInt)> {
    let p = generate_prime_with_rng(bits, rounds, max_attempts, rng)?;

    for _ in 0..max_attempts {
        let q = generate_prime_with_rng(bits, rounds, max_attempts, rng)?;
        if q != p {
            debug!("generated distinct {bits}-bit primes p={p} q={q}");
            return Ok((p, q));
        }
    }

    Err(RsaError::PrimeSearchExhausted {
        bits,
        attempts: max_attempts,
    })
}
