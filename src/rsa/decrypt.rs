// RSA Decryption Implementation
// Same modular exponentiation as encryption, driven by the private exponent

use num_traits::ToPrimitive;

use super::bigint::RsaBigInt;
use super::encrypt::transform;
use super::keygen::RsaPrivateKey;
use crate::error::{RsaError, RsaResult};

/// Decrypt blocks with a private key
///
/// Ciphertext blocks at or above `n` are reduced like any other value, which
/// matches how the key holder would recompute them by hand.
pub fn decrypt(values: &[RsaBigInt], private_key: &RsaPrivateKey) -> RsaResult<Vec<RsaBigInt>> {
    transform(values, &private_key.d, &private_key.n)
}

/// Decrypt to u64 values; fails if a block does not fit in 64 bits
pub fn decrypt_to_u64(values: &[RsaBigInt], private_key: &RsaPrivateKey) -> RsaResult<Vec<u64>> {
    decrypt(values, private_key)?
        .into_iter()
        .map(|block| {
            block.to_u64().ok_or_else(|| {
                RsaError::InvalidInput(format!("decrypted block {block} exceeds u64"))
            })
        })
        .collect()
}
