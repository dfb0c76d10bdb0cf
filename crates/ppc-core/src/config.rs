//! # Toolkit Parameters
//!
//! Tunable work factors for the symmetric cipher and RSA key generation.
//! Every field has a default, so a configuration file only needs to name
//! what it overrides.
//!
//! The PBKDF2 iteration count is not recorded in the ciphertext package.
//! A package encrypted under one count only decrypts under the same count;
//! any other count fails authentication.

use serde::{Deserialize, Serialize};

use crate::error::CryptoError;

/// Default PBKDF2-HMAC-SHA256 iteration count.
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 100_000;

/// Default number of prime sequences held by a prime cache.
pub const DEFAULT_PRIME_CACHE_CAPACITY: usize = 32;

/// Default RSA modulus size in bits.
pub const DEFAULT_KEY_BITS: u64 = 2048;

/// Smallest RSA modulus accepted by key generation.
pub const MIN_KEY_BITS: u64 = 128;

/// Parameters of the password-based symmetric cipher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CipherParams {
    /// PBKDF2 iteration count.
    pub pbkdf2_iterations: u32,
    /// Capacity of the prime-sequence cache, when one is attached.
    pub prime_cache_capacity: usize,
}

impl Default for CipherParams {
    fn default() -> Self {
        Self {
            pbkdf2_iterations: DEFAULT_PBKDF2_ITERATIONS,
            prime_cache_capacity: DEFAULT_PRIME_CACHE_CAPACITY,
        }
    }
}

impl CipherParams {
    /// Parameters with a custom iteration count and default cache size.
    pub fn with_iterations(pbkdf2_iterations: u32) -> Self {
        Self {
            pbkdf2_iterations,
            ..Self::default()
        }
    }
}

/// Parameters of RSA key generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RsaParams {
    /// Modulus size in bits.
    pub key_bits: u64,
}

impl Default for RsaParams {
    fn default() -> Self {
        Self {
            key_bits: DEFAULT_KEY_BITS,
        }
    }
}

/// Top-level toolkit configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PpcConfig {
    /// Symmetric cipher parameters.
    pub cipher: CipherParams,
    /// RSA parameters.
    pub rsa: RsaParams,
}

impl PpcConfig {
    /// Reject parameter combinations no operation can honor.
    pub fn validate(&self) -> Result<(), CryptoError> {
        if self.cipher.pbkdf2_iterations == 0 {
            return Err(CryptoError::Format(
                "pbkdf2_iterations must be at least 1".to_string(),
            ));
        }
        validate_key_bits(self.rsa.key_bits)
    }
}

/// Check an RSA modulus size: even and at least [`MIN_KEY_BITS`].
pub fn validate_key_bits(bits: u64) -> Result<(), CryptoError> {
    if bits < MIN_KEY_BITS || bits % 2 != 0 {
        return Err(CryptoError::InvalidKeySize(bits));
    }
    Ok(())
}
