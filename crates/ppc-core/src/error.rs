//! # Error Types
//!
//! The single error taxonomy shared by every crate in the workspace.
//! All variants use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - `Authentication` and `Padding` carry no payload. A wrong password
//!   and a tampered package must be indistinguishable to the caller, and
//!   a padding failure must reveal nothing beyond "invalid".
//! - Key-loading failures are wrapped in `KeyLoad` so callers can tell
//!   "the key file is unusable" apart from "the ciphertext is bad".

use thiserror::Error;

/// Errors from cipher, RSA, and key-file operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Input is malformed: too short, misaligned, undecodable, or
    /// otherwise structurally invalid.
    #[error("format error: {0}")]
    Format(String),

    /// MAC verification failed (wrong password or tampered data).
    #[error("authentication failed: wrong password or corrupted data")]
    Authentication,

    /// MAC was valid but the recovered padding is not.
    #[error("invalid padding")]
    Padding,

    /// RSA input exceeds the modulus chunk size.
    #[error("message too long for RSA encryption: {actual} bytes (max {max})")]
    MessageTooLong {
        /// Largest message the key can carry.
        max: usize,
        /// Length of the rejected message.
        actual: usize,
    },

    /// Modular inverse does not exist.
    #[error("modular inverse does not exist")]
    Inverse,

    /// A key file could not be decoded, decrypted, or parsed.
    #[error("failed to load key: {0}")]
    KeyLoad(#[source] Box<CryptoError>),

    /// Requested RSA modulus size is unusable.
    #[error("invalid RSA key size: {0} bits (must be even and at least 128)")]
    InvalidKeySize(u64),

    /// I/O error (key files, file encryption).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CryptoError {
    /// Wrap an error raised while loading a key.
    pub fn key_load(inner: CryptoError) -> Self {
        Self::KeyLoad(Box::new(inner))
    }

    /// The wrapped error for `KeyLoad`, otherwise `self`.
    pub fn root(&self) -> &CryptoError {
        match self {
            Self::KeyLoad(inner) => inner.root(),
            other => other,
        }
    }
}
