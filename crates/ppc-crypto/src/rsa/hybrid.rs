//! # Hybrid Encryption
//!
//! A fresh 32-byte session key, hex-encoded, is the password for the
//! [`SymmetricCipher`]; the hex key is RSA-wrapped for the recipient.
//!
//! ```text
//! wrapped_len(u32 LE) | wrapped(wrapped_len) | symmetric package (base64)
//! ```
//!
//! The 64-character hex session key requires a modulus of at least 600
//! bits.

use std::path::Path;

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use ppc_core::CryptoError;

use super::core::{rsa_decrypt, rsa_encrypt};
use super::keyfile::KeyFiles;
use super::keys::{RsaPrivateKey, RsaPublicKey};
use crate::symmetric::SymmetricCipher;

/// Random bytes in a session key (before hex encoding).
pub const SESSION_KEY_LEN: usize = 32;
/// Length of the wrapped-key length prefix.
pub const WRAPPED_LEN_FIELD: usize = 4;

/// RSA key wrapping around the symmetric cipher.
#[derive(Debug, Clone, Default)]
pub struct HybridCipher {
    cipher: SymmetricCipher,
}

impl HybridCipher {
    /// Hybrid encryption over `cipher`.
    pub fn new(cipher: SymmetricCipher) -> Self {
        Self { cipher }
    }

    /// The inner symmetric cipher.
    pub fn cipher(&self) -> &SymmetricCipher {
        &self.cipher
    }

    /// Encrypt `plaintext` for the holder of `public`.
    pub fn seal(&self, plaintext: &[u8], public: &RsaPublicKey) -> Result<Vec<u8>, CryptoError> {
        let mut session = Zeroizing::new([0u8; SESSION_KEY_LEN]);
        OsRng.fill_bytes(session.as_mut_slice());
        let password = Zeroizing::new(hex::encode(session.as_slice()));

        let wrapped = rsa_encrypt(password.as_bytes(), public)?;
        let encrypted = self.cipher.encrypt(plaintext, &password)?;
        let wrapped_len = u32::try_from(wrapped.len())
            .map_err(|_| CryptoError::Format("wrapped key exceeds u32 length".into()))?;

        let mut package =
            Vec::with_capacity(WRAPPED_LEN_FIELD + wrapped.len() + encrypted.len());
        package.extend_from_slice(&wrapped_len.to_le_bytes());
        package.extend_from_slice(&wrapped);
        package.extend_from_slice(&encrypted);
        Ok(package)
    }

    /// Decrypt a package produced by [`seal`](Self::seal).
    pub fn open(&self, package: &[u8], private: &RsaPrivateKey) -> Result<Vec<u8>, CryptoError> {
        let (wrapped, encrypted) = split_package(package)?;
        let session = Zeroizing::new(rsa_decrypt(wrapped, private)?);
        let password = std::str::from_utf8(&session)
            .map_err(|_| CryptoError::Format("session key is not UTF-8".into()))?;
        self.cipher.decrypt(encrypted, password)
    }
}

fn split_package(package: &[u8]) -> Result<(&[u8], &[u8]), CryptoError> {
    if package.len() < WRAPPED_LEN_FIELD {
        return Err(CryptoError::Format(format!(
            "hybrid package is {} bytes, shorter than its length field",
            package.len()
        )));
    }
    let (field, rest) = package.split_at(WRAPPED_LEN_FIELD);
    let mut len = [0u8; WRAPPED_LEN_FIELD];
    len.copy_from_slice(field);
    let wrapped_len = u32::from_le_bytes(len) as usize;
    if rest.len() < wrapped_len {
        return Err(CryptoError::Format(format!(
            "hybrid package declares a {wrapped_len}-byte wrapped key but holds {}",
            rest.len()
        )));
    }
    Ok(rest.split_at(wrapped_len))
}

/// Encrypt for the public key stored at `public_path`.
pub fn hybrid_encrypt(plaintext: &[u8], public_path: &Path) -> Result<Vec<u8>, CryptoError> {
    let public = KeyFiles::default().load_public_key(public_path)?;
    HybridCipher::default().seal(plaintext, &public)
}

/// Decrypt with the private key stored at `private_path`.
pub fn hybrid_decrypt(
    package: &[u8],
    private_path: &Path,
    passphrase: Option<&str>,
) -> Result<Vec<u8>, CryptoError> {
    let private = KeyFiles::default()
        .load_private_key(private_path, passphrase)?;
    HybridCipher::default().open(package, &private)
}
