//! # Ciphertext Package Layout
//!
//! Fixed-offset byte layout of an encrypted package (before base64):
//!
//! ```text
//! pbkdf2_salt(16) | prime_salt(8) | iv(16) | plaintext_len(u32 LE) | ciphertext(16·k) | mac(32)
//! ```
//!
//! The MAC covers every byte that precedes it. [`PackageView`] splits a
//! decoded package by these offsets after checking length and alignment;
//! it never looks at the MAC or the ciphertext contents.

use crate::error::CryptoError;

/// Cipher block size in bytes.
pub const BLOCK_SIZE: usize = 16;
/// Length of the PBKDF2 salt.
pub const PBKDF2_SALT_LEN: usize = 16;
/// Length of the prime-sequence salt.
pub const PRIME_SALT_LEN: usize = 8;
/// Length of the initialization vector.
pub const IV_LEN: usize = 16;
/// Length of the little-endian plaintext length field.
pub const LENGTH_FIELD_LEN: usize = 4;
/// Length of the HMAC-SHA256 tag.
pub const MAC_LEN: usize = 32;
/// Length of everything before the ciphertext.
pub const HEADER_LEN: usize = PBKDF2_SALT_LEN + PRIME_SALT_LEN + IV_LEN + LENGTH_FIELD_LEN;
/// Smallest structurally valid package (header and MAC, no ciphertext).
pub const MIN_PACKAGE_LEN: usize = HEADER_LEN + MAC_LEN;

/// Borrowed, length-checked view over a decoded package.
#[derive(Debug, Clone, Copy)]
pub struct PackageView<'a> {
    bytes: &'a [u8],
}

impl<'a> PackageView<'a> {
    /// Validate length and alignment and return a view.
    ///
    /// Fails with [`CryptoError::Format`] when the package is shorter than
    /// [`MIN_PACKAGE_LEN`] or the ciphertext region is not block-aligned.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, CryptoError> {
        if bytes.len() < MIN_PACKAGE_LEN {
            return Err(CryptoError::Format(format!(
                "package is {} bytes, minimum is {MIN_PACKAGE_LEN}",
                bytes.len()
            )));
        }
        if (bytes.len() - MIN_PACKAGE_LEN) % BLOCK_SIZE != 0 {
            return Err(CryptoError::Format(format!(
                "ciphertext length {} is not a multiple of {BLOCK_SIZE}",
                bytes.len() - MIN_PACKAGE_LEN
            )));
        }
        Ok(Self { bytes })
    }

    /// The PBKDF2 salt.
    pub fn pbkdf2_salt(&self) -> &'a [u8] {
        &self.bytes[..PBKDF2_SALT_LEN]
    }

    /// The prime-sequence salt.
    pub fn prime_salt(&self) -> &'a [u8] {
        let start = PBKDF2_SALT_LEN;
        &self.bytes[start..start + PRIME_SALT_LEN]
    }

    /// The initialization vector.
    pub fn iv(&self) -> &'a [u8] {
        let start = PBKDF2_SALT_LEN + PRIME_SALT_LEN;
        &self.bytes[start..start + IV_LEN]
    }

    /// The declared plaintext length.
    pub fn plaintext_len(&self) -> u32 {
        let start = HEADER_LEN - LENGTH_FIELD_LEN;
        let mut field = [0u8; LENGTH_FIELD_LEN];
        field.copy_from_slice(&self.bytes[start..HEADER_LEN]);
        u32::from_le_bytes(field)
    }

    /// The block-aligned ciphertext region.
    pub fn ciphertext(&self) -> &'a [u8] {
        &self.bytes[HEADER_LEN..self.bytes.len() - MAC_LEN]
    }

    /// Every byte covered by the MAC.
    pub fn authenticated(&self) -> &'a [u8] {
        &self.bytes[..self.bytes.len() - MAC_LEN]
    }

    /// The received MAC.
    pub fn mac(&self) -> &'a [u8] {
        &self.bytes[self.bytes.len() - MAC_LEN..]
    }
}

/// Concatenate the header fields and ciphertext into the MAC input.
pub fn assemble_unsealed(
    pbkdf2_salt: &[u8; PBKDF2_SALT_LEN],
    prime_salt: &[u8; PRIME_SALT_LEN],
    iv: &[u8; IV_LEN],
    plaintext_len: u32,
    ciphertext: &[u8],
) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + ciphertext.len() + MAC_LEN);
    out.extend_from_slice(pbkdf2_salt);
    out.extend_from_slice(prime_salt);
    out.extend_from_slice(iv);
    out.extend_from_slice(&plaintext_len.to_le_bytes());
    out.extend_from_slice(ciphertext);
    out
}
