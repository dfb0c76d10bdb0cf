//! # Key Derivation
//!
//! PBKDF2-HMAC-SHA256 password stretching into 64 bytes of key material,
//! sliced into the seeds and keys the cipher needs.

use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Length of derived key material.
pub const KEY_MATERIAL_LEN: usize = 64;

/// 64 bytes of PBKDF2 output. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial([u8; KEY_MATERIAL_LEN]);

impl KeyMaterial {
    /// Big-endian u64 of bytes `[0..8]`, the prime-sequence seed.
    pub fn prime_seed(&self) -> u64 {
        let mut seed = [0u8; 8];
        seed.copy_from_slice(&self.0[..8]);
        u64::from_be_bytes(seed)
    }

    /// Bytes `[0..16]`, the keystream key chunk.
    pub fn cipher_seed(&self) -> Zeroizing<[u8; 16]> {
        let mut chunk = Zeroizing::new([0u8; 16]);
        chunk.copy_from_slice(&self.0[..16]);
        chunk
    }

    /// Bytes `[40..64]`, the HMAC key.
    pub fn hmac_key(&self) -> &[u8] {
        &self.0[40..]
    }

    /// The full 64 bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_MATERIAL_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KeyMaterial(<redacted>)")
    }
}

/// Stretch `password` with `salt` over `iterations` PBKDF2 rounds.
pub fn password_to_key_material(password: &str, salt: &[u8], iterations: u32) -> KeyMaterial {
    let mut out = [0u8; KEY_MATERIAL_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut out);
    let material = KeyMaterial(out);
    out.zeroize();
    material
}
