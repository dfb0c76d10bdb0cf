//! # Raw RSA Encryption
//!
//! Textbook RSA over a randomized message encoding:
//!
//! ```text
//! m = prefix(8 random bytes, first byte non-zero) ‖ message
//! c = m^e mod n
//! ```
//!
//! Messages may be at most `⌊bits(n)/8⌋ − 11` bytes. The non-zero lead
//! byte keeps the minimal big-endian encoding of `m` at its full length,
//! so decryption strips exactly eight bytes and leading zero bytes of the
//! message survive.
//!
//! This is not OAEP. It is kept for compatibility with existing hybrid
//! packages and key files.

use num_bigint::BigUint;
use num_traits::Zero;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use ppc_core::CryptoError;

use super::keys::{RsaPrivateKey, RsaPublicKey};

/// Random bytes prepended to every message.
pub const RSA_PREFIX_LEN: usize = 8;

/// Minimal big-endian encoding; zero encodes as no bytes.
pub(crate) fn minimal_bytes(value: &BigUint) -> Vec<u8> {
    if value.is_zero() {
        Vec::new()
    } else {
        value.to_bytes_be()
    }
}

/// Encrypt `message` under `key` with prefix bytes from the OS RNG.
pub fn rsa_encrypt(message: &[u8], key: &RsaPublicKey) -> Result<Vec<u8>, CryptoError> {
    rsa_encrypt_with_rng(message, key, &mut OsRng)
}

/// [`rsa_encrypt`] drawing the prefix from `rng`.
pub fn rsa_encrypt_with_rng<R: RngCore + CryptoRng + ?Sized>(
    message: &[u8],
    key: &RsaPublicKey,
    rng: &mut R,
) -> Result<Vec<u8>, CryptoError> {
    if key.bits() <= (RSA_PREFIX_LEN as u64) * 8 {
        return Err(CryptoError::Format(format!(
            "{}-bit modulus cannot carry the message prefix",
            key.bits()
        )));
    }
    let max = key.max_message_len();
    if message.len() > max {
        return Err(CryptoError::MessageTooLong {
            max,
            actual: message.len(),
        });
    }

    let mut encoded = Zeroizing::new(vec![0u8; RSA_PREFIX_LEN + message.len()]);
    rng.fill_bytes(&mut encoded[..RSA_PREFIX_LEN]);
    while encoded[0] == 0 {
        encoded[0] = (rng.next_u32() & 0xFF) as u8;
    }
    encoded[RSA_PREFIX_LEN..].copy_from_slice(message);

    let m = BigUint::from_bytes_be(&encoded);
    Ok(minimal_bytes(&m.modpow(key.e(), key.n())))
}

/// Decrypt `ciphertext` and strip the prefix.
///
/// Fails with [`CryptoError::Format`] when the ciphertext integer is not
/// below the modulus or the recovered block is shorter than the prefix.
pub fn rsa_decrypt(ciphertext: &[u8], key: &RsaPrivateKey) -> Result<Vec<u8>, CryptoError> {
    let c = BigUint::from_bytes_be(ciphertext);
    if &c >= key.n() {
        return Err(CryptoError::Format(
            "RSA ciphertext is not below the modulus".into(),
        ));
    }
    let recovered = Zeroizing::new(minimal_bytes(&c.modpow(key.d(), key.n())));
    if recovered.len() < RSA_PREFIX_LEN {
        return Err(CryptoError::Format(
            "RSA plaintext is shorter than its prefix".into(),
        ));
    }
    Ok(recovered[RSA_PREFIX_LEN..].to_vec())
}
