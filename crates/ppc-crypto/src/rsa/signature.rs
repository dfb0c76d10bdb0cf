//! # RSA Signatures
//!
//! EMSA-PKCS1-v1_5 encoding over SHA-256 with raw RSA exponentiation.
//!
//! ```text
//! EM = 0x00 ‖ 0x01 ‖ 0xFF…0xFF ‖ 0x00 ‖ DigestInfo(SHA-256) ‖ H(m)
//! ```
//!
//! Signatures are exactly `⌈bits(n)/8⌉` bytes. Verification compares the
//! recovered encoding with the expected one in constant time and folds
//! every failure into `false`.

use num_bigint::BigUint;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use ppc_core::CryptoError;

use super::keys::{RsaPrivateKey, RsaPublicKey};

/// DER prefix identifying a SHA-256 digest.
pub const SHA256_DIGEST_INFO: [u8; 19] = [
    0x30, 0x31, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01,
    0x05, 0x00, 0x04, 0x20,
];

/// Minimum number of 0xFF padding bytes.
pub const MIN_PADDING_LEN: usize = 8;

/// Encode a SHA-256 `hash` into an `em_len`-byte block.
pub fn emsa_pkcs1_v1_5_encode(hash: &[u8], em_len: usize) -> Result<Vec<u8>, CryptoError> {
    let t_len = SHA256_DIGEST_INFO.len() + hash.len();
    if em_len < t_len + 3 + MIN_PADDING_LEN {
        return Err(CryptoError::Format(format!(
            "intended encoded message length {em_len} is too short"
        )));
    }
    let mut em = Vec::with_capacity(em_len);
    em.extend_from_slice(&[0x00, 0x01]);
    em.resize(em_len - t_len - 1, 0xFF);
    em.push(0x00);
    em.extend_from_slice(&SHA256_DIGEST_INFO);
    em.extend_from_slice(hash);
    Ok(em)
}

/// Big-endian encoding of `value`, left-padded to exactly `len` bytes.
fn to_fixed_len(value: &BigUint, len: usize) -> Result<Vec<u8>, CryptoError> {
    let bytes = super::core::minimal_bytes(value);
    if bytes.len() > len {
        return Err(CryptoError::Format(format!(
            "integer needs {} bytes, more than {len}",
            bytes.len()
        )));
    }
    let mut out = vec![0u8; len - bytes.len()];
    out.extend_from_slice(&bytes);
    Ok(out)
}

/// Sign SHA-256(`message`) with `key`.
pub fn sign_message(message: &[u8], key: &RsaPrivateKey) -> Result<Vec<u8>, CryptoError> {
    let k = key.modulus_len();
    let em = emsa_pkcs1_v1_5_encode(&Sha256::digest(message), k)?;
    let m = BigUint::from_bytes_be(&em);
    to_fixed_len(&m.modpow(key.d(), key.n()), k)
}

/// Check `signature` over `message` against `key`.
pub fn verify_signature(message: &[u8], signature: &[u8], key: &RsaPublicKey) -> bool {
    let k = key.modulus_len();
    if signature.len() != k {
        return false;
    }
    let s = BigUint::from_bytes_be(signature);
    if &s >= key.n() {
        return false;
    }
    let Ok(recovered) = to_fixed_len(&s.modpow(key.e(), key.n()), k) else {
        return false;
    };
    let Ok(expected) = emsa_pkcs1_v1_5_encode(&Sha256::digest(message), k) else {
        return false;
    };
    recovered.as_slice().ct_eq(expected.as_slice()).into()
}
