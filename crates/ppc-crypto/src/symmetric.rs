//! # Symmetric Cipher
//!
//! Password-based authenticated encryption built from the permutation,
//! prime oracle, and keystream engine.
//!
//! ## Encryption
//!
//! 1. Draw `pbkdf2_salt` (16), `prime_salt` (8), and `iv` (16).
//! 2. Derive 64 bytes of key material and the password's permutation.
//! 3. Pad to `(len / 16 + 1) * 16` bytes. The pad value is always 1..=16;
//!    block-aligned input gains a whole block of padding.
//! 4. Primes: `padded / 4 + 16` of them, seeded by
//!    `(prime_seed ^ prime_salt) mod 2^32`.
//! 5. `prime_iv[i] = S[iv[i] ^ (primes[i] & 0xFF)]`.
//! 6. Per block: `c = S[p ^ prev] ^ keystream`, with `prev` the previous
//!    ciphertext block (`prime_iv` for the first).
//! 7. `base64(header ‖ ciphertext ‖ HMAC-SHA256(hmac_key, header ‖ ciphertext))`.
//!
//! ## Security Invariants
//!
//! - The MAC is checked before any block is decrypted. A wrong password
//!   and a tampered package both yield [`CryptoError::Authentication`].
//! - The padding check inspects the whole final block and the declared
//!   plaintext length without data-dependent branches, so a
//!   [`CryptoError::Padding`] reveals nothing about where it failed.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use sha2::Sha256;
use subtle::{Choice, ConstantTimeEq, ConstantTimeGreater, ConstantTimeLess};
use zeroize::{Zeroize, Zeroizing};

use ppc_core::config::CipherParams;
use ppc_core::layout::{
    assemble_unsealed, PackageView, BLOCK_SIZE, IV_LEN, MAC_LEN, PBKDF2_SALT_LEN, PRIME_SALT_LEN,
};
use ppc_core::CryptoError;

use crate::kdf::{password_to_key_material, KeyMaterial};
use crate::keystream::{derive_complex_keystream, prime_influence};
use crate::permutation::Permutation;
use crate::prime::{PrimeOracle, PrimeSequenceCache};

type HmacSha256 = Hmac<Sha256>;

/// Length of the plaintext after padding.
pub fn padded_length(plaintext_len: usize) -> usize {
    (plaintext_len / BLOCK_SIZE + 1) * BLOCK_SIZE
}

/// Whiten the IV with the prime sequence and substitute it.
pub fn enhance_iv_with_primes(
    iv: &[u8; IV_LEN],
    primes: &[u64],
    perm: &Permutation,
) -> [u8; IV_LEN] {
    let mut out = *iv;
    for (i, byte) in out.iter_mut().enumerate() {
        *byte = perm.substitute(*byte ^ prime_influence(primes, i));
    }
    out
}

/// Per-message values shared by encryption and decryption.
struct Schedule {
    prime_iv: [u8; IV_LEN],
    keystream: Zeroizing<Vec<u8>>,
}

impl Schedule {
    fn derive(
        oracle: &PrimeOracle,
        key_material: &KeyMaterial,
        perm: &Permutation,
        prime_salt: &[u8; PRIME_SALT_LEN],
        iv: &[u8; IV_LEN],
        padded_len: usize,
    ) -> Self {
        let salt = u64::from_be_bytes(*prime_salt);
        let seed = (key_material.prime_seed() ^ salt) as u32;
        let primes = oracle.sequence(padded_len / 4 + 16, seed);
        let prime_iv = enhance_iv_with_primes(iv, &primes, perm);
        let keystream =
            derive_complex_keystream(&primes, padded_len, &key_material.cipher_seed(), perm);
        Self {
            prime_iv,
            keystream,
        }
    }
}

/// Authenticated password-based cipher.
///
/// Cheap to clone; clones share the prime cache, if one is attached.
#[derive(Debug, Clone, Default)]
pub struct SymmetricCipher {
    params: CipherParams,
    oracle: PrimeOracle,
}

impl SymmetricCipher {
    /// A cipher with the given parameters and no prime cache.
    pub fn new(params: CipherParams) -> Self {
        Self {
            params,
            oracle: PrimeOracle::uncached(),
        }
    }

    /// A cipher with its own prime cache sized by `params`.
    pub fn with_prime_cache(params: CipherParams) -> Self {
        let cache = PrimeSequenceCache::new(params.prime_cache_capacity);
        Self::with_oracle(params, PrimeOracle::with_cache(Arc::new(cache)))
    }

    /// A cipher drawing prime sequences from `oracle`.
    pub fn with_oracle(params: CipherParams, oracle: PrimeOracle) -> Self {
        Self { params, oracle }
    }

    /// The cipher's parameters.
    pub fn params(&self) -> &CipherParams {
        &self.params
    }

    /// The cipher's prime oracle.
    pub fn oracle(&self) -> &PrimeOracle {
        &self.oracle
    }

    /// Encrypt `plaintext` under `password`, returning base64 bytes.
    pub fn encrypt(&self, plaintext: &[u8], password: &str) -> Result<Vec<u8>, CryptoError> {
        self.encrypt_with_rng(plaintext, password, &mut OsRng)
    }

    /// Encrypt with salts and IV drawn from `rng`.
    pub fn encrypt_with_rng<R>(
        &self,
        plaintext: &[u8],
        password: &str,
        rng: &mut R,
    ) -> Result<Vec<u8>, CryptoError>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        let declared_len = u32::try_from(plaintext.len()).map_err(|_| {
            CryptoError::Format(format!(
                "plaintext of {} bytes exceeds the 4 GiB package limit",
                plaintext.len()
            ))
        })?;

        let mut pbkdf2_salt = [0u8; PBKDF2_SALT_LEN];
        let mut prime_salt = [0u8; PRIME_SALT_LEN];
        let mut iv = [0u8; IV_LEN];
        rng.fill_bytes(&mut pbkdf2_salt);
        rng.fill_bytes(&mut prime_salt);
        rng.fill_bytes(&mut iv);

        let key_material =
            password_to_key_material(password, &pbkdf2_salt, self.params.pbkdf2_iterations);
        let perm = Permutation::from_password(password);
        let padded_len = padded_length(plaintext.len());
        let schedule = Schedule::derive(
            &self.oracle,
            &key_material,
            &perm,
            &prime_salt,
            &iv,
            padded_len,
        );

        let pad = (padded_len - plaintext.len()) as u8;
        let mut ciphertext = vec![0u8; padded_len];
        let mut previous = schedule.prime_iv;
        for (index, out) in ciphertext.chunks_exact_mut(BLOCK_SIZE).enumerate() {
            let start = index * BLOCK_SIZE;
            let mut block = [pad; BLOCK_SIZE];
            if start < plaintext.len() {
                let end = plaintext.len().min(start + BLOCK_SIZE);
                block[..end - start].copy_from_slice(&plaintext[start..end]);
            }
            for (i, byte) in out.iter_mut().enumerate() {
                *byte = perm.substitute(block[i] ^ previous[i]) ^ schedule.keystream[start + i];
            }
            previous.copy_from_slice(out);
            block.zeroize();
        }

        let mut package =
            assemble_unsealed(&pbkdf2_salt, &prime_salt, &iv, declared_len, &ciphertext);
        let tag = compute_mac(key_material.hmac_key(), &package)?;
        package.extend_from_slice(&tag);

        tracing::trace!(
            plaintext_len = plaintext.len(),
            package_len = package.len(),
            "encrypted package"
        );
        Ok(BASE64.encode(&package).into_bytes())
    }

    /// Decrypt a base64 package produced by [`encrypt`](Self::encrypt).
    pub fn decrypt(&self, encoded: &[u8], password: &str) -> Result<Vec<u8>, CryptoError> {
        let decoded = BASE64
            .decode(trim_ascii_whitespace(encoded))
            .map_err(|e| CryptoError::Format(format!("invalid base64: {e}")))?;
        let view = PackageView::parse(&decoded)?;

        let key_material = password_to_key_material(
            password,
            view.pbkdf2_salt(),
            self.params.pbkdf2_iterations,
        );
        verify_mac(key_material.hmac_key(), view.authenticated(), view.mac())?;

        let ciphertext = view.ciphertext();
        if ciphertext.is_empty() {
            return Err(CryptoError::Padding);
        }

        let mut prime_salt = [0u8; PRIME_SALT_LEN];
        prime_salt.copy_from_slice(view.prime_salt());
        let mut iv = [0u8; IV_LEN];
        iv.copy_from_slice(view.iv());

        let perm = Permutation::from_password(password);
        let padded_len = ciphertext.len();
        let schedule = Schedule::derive(
            &self.oracle,
            &key_material,
            &perm,
            &prime_salt,
            &iv,
            padded_len,
        );

        let mut recovered = Zeroizing::new(vec![0u8; padded_len]);
        let mut previous = schedule.prime_iv;
        for (index, block) in ciphertext.chunks_exact(BLOCK_SIZE).enumerate() {
            let start = index * BLOCK_SIZE;
            for (i, &byte) in block.iter().enumerate() {
                recovered[start + i] =
                    perm.invert(byte ^ schedule.keystream[start + i]) ^ previous[i];
            }
            previous.copy_from_slice(block);
        }

        let pad = check_padding(&recovered, view.plaintext_len())?;
        Ok(recovered[..padded_len - pad].to_vec())
    }
}

/// Encrypt with default parameters.
pub fn encrypt(plaintext: &[u8], password: &str) -> Result<Vec<u8>, CryptoError> {
    SymmetricCipher::default().encrypt(plaintext, password)
}

/// Decrypt with default parameters.
pub fn decrypt(encoded: &[u8], password: &str) -> Result<Vec<u8>, CryptoError> {
    SymmetricCipher::default().decrypt(encoded, password)
}

fn new_mac(key: &[u8]) -> Result<HmacSha256, CryptoError> {
    <HmacSha256 as Mac>::new_from_slice(key)
        .map_err(|e| CryptoError::Format(format!("invalid HMAC key: {e}")))
}

/// HMAC-SHA256 of `data` under `key`.
pub(crate) fn compute_mac(key: &[u8], data: &[u8]) -> Result<[u8; MAC_LEN], CryptoError> {
    let mut mac = new_mac(key)?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().into())
}

/// Constant-time MAC check.
fn verify_mac(key: &[u8], data: &[u8], tag: &[u8]) -> Result<(), CryptoError> {
    let mut mac = new_mac(key)?;
    mac.update(data);
    mac.verify_slice(tag)
        .map_err(|_| CryptoError::Authentication)
}

/// Validate the padding of the recovered buffer and return the pad length.
///
/// Checks `1 <= pad <= 16`, that the trailing `pad` bytes all equal `pad`,
/// and that the declared plaintext length matches. Every byte of the final
/// block is examined regardless of the outcome.
fn check_padding(recovered: &[u8], declared_len: u32) -> Result<usize, CryptoError> {
    let len = recovered.len();
    let pad = recovered[len - 1];

    let mut valid: Choice = !pad.ct_eq(&0) & !pad.ct_gt(&(BLOCK_SIZE as u8));
    for (offset, &byte) in recovered[len - BLOCK_SIZE..].iter().rev().enumerate() {
        let in_pad = (offset as u8).ct_lt(&pad);
        valid &= !in_pad | byte.ct_eq(&pad);
    }
    let expected_len = (len as u64).wrapping_sub(u64::from(pad));
    valid &= u64::from(declared_len).ct_eq(&expected_len);

    if bool::from(valid) {
        Ok(usize::from(pad))
    } else {
        Err(CryptoError::Padding)
    }
}

pub(crate) fn trim_ascii_whitespace(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}
