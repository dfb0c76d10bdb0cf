//! # Tamper Resistance
//!
//! Every modification of an encrypted package must be caught before any
//! plaintext is returned.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use ppc_core::config::CipherParams;
use ppc_core::CryptoError;
use ppc_crypto::SymmetricCipher;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn cipher() -> SymmetricCipher {
    SymmetricCipher::new(CipherParams::with_iterations(500))
}

#[test]
fn every_byte_of_the_package_is_authenticated() {
    let cipher = cipher();
    let message = b"Data to protect, 33 bytes long!!!";
    let encrypted = cipher.encrypt(message, "tamper123").unwrap();
    let package = BASE64.decode(&encrypted).unwrap();

    for idx in 0..package.len() {
        for mask in [0x01u8, 0x80, 0xFF] {
            let mut tampered = package.clone();
            tampered[idx] ^= mask;
            let result = cipher.decrypt(BASE64.encode(&tampered).as_bytes(), "tamper123");
            assert!(
                matches!(
                    result,
                    Err(CryptoError::Authentication | CryptoError::Padding)
                ),
                "byte {idx} mask {mask:#04x}: {result:?}"
            );
        }
    }
}

#[test]
fn truncation_and_extension_are_rejected() {
    let cipher = cipher();
    let encrypted = cipher.encrypt(b"0123456789abcdef", "pw").unwrap();
    let package = BASE64.decode(&encrypted).unwrap();

    let truncated = BASE64.encode(&package[..package.len() - 16]);
    assert!(cipher.decrypt(truncated.as_bytes(), "pw").is_err());

    let mut extended = package.clone();
    extended.extend_from_slice(&[0u8; 16]);
    assert!(matches!(
        cipher.decrypt(BASE64.encode(&extended).as_bytes(), "pw"),
        Err(CryptoError::Authentication)
    ));

    let dropped_block = [&package[..44], &package[60..]].concat();
    assert!(matches!(
        cipher.decrypt(BASE64.encode(&dropped_block).as_bytes(), "pw"),
        Err(CryptoError::Authentication)
    ));
}

#[test]
fn wrong_password_is_authentication_error() {
    let cipher = cipher();
    let password = "correcthorsebatterystaple";
    let encrypted = cipher.encrypt(b"Sensitive Data", password).unwrap();
    for wrong in ["123456", "", "correcthorsebatterystaplE"] {
        assert!(matches!(
            cipher.decrypt(&encrypted, wrong),
            Err(CryptoError::Authentication)
        ));
    }
}

#[test]
fn random_inputs_never_decrypt() {
    let cipher = cipher();
    let mut rng = ChaCha20Rng::seed_from_u64(0x7a3f);
    for _ in 0..20 {
        let len = rng.gen_range(1..=512);
        let mut garbage = vec![0u8; len];
        rng.fill(garbage.as_mut_slice());

        let raw = cipher.decrypt(&garbage, "any");
        assert!(
            matches!(
                raw,
                Err(CryptoError::Format(_) | CryptoError::Authentication)
            ),
            "raw {len}: {raw:?}"
        );

        let encoded = BASE64.encode(&garbage);
        let wrapped = cipher.decrypt(encoded.as_bytes(), "any");
        assert!(
            matches!(
                wrapped,
                Err(CryptoError::Format(_) | CryptoError::Authentication)
            ),
            "encoded {len}: {wrapped:?}"
        );
    }
}

#[test]
fn swapping_packages_between_passwords_fails() {
    let cipher = cipher();
    let a = cipher.encrypt(b"alpha", "a").unwrap();
    let b = cipher.encrypt(b"bravo", "b").unwrap();
    let (a, b) = (BASE64.decode(a).unwrap(), BASE64.decode(b).unwrap());
    let spliced = [&a[..44], &b[44..]].concat();
    assert!(matches!(
        cipher.decrypt(BASE64.encode(&spliced).as_bytes(), "a"),
        Err(CryptoError::Authentication)
    ));
}
