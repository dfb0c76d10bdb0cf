#![deny(missing_docs)]

//! # ppc-crypto — Prime-Permutation Cipher Engine
//!
//! Provides the cryptographic engine of the toolkit:
//!
//! - **Permutation**: password-derived S-box and inverse.
//! - **Prime oracle**: deterministic prime sequences, optionally cached.
//! - **Mixer / keystream**: byte diffusion and the prime-seeded keystream.
//! - **Symmetric cipher**: PBKDF2 + keystream + CBC-style chaining,
//!   authenticated with HMAC-SHA256.
//! - **RSA**: Miller-Rabin key generation, key files, randomized
//!   encryption, hybrid encryption, and PKCS#1 v1.5-style signatures.
//! - **Files**: whole-file wrappers over all of the above.
//!
//! ## Crate Policy
//!
//! - Depends only on `ppc-core` internally.
//! - Secrets (key material, keystreams, serialized private keys) are held
//!   in `Zeroizing` buffers or `ZeroizeOnDrop` types.
//! - MAC, padding, and signature comparisons are constant-time.
//! - No `unsafe` code.
//!
//! The RSA scheme here is deliberately compatible with existing key files
//! and packages. It is not OAEP/PSS and should not be used where a
//! standards-conformant RSA is required.

pub mod files;
pub mod kdf;
pub mod keystream;
pub mod mixer;
pub mod modular;
pub mod permutation;
pub mod prime;
pub mod rsa;
pub mod symmetric;

pub use files::{
    decrypt_file, encrypt_file, hybrid_decrypt_file, hybrid_encrypt_file, sign_file,
    verify_file, FileCipher,
};
pub use kdf::{password_to_key_material, KeyMaterial};
pub use keystream::{derive_complex_keystream, KeystreamEngine};
pub use mixer::{mix_bytes, rotate_bits};
pub use modular::{extended_gcd, mod_inverse};
pub use permutation::{dynamic_sbox, Permutation, ShuffleGenerator};
pub use prime::{generate_prime_sequence, is_prime, PrimeOracle, PrimeSequenceCache};
pub use rsa::{
    generate_keypair, hybrid_decrypt, hybrid_encrypt, load_private_key, load_public_key,
    rsa_decrypt, rsa_encrypt, save_keypair, sign_message, verify_signature, HybridCipher,
    KeyFiles, RsaKeyPair, RsaPrivateKey, RsaPublicKey,
};
pub use symmetric::{decrypt, encrypt, SymmetricCipher};
