//! # RSA
//!
//! From-scratch RSA over `num-bigint`: key generation, key files, raw
//! randomized encryption, hybrid encryption, and SHA-256 signatures.

pub mod core;
pub mod hybrid;
pub mod keyfile;
pub mod keygen;
pub mod keys;
pub mod signature;

pub use self::core::{rsa_decrypt, rsa_encrypt};
pub use hybrid::{hybrid_decrypt, hybrid_encrypt, HybridCipher};
pub use keyfile::{load_private_key, load_public_key, save_keypair, KeyFiles};
pub use keygen::{generate_keypair, generate_prime, is_probably_prime};
pub use keys::{RsaKeyPair, RsaPrivateKey, RsaPublicKey};
pub use signature::{emsa_pkcs1_v1_5_encode, sign_message, verify_signature};
