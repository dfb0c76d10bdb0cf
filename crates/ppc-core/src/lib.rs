#![deny(missing_docs)]

//! # ppc-core — Foundational Types for the Prime-Permutation Cipher Toolkit
//!
//! This crate is the leaf of the workspace. It holds the pieces every
//! other crate agrees on:
//!
//! - **`CryptoError`**: the single error taxonomy (format, authentication,
//!   padding, RSA size and inverse failures, key loading, I/O).
//! - **`PpcConfig`**: work factors for PBKDF2 and RSA key generation.
//! - **Package layout**: byte offsets of the authenticated ciphertext
//!   package and a length-checked view over it.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `ppc-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod config;
pub mod error;
pub mod layout;

pub use config::{CipherParams, PpcConfig, RsaParams};
pub use error::CryptoError;
pub use layout::PackageView;
