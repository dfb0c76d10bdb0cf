//! # ppc-cli — Prime-Permutation Cipher Command-Line Interface
//!
//! Provides the `ppc` binary over `ppc-crypto`.
//!
//! ## Subcommands
//!
//! - `ppc encrypt` / `ppc decrypt`: password-based file encryption.
//! - `ppc genkeys`: RSA key pair generation to key files.
//! - `ppc pkencrypt` / `ppc pkdecrypt`: hybrid RSA file encryption.
//! - `ppc sign` / `ppc verify`: file signatures.
//!
//! ## Secrets
//!
//! Passwords and passphrases are never taken on the command line. They
//! are read from environment variables named by `--password-env`
//! (default `PPC_PASSWORD`) and `--passphrase-env` (default
//! `PPC_PASSPHRASE`).
//!
//! ```bash
//! PPC_PASSWORD=secure123 ppc encrypt notes.txt notes.enc
//! ppc genkeys id.key id.pub --bits 2048
//! ppc pkencrypt notes.txt notes.hyb id.pub
//! ppc verify notes.txt notes.sig id.pub
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from handlers; handlers delegate to
//!   `ppc-crypto` and contain no cryptography.
//! - Handlers return the process exit code on success.

pub mod cipher;
pub mod config;
pub mod keys;
pub mod signing;

use anyhow::{Context, Result};
use zeroize::Zeroizing;

/// Default environment variable holding the file password.
pub const DEFAULT_PASSWORD_ENV: &str = "PPC_PASSWORD";

/// Default environment variable holding the private-key passphrase.
pub const DEFAULT_PASSPHRASE_ENV: &str = "PPC_PASSPHRASE";

/// Exit code for a signature that does not verify.
pub const EXIT_INVALID_SIGNATURE: u8 = 2;

/// Read a required secret from the environment variable `var`.
pub fn required_secret(var: &str) -> Result<Zeroizing<String>> {
    std::env::var(var)
        .map(Zeroizing::new)
        .with_context(|| format!("environment variable {var} must hold the password"))
}

/// Read an optional secret; unset and empty both mean "none".
pub fn optional_secret(var: &str) -> Option<Zeroizing<String>> {
    std::env::var(var)
        .ok()
        .filter(|value| !value.is_empty())
        .map(Zeroizing::new)
}
