//! # Signature Subcommands
//!
//! `sign` writes a raw signature file; `verify` checks one and exits with
//! [`EXIT_INVALID_SIGNATURE`] when it does not match.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use ppc_crypto::FileCipher;

use crate::{optional_secret, DEFAULT_PASSPHRASE_ENV, EXIT_INVALID_SIGNATURE};

/// Arguments for `sign`.
#[derive(Args, Debug)]
pub struct SignArgs {
    /// File to sign.
    pub input: PathBuf,

    /// Signature output file.
    pub signature: PathBuf,

    /// Private key file.
    pub private_key: PathBuf,

    /// Environment variable holding the private-key passphrase, if any.
    #[arg(long, default_value = DEFAULT_PASSPHRASE_ENV)]
    pub passphrase_env: String,
}

/// Arguments for `verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Signed file.
    pub input: PathBuf,

    /// Signature file.
    pub signature: PathBuf,

    /// Signer's public key file.
    pub public_key: PathBuf,
}

/// Execute `sign`.
pub fn run_sign(args: &SignArgs, files: &FileCipher) -> Result<u8> {
    let passphrase = optional_secret(&args.passphrase_env);
    files
        .sign_file(
            &args.input,
            &args.signature,
            &args.private_key,
            passphrase.as_deref().map(String::as_str),
        )
        .with_context(|| format!("failed to sign {}", args.input.display()))?;
    println!(
        "Signed {} -> {}",
        args.input.display(),
        args.signature.display()
    );
    Ok(0)
}

/// Execute `verify`.
pub fn run_verify(args: &VerifyArgs, files: &FileCipher) -> Result<u8> {
    let valid = files
        .verify_file(&args.input, &args.signature, &args.public_key)
        .with_context(|| format!("failed to verify {}", args.input.display()))?;
    if valid {
        println!("Signature OK: {}", args.input.display());
        Ok(0)
    } else {
        println!("Signature INVALID: {}", args.input.display());
        Ok(EXIT_INVALID_SIGNATURE)
    }
}
