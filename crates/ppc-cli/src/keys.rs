//! # Key Generation Subcommand
//!
//! `genkeys` writes a fresh RSA key pair. The private key is protected
//! when the passphrase variable is set and non-empty; otherwise it is
//! written in cleartext and a warning is logged.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use ppc_core::PpcConfig;
use ppc_crypto::{generate_keypair, FileCipher};

use crate::{optional_secret, DEFAULT_PASSPHRASE_ENV};

/// Arguments for `genkeys`.
#[derive(Args, Debug)]
pub struct GenkeysArgs {
    /// Private key output file.
    pub private_key: PathBuf,

    /// Public key output file.
    pub public_key: PathBuf,

    /// Modulus size in bits (defaults to the configured size).
    #[arg(long)]
    pub bits: Option<u64>,

    /// Environment variable holding the private-key passphrase, if any.
    #[arg(long, default_value = DEFAULT_PASSPHRASE_ENV)]
    pub passphrase_env: String,
}

/// Execute `genkeys`.
pub fn run_genkeys(args: &GenkeysArgs, files: &FileCipher, config: &PpcConfig) -> Result<u8> {
    let bits = args.bits.unwrap_or(config.rsa.key_bits);
    let pair = generate_keypair(bits)
        .with_context(|| format!("failed to generate {bits}-bit key pair"))?;

    let passphrase = optional_secret(&args.passphrase_env);
    files
        .key_files()
        .save_keypair(
            &pair,
            &args.private_key,
            &args.public_key,
            passphrase.as_deref().map(String::as_str),
        )
        .context("failed to write key files")?;

    println!("Generated {}-bit RSA key pair", pair.public.bits());
    println!("  private:     {}", args.private_key.display());
    println!("  public:      {}", args.public_key.display());
    println!("  fingerprint: {}", pair.public.fingerprint());
    Ok(0)
}
