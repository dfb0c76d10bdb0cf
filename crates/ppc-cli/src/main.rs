//! # ppc CLI entry point
//!
//! Parses command-line arguments, loads the optional configuration file,
//! and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ppc_cli::cipher::{
    run_decrypt, run_encrypt, run_pkdecrypt, run_pkencrypt, CipherArgs, PkDecryptArgs,
    PkEncryptArgs,
};
use ppc_cli::config::{file_cipher, load_config};
use ppc_cli::keys::{run_genkeys, GenkeysArgs};
use ppc_cli::signing::{run_sign, run_verify, SignArgs, VerifyArgs};

/// Prime-permutation cipher toolkit.
///
/// Password-based file encryption, RSA key generation, hybrid RSA file
/// encryption, and file signatures.
#[derive(Parser, Debug)]
#[command(name = "ppc", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encrypt a file with a password.
    Encrypt(CipherArgs),

    /// Decrypt a password-encrypted file.
    Decrypt(CipherArgs),

    /// Generate an RSA key pair.
    Genkeys(GenkeysArgs),

    /// Encrypt a file for an RSA public key.
    Pkencrypt(PkEncryptArgs),

    /// Decrypt a file with an RSA private key.
    Pkdecrypt(PkDecryptArgs),

    /// Sign a file with an RSA private key.
    Sign(SignArgs),

    /// Verify a file signature against an RSA public key.
    Verify(VerifyArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(1);
        }
    };
    let files = file_cipher(&config);

    let result = match cli.command {
        Commands::Encrypt(args) => run_encrypt(&args, &files),
        Commands::Decrypt(args) => run_decrypt(&args, &files),
        Commands::Genkeys(args) => run_genkeys(&args, &files, &config),
        Commands::Pkencrypt(args) => run_pkencrypt(&args, &files),
        Commands::Pkdecrypt(args) => run_pkdecrypt(&args, &files),
        Commands::Sign(args) => run_sign(&args, &files),
        Commands::Verify(args) => run_verify(&args, &files),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ppc_cli::{DEFAULT_PASSPHRASE_ENV, DEFAULT_PASSWORD_ENV};

    #[test]
    fn cli_parse_encrypt_defaults() {
        let cli = Cli::try_parse_from(["ppc", "encrypt", "in.txt", "out.enc"]).unwrap();
        assert_eq!(cli.verbose, 0);
        assert!(cli.config.is_none());
        if let Commands::Encrypt(args) = cli.command {
            assert_eq!(args.input, PathBuf::from("in.txt"));
            assert_eq!(args.output, PathBuf::from("out.enc"));
            assert_eq!(args.password_env, DEFAULT_PASSWORD_ENV);
        } else {
            panic!("expected encrypt");
        }
    }

    #[test]
    fn cli_parse_decrypt_custom_password_env() {
        let cli = Cli::try_parse_from([
            "ppc",
            "decrypt",
            "a.enc",
            "a.txt",
            "--password-env",
            "MY_PW",
        ])
        .unwrap();
        if let Commands::Decrypt(args) = cli.command {
            assert_eq!(args.password_env, "MY_PW");
        } else {
            panic!("expected decrypt");
        }
    }

    #[test]
    fn cli_parse_genkeys_bits() {
        let cli =
            Cli::try_parse_from(["ppc", "genkeys", "id.key", "id.pub", "--bits", "3072"]).unwrap();
        if let Commands::Genkeys(args) = cli.command {
            assert_eq!(args.private_key, PathBuf::from("id.key"));
            assert_eq!(args.public_key, PathBuf::from("id.pub"));
            assert_eq!(args.bits, Some(3072));
            assert_eq!(args.passphrase_env, DEFAULT_PASSPHRASE_ENV);
        } else {
            panic!("expected genkeys");
        }
    }

    #[test]
    fn cli_parse_genkeys_without_bits() {
        let cli = Cli::try_parse_from(["ppc", "genkeys", "id.key", "id.pub"]).unwrap();
        if let Commands::Genkeys(args) = cli.command {
            assert!(args.bits.is_none());
        } else {
            panic!("expected genkeys");
        }
    }

    #[test]
    fn cli_parse_pkencrypt_and_pkdecrypt() {
        let cli = Cli::try_parse_from(["ppc", "pkencrypt", "m", "m.hyb", "id.pub"]).unwrap();
        assert!(matches!(cli.command, Commands::Pkencrypt(_)));

        let cli = Cli::try_parse_from([
            "ppc",
            "pkdecrypt",
            "m.hyb",
            "m",
            "id.key",
            "--passphrase-env",
            "KEY_PHRASE",
        ])
        .unwrap();
        if let Commands::Pkdecrypt(args) = cli.command {
            assert_eq!(args.private_key, PathBuf::from("id.key"));
            assert_eq!(args.passphrase_env, "KEY_PHRASE");
        } else {
            panic!("expected pkdecrypt");
        }
    }

    #[test]
    fn cli_parse_sign_and_verify() {
        let cli = Cli::try_parse_from(["ppc", "sign", "doc", "doc.sig", "id.key"]).unwrap();
        assert!(matches!(cli.command, Commands::Sign(_)));

        let cli = Cli::try_parse_from(["ppc", "verify", "doc", "doc.sig", "id.pub"]).unwrap();
        if let Commands::Verify(args) = cli.command {
            assert_eq!(args.signature, PathBuf::from("doc.sig"));
            assert_eq!(args.public_key, PathBuf::from("id.pub"));
        } else {
            panic!("expected verify");
        }
    }

    #[test]
    fn cli_parse_global_flags() {
        let cli = Cli::try_parse_from([
            "ppc",
            "verify",
            "doc",
            "doc.sig",
            "id.pub",
            "-vv",
            "--config",
            "ppc.yaml",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("ppc.yaml")));
    }

    #[test]
    fn cli_rejects_missing_arguments_and_unknown_commands() {
        assert!(Cli::try_parse_from(["ppc", "encrypt", "in"]).is_err());
        assert!(Cli::try_parse_from(["ppc", "shred", "file"]).is_err());
        assert!(Cli::try_parse_from(["ppc"]).is_err());
    }
}
