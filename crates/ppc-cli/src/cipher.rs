//! # Encryption Subcommands
//!
//! `encrypt` / `decrypt` use a password from the environment.
//! `pkencrypt` / `pkdecrypt` use RSA key files (hybrid encryption).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use ppc_crypto::FileCipher;

use crate::{optional_secret, required_secret, DEFAULT_PASSPHRASE_ENV, DEFAULT_PASSWORD_ENV};

/// Arguments for `encrypt` and `decrypt`.
#[derive(Args, Debug)]
pub struct CipherArgs {
    /// Input file.
    pub input: PathBuf,

    /// Output file.
    pub output: PathBuf,

    /// Environment variable holding the password.
    #[arg(long, default_value = DEFAULT_PASSWORD_ENV)]
    pub password_env: String,
}

/// Arguments for `pkencrypt`.
#[derive(Args, Debug)]
pub struct PkEncryptArgs {
    /// Input file.
    pub input: PathBuf,

    /// Output file.
    pub output: PathBuf,

    /// Recipient public key file.
    pub public_key: PathBuf,
}

/// Arguments for `pkdecrypt`.
#[derive(Args, Debug)]
pub struct PkDecryptArgs {
    /// Input file.
    pub input: PathBuf,

    /// Output file.
    pub output: PathBuf,

    /// Private key file.
    pub private_key: PathBuf,

    /// Environment variable holding the private-key passphrase, if any.
    #[arg(long, default_value = DEFAULT_PASSPHRASE_ENV)]
    pub passphrase_env: String,
}

/// Execute `encrypt`.
pub fn run_encrypt(args: &CipherArgs, files: &FileCipher) -> Result<u8> {
    let password = required_secret(&args.password_env)?;
    files
        .encrypt_file(&args.input, &args.output, &password)
        .with_context(|| format!("failed to encrypt {}", args.input.display()))?;
    println!(
        "Encrypted {} -> {}",
        args.input.display(),
        args.output.display()
    );
    Ok(0)
}

/// Execute `decrypt`.
pub fn run_decrypt(args: &CipherArgs, files: &FileCipher) -> Result<u8> {
    let password = required_secret(&args.password_env)?;
    files
        .decrypt_file(&args.input, &args.output, &password)
        .with_context(|| format!("failed to decrypt {}", args.input.display()))?;
    println!(
        "Decrypted {} -> {}",
        args.input.display(),
        args.output.display()
    );
    Ok(0)
}

/// Execute `pkencrypt`.
pub fn run_pkencrypt(args: &PkEncryptArgs, files: &FileCipher) -> Result<u8> {
    files
        .hybrid_encrypt_file(&args.input, &args.output, &args.public_key)
        .with_context(|| {
            format!(
                "failed to encrypt {} for {}",
                args.input.display(),
                args.public_key.display()
            )
        })?;
    println!(
        "Encrypted {} -> {}",
        args.input.display(),
        args.output.display()
    );
    Ok(0)
}

/// Execute `pkdecrypt`.
pub fn run_pkdecrypt(args: &PkDecryptArgs, files: &FileCipher) -> Result<u8> {
    let passphrase = optional_secret(&args.passphrase_env);
    files
        .hybrid_decrypt_file(
            &args.input,
            &args.output,
            &args.private_key,
            passphrase.as_deref().map(String::as_str),
        )
        .with_context(|| format!("failed to decrypt {}", args.input.display()))?;
    println!(
        "Decrypted {} -> {}",
        args.input.display(),
        args.output.display()
    );
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ppc_core::config::CipherParams;
    use ppc_core::CryptoError;
    use ppc_crypto::rsa::keygen::generate_keypair;
    use ppc_crypto::SymmetricCipher;

    fn files() -> FileCipher {
        FileCipher::new(SymmetricCipher::new(CipherParams::with_iterations(1_000)))
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("notes.txt");
        std::fs::write(&plain, b"meeting at noon").unwrap();
        std::env::set_var("PPC_CIPHER_TEST_PW", "secure123");

        let enc = CipherArgs {
            input: plain.clone(),
            output: dir.path().join("notes.enc"),
            password_env: "PPC_CIPHER_TEST_PW".into(),
        };
        assert_eq!(run_encrypt(&enc, &files()).unwrap(), 0);

        let dec = CipherArgs {
            input: enc.output.clone(),
            output: dir.path().join("notes.out"),
            password_env: "PPC_CIPHER_TEST_PW".into(),
        };
        assert_eq!(run_decrypt(&dec, &files()).unwrap(), 0);
        assert_eq!(std::fs::read(&dec.output).unwrap(), b"meeting at noon");
    }

    #[test]
    fn wrong_password_surfaces_authentication_error() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("p");
        std::fs::write(&plain, b"x").unwrap();
        std::env::set_var("PPC_CIPHER_TEST_RIGHT", "right");
        std::env::set_var("PPC_CIPHER_TEST_WRONG", "wrong");

        let enc = CipherArgs {
            input: plain,
            output: dir.path().join("e"),
            password_env: "PPC_CIPHER_TEST_RIGHT".into(),
        };
        run_encrypt(&enc, &files()).unwrap();
        let dec = CipherArgs {
            input: enc.output.clone(),
            output: dir.path().join("d"),
            password_env: "PPC_CIPHER_TEST_WRONG".into(),
        };
        let err = run_decrypt(&dec, &files()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CryptoError>(),
            Some(CryptoError::Authentication)
        ));
    }

    #[test]
    fn missing_password_variable_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = CipherArgs {
            input: dir.path().join("in"),
            output: dir.path().join("out"),
            password_env: "PPC_CIPHER_TEST_UNSET".into(),
        };
        assert!(run_encrypt(&args, &files()).is_err());
    }

    #[test]
    fn hybrid_roundtrip_with_passphrase() {
        let dir = tempfile::tempdir().unwrap();
        let path = |name: &str| dir.path().join(name);
        let files = files();
        let pair = generate_keypair(1024).unwrap();
        files
            .key_files()
            .save_keypair(&pair, &path("id.key"), &path("id.pub"), Some("phrase"))
            .unwrap();
        std::fs::write(path("msg"), b"for your eyes only").unwrap();
        std::env::set_var("PPC_CIPHER_TEST_PHRASE", "phrase");

        let enc = PkEncryptArgs {
            input: path("msg"),
            output: path("msg.hyb"),
            public_key: path("id.pub"),
        };
        assert_eq!(run_pkencrypt(&enc, &files).unwrap(), 0);

        let dec = PkDecryptArgs {
            input: path("msg.hyb"),
            output: path("msg.out"),
            private_key: path("id.key"),
            passphrase_env: "PPC_CIPHER_TEST_PHRASE".into(),
        };
        assert_eq!(run_pkdecrypt(&dec, &files).unwrap(), 0);
        assert_eq!(
            std::fs::read(path("msg.out")).unwrap(),
            b"for your eyes only"
        );
    }
}
