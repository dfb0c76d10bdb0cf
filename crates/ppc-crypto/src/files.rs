//! # File Operations
//!
//! Whole-file wrappers over the cipher, hybrid, and signature APIs. Each
//! reads its input fully, runs one operation, and writes the result.
//!
//! [`FileCipher`] carries the cipher parameters so a configured front end
//! can drive every operation with the same work factor. The free functions
//! use defaults.

use std::fs;
use std::path::Path;

use zeroize::Zeroizing;

use ppc_core::CryptoError;

use crate::rsa::hybrid::HybridCipher;
use crate::rsa::keyfile::KeyFiles;
use crate::rsa::signature::{sign_message, verify_signature};
use crate::symmetric::SymmetricCipher;

/// File-level front end over a [`SymmetricCipher`].
#[derive(Debug, Clone, Default)]
pub struct FileCipher {
    cipher: SymmetricCipher,
}

impl FileCipher {
    /// File operations over `cipher`.
    pub fn new(cipher: SymmetricCipher) -> Self {
        Self { cipher }
    }

    /// The inner symmetric cipher.
    pub fn cipher(&self) -> &SymmetricCipher {
        &self.cipher
    }

    /// Key file access sharing this cipher's parameters.
    pub fn key_files(&self) -> KeyFiles {
        KeyFiles::new(self.cipher.clone())
    }

    fn hybrid(&self) -> HybridCipher {
        HybridCipher::new(self.cipher.clone())
    }

    /// Password-encrypt `input` into `output`.
    pub fn encrypt_file(
        &self,
        input: &Path,
        output: &Path,
        password: &str,
    ) -> Result<(), CryptoError> {
        let plaintext = Zeroizing::new(fs::read(input)?);
        let encrypted = self.cipher.encrypt(&plaintext, password)?;
        fs::write(output, &encrypted)?;
        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            bytes = plaintext.len(),
            "encrypted file"
        );
        Ok(())
    }

    /// Password-decrypt `input` into `output`.
    pub fn decrypt_file(
        &self,
        input: &Path,
        output: &Path,
        password: &str,
    ) -> Result<(), CryptoError> {
        let encrypted = fs::read(input)?;
        let plaintext = Zeroizing::new(self.cipher.decrypt(&encrypted, password)?);
        fs::write(output, plaintext.as_slice())?;
        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            bytes = plaintext.len(),
            "decrypted file"
        );
        Ok(())
    }

    /// Hybrid-encrypt `input` for the public key at `public_path`.
    pub fn hybrid_encrypt_file(
        &self,
        input: &Path,
        output: &Path,
        public_path: &Path,
    ) -> Result<(), CryptoError> {
        let public = self.key_files().load_public_key(public_path)?;
        let plaintext = Zeroizing::new(fs::read(input)?);
        let package = self.hybrid().seal(&plaintext, &public)?;
        fs::write(output, &package)?;
        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            recipient = %public.fingerprint(),
            "hybrid-encrypted file"
        );
        Ok(())
    }

    /// Hybrid-decrypt `input` with the private key at `private_path`.
    pub fn hybrid_decrypt_file(
        &self,
        input: &Path,
        output: &Path,
        private_path: &Path,
        passphrase: Option<&str>,
    ) -> Result<(), CryptoError> {
        let private = self.key_files().load_private_key(private_path, passphrase)?;
        let package = fs::read(input)?;
        let plaintext = Zeroizing::new(self.hybrid().open(&package, &private)?);
        fs::write(output, plaintext.as_slice())?;
        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            "hybrid-decrypted file"
        );
        Ok(())
    }

    /// Sign `input`, writing the raw signature bytes to `signature_path`.
    pub fn sign_file(
        &self,
        input: &Path,
        signature_path: &Path,
        private_path: &Path,
        passphrase: Option<&str>,
    ) -> Result<(), CryptoError> {
        let private = self.key_files().load_private_key(private_path, passphrase)?;
        let message = fs::read(input)?;
        let signature = sign_message(&message, &private)?;
        fs::write(signature_path, &signature)?;
        tracing::info!(
            input = %input.display(),
            signature = %signature_path.display(),
            "signed file"
        );
        Ok(())
    }

    /// Check the signature at `signature_path` over `input`.
    ///
    /// Unreadable files and unusable keys are errors; a signature that
    /// does not verify is `Ok(false)`.
    pub fn verify_file(
        &self,
        input: &Path,
        signature_path: &Path,
        public_path: &Path,
    ) -> Result<bool, CryptoError> {
        let public = self.key_files().load_public_key(public_path)?;
        let message = fs::read(input)?;
        let signature = fs::read(signature_path)?;
        let valid = verify_signature(&message, &signature, &public);
        tracing::info!(
            input = %input.display(),
            signer = %public.fingerprint(),
            valid,
            "verified file signature"
        );
        Ok(valid)
    }
}

/// [`FileCipher::encrypt_file`] with default parameters.
pub fn encrypt_file(input: &Path, output: &Path, password: &str) -> Result<(), CryptoError> {
    FileCipher::default().encrypt_file(input, output, password)
}

/// [`FileCipher::decrypt_file`] with default parameters.
pub fn decrypt_file(input: &Path, output: &Path, password: &str) -> Result<(), CryptoError> {
    FileCipher::default().decrypt_file(input, output, password)
}

/// [`FileCipher::hybrid_encrypt_file`] with default parameters.
pub fn hybrid_encrypt_file(
    input: &Path,
    output: &Path,
    public_path: &Path,
) -> Result<(), CryptoError> {
    FileCipher::default().hybrid_encrypt_file(input, output, public_path)
}

/// [`FileCipher::hybrid_decrypt_file`] with default parameters.
pub fn hybrid_decrypt_file(
    input: &Path,
    output: &Path,
    private_path: &Path,
    passphrase: Option<&str>,
) -> Result<(), CryptoError> {
    FileCipher::default().hybrid_decrypt_file(input, output, private_path, passphrase)
}

/// [`FileCipher::sign_file`] with default parameters.
pub fn sign_file(
    input: &Path,
    signature_path: &Path,
    private_path: &Path,
    passphrase: Option<&str>,
) -> Result<(), CryptoError> {
    FileCipher::default().sign_file(input, signature_path, private_path, passphrase)
}

/// [`FileCipher::verify_file`] with default parameters.
pub fn verify_file(
    input: &Path,
    signature_path: &Path,
    public_path: &Path,
) -> Result<bool, CryptoError> {
    FileCipher::default().verify_file(input, signature_path, public_path)
}
