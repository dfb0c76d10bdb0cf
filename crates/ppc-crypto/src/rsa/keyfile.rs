//! # Key Files
//!
//! On-disk storage of RSA key pairs.
//!
//! - Public key file: `base64(key text)`.
//! - Private key file without a passphrase: `base64(key text)`. This is
//!   cleartext and every such write is logged at `warn`.
//! - Private key file with a passphrase: the key text encrypted with the
//!   [`SymmetricCipher`], which is itself base64.
//!
//! An empty passphrase counts as no passphrase. Failures to decode,
//! decrypt, or parse a key are reported as [`CryptoError::KeyLoad`];
//! failures to read the file stay [`CryptoError::Io`].

use std::fs;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use zeroize::Zeroizing;

use ppc_core::CryptoError;

use super::keys::{RsaKeyPair, RsaPrivateKey, RsaPublicKey};
use crate::symmetric::{trim_ascii_whitespace, SymmetricCipher};

fn effective(passphrase: Option<&str>) -> Option<&str> {
    passphrase.filter(|p| !p.is_empty())
}

fn decode_base64(contents: &[u8]) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    BASE64
        .decode(trim_ascii_whitespace(contents))
        .map(Zeroizing::new)
        .map_err(|e| CryptoError::Format(format!("key file is not base64: {e}")))
}

fn utf8(bytes: &[u8]) -> Result<&str, CryptoError> {
    std::str::from_utf8(bytes).map_err(|_| CryptoError::Format("key text is not UTF-8".into()))
}

/// Key file reader/writer. The cipher protects passphrase-encrypted
/// private keys.
#[derive(Debug, Clone, Default)]
pub struct KeyFiles {
    cipher: SymmetricCipher,
}

impl KeyFiles {
    /// Key files protected by `cipher`.
    pub fn new(cipher: SymmetricCipher) -> Self {
        Self { cipher }
    }

    /// Write both halves of `pair`.
    pub fn save_keypair(
        &self,
        pair: &RsaKeyPair,
        private_path: &Path,
        public_path: &Path,
        passphrase: Option<&str>,
    ) -> Result<(), CryptoError> {
        let private_text = pair.private.to_key_text();
        let private_blob = Zeroizing::new(match effective(passphrase) {
            Some(passphrase) => self.cipher.encrypt(private_text.as_bytes(), passphrase)?,
            None => {
                tracing::warn!(
                    path = %private_path.display(),
                    "writing private key without passphrase protection"
                );
                BASE64.encode(private_text.as_bytes()).into_bytes()
            }
        });
        fs::write(private_path, private_blob.as_slice())?;
        fs::write(public_path, BASE64.encode(pair.public.to_key_text()))?;

        tracing::info!(
            private = %private_path.display(),
            public = %public_path.display(),
            fingerprint = %pair.public.fingerprint(),
            "saved RSA key pair"
        );
        Ok(())
    }

    /// Read a public key file.
    pub fn load_public_key(&self, path: &Path) -> Result<RsaPublicKey, CryptoError> {
        let contents = fs::read(path)?;
        decode_public(&contents).map_err(CryptoError::key_load)
    }

    /// Read a private key file, decrypting it when `passphrase` is set.
    pub fn load_private_key(
        &self,
        path: &Path,
        passphrase: Option<&str>,
    ) -> Result<RsaPrivateKey, CryptoError> {
        let contents = Zeroizing::new(fs::read(path)?);
        self.decode_private(&contents, passphrase)
            .map_err(CryptoError::key_load)
    }

    fn decode_private(
        &self,
        contents: &[u8],
        passphrase: Option<&str>,
    ) -> Result<RsaPrivateKey, CryptoError> {
        let text = match effective(passphrase) {
            Some(passphrase) => Zeroizing::new(self.cipher.decrypt(contents, passphrase)?),
            None => decode_base64(contents)?,
        };
        RsaPrivateKey::from_key_text(utf8(&text)?)
    }
}

fn decode_public(contents: &[u8]) -> Result<RsaPublicKey, CryptoError> {
    let text = decode_base64(contents)?;
    RsaPublicKey::from_key_text(utf8(&text)?)
}

/// [`KeyFiles::save_keypair`] with default parameters.
pub fn save_keypair(
    pair: &RsaKeyPair,
    private_path: &Path,
    public_path: &Path,
    passphrase: Option<&str>,
) -> Result<(), CryptoError> {
    KeyFiles::default().save_keypair(pair, private_path, public_path, passphrase)
}

/// [`KeyFiles::load_public_key`] with default parameters.
pub fn load_public_key(path: &Path) -> Result<RsaPublicKey, CryptoError> {
    KeyFiles::default().load_public_key(path)
}

/// [`KeyFiles::load_private_key`] with default parameters.
pub fn load_private_key(
    path: &Path,
    passphrase: Option<&str>,
) -> Result<RsaPrivateKey, CryptoError> {
    KeyFiles::default().load_private_key(path, passphrase)
}
