//! # Configuration Loading
//!
//! Reads the optional `--config` YAML file into a [`PpcConfig`] and builds
//! the file front end every handler shares.
//!
//! ```yaml
//! cipher:
//!   pbkdf2_iterations: 100000
//!   prime_cache_capacity: 32
//! rsa:
//!   key_bits: 2048
//! ```

use std::path::Path;

use anyhow::{Context, Result};

use ppc_core::PpcConfig;
use ppc_crypto::{FileCipher, SymmetricCipher};

/// Load and validate the configuration, or defaults when `path` is `None`.
pub fn load_config(path: Option<&Path>) -> Result<PpcConfig> {
    let Some(path) = path else {
        return Ok(PpcConfig::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    let config: PpcConfig = serde_yaml::from_str(&content)
        .with_context(|| format!("invalid YAML in {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid configuration in {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        pbkdf2_iterations = config.cipher.pbkdf2_iterations,
        key_bits = config.rsa.key_bits,
        "loaded configuration"
    );
    Ok(config)
}

/// File front end with a prime cache sized by `config`.
pub fn file_cipher(config: &PpcConfig) -> FileCipher {
    FileCipher::new(SymmetricCipher::with_prime_cache(config.cipher))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_path_gives_defaults() {
        assert_eq!(load_config(None).unwrap(), PpcConfig::default());
    }

    #[test]
    fn partial_yaml_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ppc.yaml");
        std::fs::write(&path, "cipher:\n  pbkdf2_iterations: 2000\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.cipher.pbkdf2_iterations, 2000);
        assert_eq!(config.rsa.key_bits, 2048);
    }

    #[test]
    fn invalid_values_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ppc.yaml");
        std::fs::write(&path, "rsa:\n  key_bits: 1023\n").unwrap();
        let err = load_config(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("invalid configuration"));
    }

    #[test]
    fn unknown_keys_and_bad_yaml_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ppc.yaml");
        std::fs::write(&path, "cipher:\n  rounds: 3\n").unwrap();
        assert!(load_config(Some(&path)).is_err());
        std::fs::write(&path, "cipher: [unclosed").unwrap();
        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn missing_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("absent.yaml"))).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read config file"));
    }

    #[test]
    fn file_cipher_uses_configured_iterations() {
        let mut config = PpcConfig::default();
        config.cipher.pbkdf2_iterations = 7;
        let files = file_cipher(&config);
        assert_eq!(files.cipher().params().pbkdf2_iterations, 7);
        assert!(files.cipher().oracle().cache().is_some());
    }
}
