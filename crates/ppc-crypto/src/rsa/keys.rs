//! # RSA Key Types
//!
//! Public and private RSA keys plus their textual form.
//!
//! ## Key Text
//!
//! Keys are written as a brace-delimited mapping of single-letter names to
//! decimal integers:
//!
//! ```text
//! {'e': 65537, 'n': 2773}
//! {'d': 157, 'n': 2773, 'p': 47, 'q': 59}
//! ```
//!
//! Parsing accepts either quote style and arbitrary whitespace. Missing,
//! duplicate, or unknown entries are format errors.
//!
//! ## Serde
//!
//! - `RsaPublicKey` serializes as `{"e": "<dec>", "n": "<dec>"}`.
//! - `RsaPrivateKey` does not implement `Serialize`, and its `Debug`
//!   output is redacted.

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{de::Error as DeError, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use ppc_core::CryptoError;

/// Bytes of overhead reserved below the modulus size for RSA encryption.
pub const RSA_CHUNK_OVERHEAD: usize = 11;

/// An RSA public key `(e, n)`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RsaPublicKey {
    e: BigUint,
    n: BigUint,
}

/// An RSA private key `(d, n, p, q)`.
///
/// Does not implement `Serialize`; use the key file helpers.
#[derive(Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    d: BigUint,
    n: BigUint,
    p: BigUint,
    q: BigUint,
}

/// A matching private/public key pair.
#[derive(Debug, Clone)]
pub struct RsaKeyPair {
    /// Signing and decryption half.
    pub private: RsaPrivateKey,
    /// Verification and encryption half; shares the private key's modulus.
    pub public: RsaPublicKey,
}

fn check_modulus(n: &BigUint) -> Result<(), CryptoError> {
    if n.bits() < 2 {
        return Err(CryptoError::Format("RSA modulus must exceed 1".into()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// RsaPublicKey
// ---------------------------------------------------------------------------

impl RsaPublicKey {
    /// Build a public key. Fails when `n < 2` or `e` is zero.
    pub fn new(e: BigUint, n: BigUint) -> Result<Self, CryptoError> {
        check_modulus(&n)?;
        if e.is_zero() {
            return Err(CryptoError::Format("RSA public exponent is zero".into()));
        }
        Ok(Self { e, n })
    }

    /// The public exponent.
    pub fn e(&self) -> &BigUint {
        &self.e
    }

    /// The modulus.
    pub fn n(&self) -> &BigUint {
        &self.n
    }

    /// Bit length of the modulus.
    pub fn bits(&self) -> u64 {
        self.n.bits()
    }

    /// `⌈bits / 8⌉`, the byte length of signatures.
    pub fn modulus_len(&self) -> usize {
        modulus_len(&self.n)
    }

    /// Largest message [`rsa_encrypt`](crate::rsa::rsa_encrypt) accepts.
    pub fn max_message_len(&self) -> usize {
        max_message_len(&self.n)
    }

    /// Render as key text.
    pub fn to_key_text(&self) -> String {
        format!("{{'e': {}, 'n': {}}}", self.e, self.n)
    }

    /// Parse key text.
    pub fn from_key_text(text: &str) -> Result<Self, CryptoError> {
        let [e, n] = parse_key_text(text, ["e", "n"])?;
        Self::new(e, n)
    }

    /// Lowercase hex SHA-256 of the key text.
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(self.to_key_text().as_bytes()))
    }
}

impl std::fmt::Debug for RsaPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fingerprint = self.fingerprint();
        write!(
            f,
            "RsaPublicKey({} bits, {}...)",
            self.bits(),
            &fingerprint[..16]
        )
    }
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct PublicKeyRepr {
    e: String,
    n: String,
}

impl Serialize for RsaPublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        PublicKeyRepr {
            e: self.e.to_string(),
            n: self.n.to_string(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RsaPublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = PublicKeyRepr::deserialize(deserializer)?;
        let e = parse_decimal("e", &repr.e).map_err(DeError::custom)?;
        let n = parse_decimal("n", &repr.n).map_err(DeError::custom)?;
        Self::new(e, n).map_err(DeError::custom)
    }
}

// ---------------------------------------------------------------------------
// RsaPrivateKey
// ---------------------------------------------------------------------------

impl RsaPrivateKey {
    /// Build a private key. Fails when `n < 2`.
    pub fn new(d: BigUint, n: BigUint, p: BigUint, q: BigUint) -> Result<Self, CryptoError> {
        check_modulus(&n)?;
        Ok(Self { d, n, p, q })
    }

    /// The private exponent.
    pub fn d(&self) -> &BigUint {
        &self.d
    }

    /// The modulus.
    pub fn n(&self) -> &BigUint {
        &self.n
    }

    /// First prime factor.
    pub fn p(&self) -> &BigUint {
        &self.p
    }

    /// Second prime factor.
    pub fn q(&self) -> &BigUint {
        &self.q
    }

    /// Bit length of the modulus.
    pub fn bits(&self) -> u64 {
        self.n.bits()
    }

    /// `⌈bits / 8⌉`, the byte length of signatures.
    pub fn modulus_len(&self) -> usize {
        modulus_len(&self.n)
    }

    /// Render as key text. The buffer is zeroized on drop.
    pub fn to_key_text(&self) -> Zeroizing<String> {
        Zeroizing::new(format!(
            "{{'d': {}, 'n': {}, 'p': {}, 'q': {}}}",
            self.d, self.n, self.p, self.q
        ))
    }

    /// Parse key text.
    pub fn from_key_text(text: &str) -> Result<Self, CryptoError> {
        let [d, n, p, q] = parse_key_text(text, ["d", "n", "p", "q"])?;
        Self::new(d, n, p, q)
    }
}

impl std::fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RsaPrivateKey({} bits, <redacted>)", self.bits())
    }
}

fn modulus_len(n: &BigUint) -> usize {
    n.bits().div_ceil(8) as usize
}

fn max_message_len(n: &BigUint) -> usize {
    ((n.bits() / 8) as usize).saturating_sub(RSA_CHUNK_OVERHEAD)
}

// ---------------------------------------------------------------------------
// Key text parsing
// ---------------------------------------------------------------------------

fn parse_decimal(name: &str, digits: &str) -> Result<BigUint, CryptoError> {
    let digits = digits.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CryptoError::Format(format!(
            "key entry '{name}' is not a decimal integer"
        )));
    }
    BigUint::parse_bytes(digits.as_bytes(), 10)
        .ok_or_else(|| CryptoError::Format(format!("key entry '{name}' is not a decimal integer")))
}

fn strip_quotes(name: &str) -> Option<&str> {
    let name = name.trim();
    ["'", "\""].iter().find_map(|quote| {
        name.strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
    })
}

/// Parse `{'a': 1, 'b': 2}` into values ordered like `names`.
fn parse_key_text<const N: usize>(
    text: &str,
    names: [&str; N],
) -> Result<[BigUint; N], CryptoError> {
    let body = text
        .trim()
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .ok_or_else(|| CryptoError::Format("key text is not a braced mapping".into()))?;

    let mut values: [Option<BigUint>; N] = std::array::from_fn(|_| None);
    for entry in body.split(',') {
        let (raw_name, raw_value) = entry
            .split_once(':')
            .ok_or_else(|| CryptoError::Format("key entry is missing ':'".into()))?;
        let name = strip_quotes(raw_name)
            .ok_or_else(|| CryptoError::Format("key entry name is not quoted".into()))?;
        let slot = names
            .iter()
            .position(|candidate| *candidate == name)
            .ok_or_else(|| CryptoError::Format(format!("unexpected key entry '{name}'")))?;
        if values[slot].is_some() {
            return Err(CryptoError::Format(format!("duplicate key entry '{name}'")));
        }
        values[slot] = Some(parse_decimal(name, raw_value)?);
    }

    let mut out: [BigUint; N] = std::array::from_fn(|_| BigUint::zero());
    for (i, value) in values.into_iter().enumerate() {
        out[i] = value
            .ok_or_else(|| CryptoError::Format(format!("missing key entry '{}'", names[i])))?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textbook_public() -> RsaPublicKey {
        RsaPublicKey::new(BigUint::from(17u32), BigUint::from(3_233u32)).unwrap()
    }

    fn textbook_private() -> RsaPrivateKey {
        RsaPrivateKey::new(
            BigUint::from(2_753u32),
            BigUint::from(3_233u32),
            BigUint::from(61u32),
            BigUint::from(53u32),
        )
        .unwrap()
    }

    #[test]
    fn public_key_text_format() {
        assert_eq!(textbook_public().to_key_text(), "{'e': 17, 'n': 3233}");
    }

    #[test]
    fn private_key_text_format() {
        assert_eq!(
            textbook_private().to_key_text().as_str(),
            "{'d': 2753, 'n': 3233, 'p': 61, 'q': 53}"
        );
    }

    #[test]
    fn key_text_roundtrip() {
        let public = textbook_public();
        let parsed = RsaPublicKey::from_key_text(&public.to_key_text()).unwrap();
        assert_eq!(parsed, public);
        let private = textbook_private();
        assert_eq!(
            RsaPrivateKey::from_key_text(&private.to_key_text()).unwrap(),
            private
        );
    }

    #[test]
    fn parsing_tolerates_quote_style_order_and_whitespace() {
        let key = RsaPublicKey::from_key_text("  { \"n\" :3233 ,'e':  17 }\n").unwrap();
        assert_eq!(key, textbook_public());
    }

    #[test]
    fn malformed_key_text_rejected() {
        for text in [
            "",
            "'e': 17, 'n': 3233",
            "{'e': 17}",
            "{'e': 17, 'n': 3233, 'x': 1}",
            "{'e': 17, 'e': 17, 'n': 3233}",
            "{'e': -17, 'n': 3233}",
            "{'e': 0x11, 'n': 3233}",
            "{e: 17, n: 3233}",
            "{'e' 17, 'n': 3233}",
        ] {
            let result = RsaPublicKey::from_key_text(text);
            assert!(
                matches!(result, Err(CryptoError::Format(_))),
                "accepted {text:?}"
            );
        }
    }

    #[test]
    fn degenerate_values_rejected() {
        let unit_modulus = RsaPublicKey::new(BigUint::from(17u32), BigUint::from(1u32));
        assert!(unit_modulus.is_err());
        let zero_exponent = RsaPublicKey::new(BigUint::zero(), BigUint::from(3_233u32));
        assert!(zero_exponent.is_err());
        let zero_modulus = RsaPrivateKey::from_key_text("{'d': 1, 'n': 0, 'p': 1, 'q': 1}");
        assert!(zero_modulus.is_err());
    }

    #[test]
    fn sizes() {
        let key = textbook_public();
        assert_eq!(key.bits(), 12);
        assert_eq!(key.modulus_len(), 2);
        assert_eq!(key.max_message_len(), 0);
        let n = (BigUint::from(1u32) << 2047u32) + BigUint::from(1u32);
        let big = RsaPublicKey::new(BigUint::from(65_537u32), n).unwrap();
        assert_eq!(big.bits(), 2048);
        assert_eq!(big.modulus_len(), 256);
        assert_eq!(big.max_message_len(), 245);
    }

    #[test]
    fn fingerprint_is_sha256_of_key_text() {
        let key = textbook_public();
        let expected = hex::encode(Sha256::digest(b"{'e': 17, 'n': 3233}"));
        assert_eq!(key.fingerprint(), expected);
        assert_eq!(key.fingerprint().len(), 64);
    }

    #[test]
    fn public_key_serde_json_roundtrip() {
        let key = textbook_public();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, r#"{"e":"17","n":"3233"}"#);
        let back: RsaPublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn public_key_serde_rejects_bad_digits() {
        for json in [r#"{"e":"x","n":"3233"}"#, r#"{"e":"17","n":"1"}"#] {
            assert!(serde_json::from_str::<RsaPublicKey>(json).is_err(), "{json}");
        }
    }

    #[test]
    fn private_debug_is_redacted() {
        let dbg = format!("{:?}", textbook_private());
        assert!(dbg.contains("<redacted>"));
        assert!(!dbg.contains("2753"));
    }
}
