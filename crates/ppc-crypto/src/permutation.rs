//! # Password-Derived Permutation
//!
//! Derives the cipher's 256-entry S-box and its inverse from a password.
//!
//! ## Algorithm
//!
//! 1. `seed = SHA-256(password)` (32 bytes, the big-endian hash integer).
//! 2. Seed a [`ShuffleGenerator`] with it.
//! 3. Fisher-Yates over the identity table: for `i` in `255..=1`,
//!    `j = draw_below(i + 1)`, swap `i` and `j`.
//! 4. `inverse[sbox[i]] = i`.
//!
//! The result depends on the password alone, never on salts, so the same
//! password yields the same table on every call. The shipped generator is
//! ChaCha20, whose output stream is fixed across platforms and releases.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Deterministic generator driving the S-box shuffle.
pub trait ShuffleGenerator: Sized {
    /// Build a generator from a 32-byte seed.
    fn from_seed(seed: [u8; 32]) -> Self;

    /// Draw a uniform integer in `0..bound`. `bound` is at least 2.
    fn draw_below(&mut self, bound: usize) -> usize;
}

/// ChaCha20-backed shuffle generator.
#[derive(Debug, Clone)]
pub struct ChaChaShuffle(ChaCha20Rng);

impl ShuffleGenerator for ChaChaShuffle {
    fn from_seed(seed: [u8; 32]) -> Self {
        Self(ChaCha20Rng::from_seed(seed))
    }

    fn draw_below(&mut self, bound: usize) -> usize {
        self.0.gen_range(0..bound)
    }
}

/// A bijective byte substitution and its inverse.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Permutation {
    sbox: [u8; 256],
    inverse: [u8; 256],
}

impl Permutation {
    /// Derive the permutation for `password` with the default generator.
    pub fn from_password(password: &str) -> Self {
        Self::derive::<ChaChaShuffle>(password)
    }

    /// Derive the permutation for `password` with generator `G`.
    pub fn derive<G: ShuffleGenerator>(password: &str) -> Self {
        let seed: [u8; 32] = Sha256::digest(password.as_bytes()).into();
        let mut rng = G::from_seed(seed);

        let mut sbox = [0u8; 256];
        for (i, slot) in sbox.iter_mut().enumerate() {
            *slot = i as u8;
        }
        for i in (1..sbox.len()).rev() {
            let j = rng.draw_below(i + 1);
            sbox.swap(i, j);
        }
        Self::with_inverse(sbox)
    }

    /// The identity permutation.
    #[cfg(test)]
    pub(crate) fn identity() -> Self {
        let mut sbox = [0u8; 256];
        for (i, slot) in sbox.iter_mut().enumerate() {
            *slot = i as u8;
        }
        Self::with_inverse(sbox)
    }

    fn with_inverse(sbox: [u8; 256]) -> Self {
        let mut inverse = [0u8; 256];
        for (i, &value) in sbox.iter().enumerate() {
            inverse[usize::from(value)] = i as u8;
        }
        Self { sbox, inverse }
    }

    /// Forward substitution.
    #[inline]
    pub fn substitute(&self, byte: u8) -> u8 {
        self.sbox[usize::from(byte)]
    }

    /// Inverse substitution.
    #[inline]
    pub fn invert(&self, byte: u8) -> u8 {
        self.inverse[usize::from(byte)]
    }

    /// The forward table.
    pub fn sbox(&self) -> &[u8; 256] {
        &self.sbox
    }

    /// The inverse table.
    pub fn inverse(&self) -> &[u8; 256] {
        &self.inverse
    }
}

impl std::fmt::Debug for Permutation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Permutation(<derived>)")
    }
}

/// Derive the S-box pair for `password`.
pub fn dynamic_sbox(password: &str) -> Permutation {
    Permutation::from_password(password)
}
