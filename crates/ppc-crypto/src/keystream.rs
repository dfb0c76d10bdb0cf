//! # Keystream Engine
//!
//! Sequential keystream generator over a 16-byte state.
//!
//! ## Algorithm
//!
//! - **Init**: with `seed` the big-endian u64 of `key_chunk[0..8]`,
//!   `state[i] = (seed >> 8i) & 0xFF` for `i < 8` and `state[i] =
//!   key_chunk[i]` for `i >= 8`; then [`WARMUP_ROUNDS`] rounds of row
//!   mixing.
//! - **Per block** at offset `block_start`: `state[i] = S[state[i] ^
//!   (primes[(block_start + i) % len] & 0xFF)]`, then [`BLOCK_ROUNDS`]
//!   rounds of row mixing, column mixing, and `state[i] ^= i ^ round`. The
//!   state after the rounds is the block's output.
//!
//! The state carries from one block into the next, so blocks must be
//! produced in order.

use zeroize::{Zeroize, Zeroizing};

use crate::mixer::{mix_columns, mix_rows};
use crate::permutation::Permutation;

/// Keystream block size in bytes.
pub const KEYSTREAM_BLOCK: usize = 16;
/// Row-mixing rounds applied once at initialization.
pub const WARMUP_ROUNDS: usize = 4;
/// Row+column rounds applied to every output block.
pub const BLOCK_ROUNDS: usize = 8;

/// Low byte of the prime at `index`, cycling through the sequence.
/// An empty sequence contributes nothing.
#[inline]
pub(crate) fn prime_influence(primes: &[u64], index: usize) -> u8 {
    if primes.is_empty() {
        return 0;
    }
    (primes[index % primes.len()] & 0xFF) as u8
}

/// Stateful keystream generator.
pub struct KeystreamEngine<'a> {
    state: [u8; KEYSTREAM_BLOCK],
    primes: &'a [u64],
    perm: &'a Permutation,
    position: usize,
}

impl<'a> KeystreamEngine<'a> {
    /// Initialize the state from a 16-byte key chunk and run the warm-up.
    pub fn new(key_chunk: &[u8; 16], primes: &'a [u64], perm: &'a Permutation) -> Self {
        let mut seed_bytes = [0u8; 8];
        seed_bytes.copy_from_slice(&key_chunk[..8]);
        let seed = u64::from_be_bytes(seed_bytes);

        let mut state = [0u8; KEYSTREAM_BLOCK];
        for (i, byte) in state.iter_mut().enumerate().take(8) {
            *byte = (seed >> (i * 8)) as u8;
        }
        state[8..].copy_from_slice(&key_chunk[8..]);

        for _ in 0..WARMUP_ROUNDS {
            mix_rows(&mut state, perm);
        }
        Self {
            state,
            primes,
            perm,
            position: 0,
        }
    }

    /// Produce the next 16-byte block and advance the state.
    pub fn next_block(&mut self) -> [u8; KEYSTREAM_BLOCK] {
        let primes = self.primes;
        let perm = self.perm;
        let block_start = self.position;

        for (i, byte) in self.state.iter_mut().enumerate() {
            *byte = perm.substitute(*byte ^ prime_influence(primes, block_start + i));
        }
        for round in 0..BLOCK_ROUNDS {
            mix_rows(&mut self.state, perm);
            mix_columns(&mut self.state, perm);
            for (i, byte) in self.state.iter_mut().enumerate() {
                *byte ^= (i ^ round) as u8;
            }
        }
        self.position += KEYSTREAM_BLOCK;
        self.state
    }

    /// Byte offset of the next block.
    pub fn position(&self) -> usize {
        self.position
    }
}

impl Drop for KeystreamEngine<'_> {
    fn drop(&mut self) {
        self.state.zeroize();
    }
}

/// Derive `length` keystream bytes; the final block is truncated.
pub fn derive_complex_keystream(
    primes: &[u64],
    length: usize,
    key_chunk: &[u8; 16],
    perm: &Permutation,
) -> Zeroizing<Vec<u8>> {
    let mut engine = KeystreamEngine::new(key_chunk, primes, perm);
    let mut keystream = Zeroizing::new(vec![0u8; length]);
    for chunk in keystream.chunks_mut(KEYSTREAM_BLOCK) {
        let mut block = engine.next_block();
        chunk.copy_from_slice(&block[..chunk.len()]);
        block.zeroize();
    }
    keystream
}
