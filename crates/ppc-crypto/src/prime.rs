//! # Prime Oracle
//!
//! Trial-division primality and the deterministic prime sequences that
//! seed the keystream and IV whitening.
//!
//! A sequence is a pure function of `(length, seed)`: scan windows of
//! [`PRIME_SCAN_WINDOW`] integers starting at `seed`, collecting primes in
//! increasing order until `length` have been found. Because sequences are
//! recomputed on every encryption and decryption, callers may attach a
//! [`PrimeSequenceCache`] through [`PrimeOracle::with_cache`]. The cache is
//! never required for correctness and there is no process-wide instance.

use std::sync::Arc;

use dashmap::DashMap;

/// Width of each scan window.
pub const PRIME_SCAN_WINDOW: u64 = 1000;

/// Trial-division primality test over 6k±1 candidates.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n == 2 || n == 3 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut i = 5u64;
    while i <= n / i {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}

/// The first `length` primes at or above `seed`, in increasing order.
pub fn generate_prime_sequence(length: usize, seed: u32) -> Vec<u64> {
    let mut sequence = Vec::with_capacity(length);
    let mut current = u64::from(seed);
    while sequence.len() < length {
        for candidate in current..current + PRIME_SCAN_WINDOW {
            if is_prime(candidate) {
                sequence.push(candidate);
                if sequence.len() >= length {
                    break;
                }
            }
        }
        current += PRIME_SCAN_WINDOW;
    }
    sequence
}

/// Bounded read-through cache of prime sequences keyed by `(length, seed)`.
///
/// Safe to share across threads. Once `capacity` entries are held, further
/// sequences are computed and returned but not stored.
#[derive(Debug)]
pub struct PrimeSequenceCache {
    entries: DashMap<(usize, u32), Arc<[u64]>>,
    capacity: usize,
}

impl PrimeSequenceCache {
    /// Create an empty cache holding at most `capacity` sequences.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            capacity,
        }
    }

    /// Number of cached sequences.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no sequences.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the cached sequence or generate (and possibly store) it.
    pub fn get_or_generate(&self, length: usize, seed: u32) -> Arc<[u64]> {
        if let Some(hit) = self.entries.get(&(length, seed)) {
            return Arc::clone(hit.value());
        }
        let sequence: Arc<[u64]> = generate_prime_sequence(length, seed).into();
        if self.entries.len() < self.capacity {
            self.entries.insert((length, seed), Arc::clone(&sequence));
        }
        sequence
    }
}

/// Source of prime sequences for the symmetric cipher.
#[derive(Debug, Clone, Default)]
pub struct PrimeOracle {
    cache: Option<Arc<PrimeSequenceCache>>,
}

impl PrimeOracle {
    /// An oracle that recomputes every sequence.
    pub fn uncached() -> Self {
        Self { cache: None }
    }

    /// An oracle backed by a shared cache.
    pub fn with_cache(cache: Arc<PrimeSequenceCache>) -> Self {
        Self { cache: Some(cache) }
    }

    /// The attached cache, if any.
    pub fn cache(&self) -> Option<&PrimeSequenceCache> {
        self.cache.as_deref()
    }

    /// The first `length` primes at or above `seed`.
    pub fn sequence(&self, length: usize, seed: u32) -> Arc<[u64]> {
        match &self.cache {
            Some(cache) => cache.get_or_generate(length, seed),
            None => generate_prime_sequence(length, seed).into(),
        }
    }
}
