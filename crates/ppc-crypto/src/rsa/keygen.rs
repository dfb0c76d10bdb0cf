//! # RSA Key Generation
//!
//! Miller-Rabin prime search and key pair assembly.
//!
//! - Candidates are random odd integers with the top bit set.
//! - Candidates are screened by trial division against small primes, then
//!   tested with [`MILLER_RABIN_ROUNDS`] random witnesses in `[2, n-2]`.
//! - `e` starts at 65537 and steps by 2 until it is coprime to `φ(n)`.

use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use ppc_core::config::validate_key_bits;
use ppc_core::CryptoError;

use super::keys::{RsaKeyPair, RsaPrivateKey, RsaPublicKey};
use crate::modular::{gcd, mod_inverse};

/// Witness rounds used when searching for key primes.
pub const MILLER_RABIN_ROUNDS: usize = 40;

/// First public exponent tried.
pub const DEFAULT_PUBLIC_EXPONENT: u32 = 65_537;

const SMALL_PRIMES: [u32; 54] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89,
    97, 101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191,
    193, 197, 199, 211, 223, 227, 229, 233, 239, 241, 251,
];

/// Miller-Rabin with `rounds` witnesses drawn from the OS RNG.
pub fn is_probably_prime(n: &BigUint, rounds: usize) -> bool {
    is_probably_prime_with_rng(n, rounds, &mut OsRng)
}

/// Miller-Rabin with witnesses drawn from `rng`.
pub fn is_probably_prime_with_rng<R: RngCore + ?Sized>(
    n: &BigUint,
    rounds: usize,
    rng: &mut R,
) -> bool {
    let two = BigUint::from(2u32);
    if n < &two {
        return false;
    }
    for &small in &SMALL_PRIMES {
        let small = BigUint::from(small);
        if n == &small {
            return true;
        }
        if (n % &small).is_zero() {
            return false;
        }
    }

    let one = BigUint::one();
    let n_minus_one = n - &one;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    'witness: for _ in 0..rounds {
        let a = rng.gen_biguint_range(&two, &n_minus_one);
        let mut x = a.modpow(&d, n);
        if x == one || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// A random probable prime of exactly `bits` bits.
pub fn generate_prime(bits: u64) -> Result<BigUint, CryptoError> {
    generate_prime_with_rng(bits, &mut OsRng)
}

/// [`generate_prime`] drawing from `rng`.
pub fn generate_prime_with_rng<R: RngCore + CryptoRng + ?Sized>(
    bits: u64,
    rng: &mut R,
) -> Result<BigUint, CryptoError> {
    if bits < 2 {
        return Err(CryptoError::Format(format!(
            "cannot generate a {bits}-bit prime"
        )));
    }
    let mut attempts = 0u64;
    loop {
        attempts += 1;
        let mut candidate = rng.gen_biguint(bits);
        candidate.set_bit(bits - 1, true);
        candidate.set_bit(0, true);
        if is_probably_prime_with_rng(&candidate, MILLER_RABIN_ROUNDS, rng) {
            tracing::trace!(bits, attempts, "found probable prime");
            return Ok(candidate);
        }
    }
}

/// Generate an RSA key pair with a `bits`-bit modulus target.
pub fn generate_keypair(bits: u64) -> Result<RsaKeyPair, CryptoError> {
    generate_keypair_with_rng(bits, &mut OsRng)
}

/// [`generate_keypair`] drawing from `rng`.
pub fn generate_keypair_with_rng<R: RngCore + CryptoRng + ?Sized>(
    bits: u64,
    rng: &mut R,
) -> Result<RsaKeyPair, CryptoError> {
    validate_key_bits(bits)?;
    tracing::debug!(bits, "generating RSA key pair");

    let half = bits / 2;
    let p = generate_prime_with_rng(half, rng)?;
    let q = loop {
        let q = generate_prime_with_rng(half, rng)?;
        if q != p {
            break q;
        }
    };

    let n = &p * &q;
    let phi = (&p - 1u32) * (&q - 1u32);
    let mut e = BigUint::from(DEFAULT_PUBLIC_EXPONENT);
    while !gcd(&e, &phi).is_one() {
        e += 2u32;
    }
    let d = mod_inverse(&e, &phi)?;

    let public = RsaPublicKey::new(e, n.clone())?;
    let private = RsaPrivateKey::new(d, n, p, q)?;
    tracing::debug!(
        bits = public.bits(),
        fingerprint = %public.fingerprint(),
        "generated RSA key pair"
    );
    Ok(RsaKeyPair { private, public })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prime::is_prime;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn small_values() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        for n in 0u32..2_000 {
            assert_eq!(
                is_probably_prime_with_rng(&BigUint::from(n), 20, &mut rng),
                is_prime(u64::from(n)),
                "n = {n}"
            );
        }
    }

    #[test]
    fn known_large_prime_and_composites() {
        // 2^127 - 1 is a Mersenne prime.
        let m127 = (BigUint::one() << 127u32) - 1u32;
        assert!(is_probably_prime(&m127, 20));
        // 2^128 + 1 = 59649589127497217 * 5704689200685129054721.
        let f7 = (BigUint::one() << 128u32) + 1u32;
        assert!(!is_probably_prime(&f7, 20));
        // Carmichael number 561 = 3 * 11 * 17.
        assert!(!is_probably_prime(&BigUint::from(561u32), 20));
        // Product of the Mersenne primes 2^31 - 1 and 2^61 - 1.
        let semiprime = BigUint::from((1u64 << 31) - 1) * BigUint::from((1u64 << 61) - 1);
        assert!(!is_probably_prime(&semiprime, 20));
    }

    #[test]
    fn generated_prime_has_requested_size() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let p = generate_prime_with_rng(96, &mut rng).unwrap();
        assert_eq!(p.bits(), 96);
        assert!(p.bit(0));
        assert!(is_probably_prime(&p, 20));
    }

    #[test]
    fn tiny_prime_request_rejected() {
        assert!(matches!(generate_prime(1), Err(CryptoError::Format(_))));
    }

    #[test]
    fn keypair_is_consistent() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let pair = generate_keypair_with_rng(512, &mut rng).unwrap();
        let (private, public) = (&pair.private, &pair.public);
        assert_eq!(private.n(), public.n());
        assert_eq!(&(private.p() * private.q()), public.n());
        assert_ne!(private.p(), private.q());
        assert!(public.bits() == 511 || public.bits() == 512);
        let phi = (private.p() - 1u32) * (private.q() - 1u32);
        assert_eq!((public.e() * private.d()) % &phi, BigUint::one());
        assert!(public.e() >= &BigUint::from(DEFAULT_PUBLIC_EXPONENT));
        assert!(public.e().bit(0));
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let a = generate_keypair_with_rng(256, &mut ChaCha20Rng::seed_from_u64(9)).unwrap();
        let b = generate_keypair_with_rng(256, &mut ChaCha20Rng::seed_from_u64(9)).unwrap();
        assert_eq!(a.public, b.public);
        assert_eq!(a.private, b.private);
    }

    #[test]
    fn invalid_sizes_rejected() {
        for bits in [0u64, 64, 127, 129, 1025] {
            assert!(
                matches!(generate_keypair(bits), Err(CryptoError::InvalidKeySize(b)) if b == bits),
                "bits = {bits}"
            );
        }
    }
}
