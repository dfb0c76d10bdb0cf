//! # Modular Arithmetic
//!
//! Extended Euclid and modular inversion over arbitrary-precision integers.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Signed, Zero};

use ppc_core::CryptoError;

/// Extended Euclidean algorithm.
///
/// Returns `(g, x, y)` with `a·x + b·y = g = gcd(a, b)`.
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    let (mut old_t, mut t) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let quotient = &old_r / &r;
        let next_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, next_r);
        let next_s = &old_s - &quotient * &s;
        old_s = std::mem::replace(&mut s, next_s);
        let next_t = &old_t - &quotient * &t;
        old_t = std::mem::replace(&mut t, next_t);
    }

    if old_r.is_negative() {
        (-old_r, -old_s, -old_t)
    } else {
        (old_r, old_s, old_t)
    }
}

/// Greatest common divisor.
pub fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    let (mut a, mut b) = (a.clone(), b.clone());
    while !b.is_zero() {
        let r = &a % &b;
        a = std::mem::replace(&mut b, r);
    }
    a
}

/// The inverse of `e` modulo `phi`, in `[0, phi)`.
///
/// Fails with [`CryptoError::Inverse`] when `gcd(e, phi) != 1`.
pub fn mod_inverse(e: &BigUint, phi: &BigUint) -> Result<BigUint, CryptoError> {
    if phi.is_zero() {
        return Err(CryptoError::Inverse);
    }
    let phi_signed = BigInt::from_biguint(Sign::Plus, phi.clone());
    let (g, x, _) = extended_gcd(&BigInt::from_biguint(Sign::Plus, e.clone()), &phi_signed);
    if !g.is_one() {
        return Err(CryptoError::Inverse);
    }
    let reduced = ((x % &phi_signed) + &phi_signed) % &phi_signed;
    reduced.to_biguint().ok_or(CryptoError::Inverse)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Bézout coefficients satisfy the identity for arbitrary inputs.
        #[test]
        fn bezout(a in any::<u64>(), b in any::<u64>()) {
            let (a, b) = (BigInt::from(a), BigInt::from(b));
            let (g, x, y) = extended_gcd(&a, &b);
            prop_assert_eq!(&a * &x + &b * &y, g.clone());
            let unsigned = gcd(&a.to_biguint().unwrap(), &b.to_biguint().unwrap());
            prop_assert_eq!(g.to_biguint().unwrap(), unsigned);
        }
    }
}
