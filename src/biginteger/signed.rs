//! Signed-magnitude integers.
//!
//! Production exponentiation works on unsigned magnitudes only; the signed
//! wrapper exists for intermediate results of the extended GCD, where the
//! Bezout coefficients oscillate around zero.

use std::cmp::Ordering;
use std::fmt;

use super::BigInt;

/// `(sign, magnitude)` with sign in {-1, 0, 1}; the sign is 0 iff the
/// magnitude is zero.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedBigInt {
    sign: i8,
    magnitude: BigInt,
}

impl SignedBigInt {
    pub fn zero() -> Self {
        SignedBigInt {
            sign: 0,
            magnitude: BigInt::zero(),
        }
    }

    pub fn one() -> Self {
        SignedBigInt {
            sign: 1,
            magnitude: BigInt::one(),
        }
    }

    fn new(sign: i8, magnitude: BigInt) -> Self {
        if magnitude.is_zero() {
            SignedBigInt::zero()
        } else {
            debug_assert!(sign == 1 || sign == -1);
            SignedBigInt { sign, magnitude }
        }
    }

    pub fn sign(&self) -> i8 {
        self.sign
    }

    pub fn magnitude(&self) -> &BigInt {
        &self.magnitude
    }

    pub fn is_zero(&self) -> bool {
        self.sign == 0
    }

    pub fn is_even(&self) -> bool {
        self.magnitude.is_even()
    }

    pub fn neg(&self) -> Self {
        SignedBigInt::new(-self.sign, self.magnitude.clone())
    }

    /// Exact halving; the value must be even.
    pub fn half(&self) -> Self {
        debug_assert!(self.is_even());
        SignedBigInt::new(self.sign, self.magnitude.shr(1))
    }

    pub fn add(&self, other: &Self) -> Self {
        if self.is_zero() {
            return other.clone();
        }
        if other.is_zero() {
            return self.clone();
        }
        if self.sign == other.sign {
            return SignedBigInt::new(self.sign, &self.magnitude + &other.magnitude);
        }
        match self.magnitude.cmp(&other.magnitude) {
            Ordering::Equal => SignedBigInt::zero(),
            Ordering::Greater => {
                SignedBigInt::new(self.sign, &self.magnitude - &other.magnitude)
            }
            Ordering::Less => {
                SignedBigInt::new(other.sign, &other.magnitude - &self.magnitude)
            }
        }
    }

    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    pub fn mul(&self, other: &Self) -> Self {
        SignedBigInt::new(self.sign * other.sign, &self.magnitude * &other.magnitude)
    }

    /// The canonical residue of this value in `[0, modulus)`.
    pub fn rem_euclid(&self, modulus: &BigInt) -> BigInt {
        let r = self.magnitude.div_qr(modulus).1;
        if self.sign < 0 && !r.is_zero() {
            modulus - &r
        } else {
            r
        }
    }
}

impl From<BigInt> for SignedBigInt {
    fn from(magnitude: BigInt) -> Self {
        SignedBigInt::new(1, magnitude)
    }
}

impl fmt::Debug for SignedBigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sign < 0 {
            write!(f, "-{}", self.magnitude)
        } else {
            write!(f, "{}", self.magnitude)
        }
    }
}
