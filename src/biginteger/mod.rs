//! Arbitrary-precision unsigned (and signed-magnitude) integers.
//!
//! `BigInt` stores little-endian 32-bit limbs with no most-significant zero
//! limb; zero is the empty limb vector. Every operation returns a
//! normalized value. The modular machinery (windowed exponentiation,
//! simultaneous exponentiation, inversion, square roots, Jacobi symbol)
//! lives on [`Modulus`], which caches per-modulus precomputation.

pub(crate) mod arithmetic;
mod division;
mod modular;
mod signed;


pub use division::Modulus;
pub use modular::{jacobi, FixedBaseTable};
pub use signed::SignedBigInt;

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Sub};
use std::str::FromStr;

use crate::errors::ArithmeticError;

use arithmetic::{add_limbs, cmp_limbs, mul_limbs, shl_limbs, shr_limbs, square_limbs, sub_limbs, trim};

const POW10: [u32; 10] = [
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
];

#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct BigInt {
    limbs: Vec<u32>,
}

impl BigInt {
    pub fn zero() -> Self {
        BigInt { limbs: Vec::new() }
    }

    pub fn one() -> Self {
        BigInt { limbs: vec![1] }
    }

    pub(crate) fn from_limbs(limbs: Vec<u32>) -> Self {
        debug_assert!(limbs.last() != Some(&0));
        BigInt { limbs }
    }

    pub(crate) fn limbs(&self) -> &[u32] {
        &self.limbs
    }

    pub fn is_zero(&self) -> bool {
        self.limbs.is_empty()
    }

    pub fn is_one(&self) -> bool {
        self.limbs == [1]
    }

    pub fn is_even(&self) -> bool {
        self.limbs.first().map_or(true, |l| l % 2 == 0)
    }

    pub fn is_odd(&self) -> bool {
        !self.is_even()
    }

    /// Value of the `i`-th bit, counting from the least significant.
    pub fn bit(&self, i: usize) -> bool {
        match self.limbs.get(i / 32) {
            Some(limb) => (limb >> (i % 32)) & 1 == 1,
            None => false,
        }
    }

    /// Number of significant bits; zero has bit length 0.
    pub fn bit_len(&self) -> usize {
        match self.limbs.last() {
            Some(top) => 32 * self.limbs.len() - top.leading_zeros() as usize,
            None => 0,
        }
    }

    /// Number of bytes in the minimal big-endian encoding; at least 1.
    pub fn byte_len(&self) -> usize {
        self.bit_len().div_ceil(8).max(1)
    }

    pub fn shl(&self, bits: usize) -> BigInt {
        BigInt::from_limbs(shl_limbs(&self.limbs, bits))
    }

    pub fn shr(&self, bits: usize) -> BigInt {
        BigInt::from_limbs(shr_limbs(&self.limbs, bits))
    }

    pub fn square(&self) -> BigInt {
        BigInt::from_limbs(square_limbs(&self.limbs))
    }

    /// `self - rhs`, or `None` when the difference would be negative.
    pub fn checked_sub(&self, rhs: &BigInt) -> Option<BigInt> {
        if self.cmp(rhs) == Ordering::Less {
            None
        } else {
            Some(BigInt::from_limbs(sub_limbs(&self.limbs, &rhs.limbs)))
        }
    }

    /// Quotient and remainder. Panics if `divisor` is zero.
    pub fn div_qr(&self, divisor: &BigInt) -> (BigInt, BigInt) {
        let (q, r) = division::div_rem(&self.limbs, &divisor.limbs);
        (BigInt::from_limbs(q), BigInt::from_limbs(r))
    }

    /// `self^exponent mod modulus` without a cached context; callers with a
    /// long-lived modulus should go through [`Modulus::pow`].
    pub fn mod_pow(&self, exponent: &BigInt, modulus: &BigInt) -> BigInt {
        Modulus::new(modulus.clone()).pow(self, exponent)
    }

    pub fn from_bytes_be(bytes: &[u8]) -> BigInt {
        let mut limbs = Vec::with_capacity(bytes.len() / 4 + 1);
        for chunk in bytes.rchunks(4) {
            let mut v = 0u32;
            for &byte in chunk {
                v = (v << 8) | byte as u32;
            }
            limbs.push(v);
        }
        trim(&mut limbs);
        BigInt { limbs }
    }

    /// Minimal big-endian encoding; zero encodes as a single zero byte.
    pub fn to_bytes_be(&self) -> Vec<u8> {
        if self.is_zero() {
            return vec![0];
        }
        let mut out = Vec::with_capacity(self.limbs.len() * 4);
        for limb in self.limbs.iter().rev() {
            out.extend_from_slice(&limb.to_be_bytes());
        }
        let skip = out.iter().take_while(|&&b| b == 0).count();
        out.drain(..skip);
        out
    }

    /// Big-endian encoding left-padded with zeros to exactly `width` bytes.
    /// Panics if the value does not fit.
    pub fn to_bytes_be_padded(&self, width: usize) -> Vec<u8> {
        let bytes = self.to_bytes_be();
        assert!(bytes.len() <= width, "value does not fit in {width} bytes");
        let mut out = vec![0u8; width - bytes.len()];
        out.extend_from_slice(&bytes);
        out
    }
}

impl Ord for BigInt {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_limbs(&self.limbs, &other.limbs)
    }
}

impl PartialOrd for BigInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<u32> for BigInt {
    fn from(v: u32) -> Self {
        let mut limbs = vec![v];
        trim(&mut limbs);
        BigInt { limbs }
    }
}

impl From<u64> for BigInt {
    fn from(v: u64) -> Self {
        let mut limbs = vec![v as u32, (v >> 32) as u32];
        trim(&mut limbs);
        BigInt { limbs }
    }
}

fn add(a: &BigInt, b: &BigInt) -> BigInt {
    BigInt::from_limbs(add_limbs(&a.limbs, &b.limbs))
}

fn sub(a: &BigInt, b: &BigInt) -> BigInt {
    assert!(
        a.cmp(b) != Ordering::Less,
        "subtraction underflow on unsigned BigInt"
    );
    BigInt::from_limbs(sub_limbs(&a.limbs, &b.limbs))
}

fn mul(a: &BigInt, b: &BigInt) -> BigInt {
    BigInt::from_limbs(mul_limbs(&a.limbs, &b.limbs))
}

macro_rules! impl_binop {
    ($trait:ident, $method:ident, $func:path) => {
        impl $trait<&BigInt> for &BigInt {
            type Output = BigInt;

            fn $method(self, rhs: &BigInt) -> BigInt {
                $func(self, rhs)
            }
        }

        impl $trait<BigInt> for &BigInt {
            type Output = BigInt;

            fn $method(self, rhs: BigInt) -> BigInt {
                $func(self, &rhs)
            }
        }

        impl $trait<&BigInt> for BigInt {
            type Output = BigInt;

            fn $method(self, rhs: &BigInt) -> BigInt {
                $func(&self, rhs)
            }
        }

        impl $trait<BigInt> for BigInt {
            type Output = BigInt;

            fn $method(self, rhs: BigInt) -> BigInt {
                $func(&self, &rhs)
            }
        }
    };
}

impl_binop!(Add, add, add);
impl_binop!(Sub, sub, sub);
impl_binop!(Mul, mul, mul);

impl FromStr for BigInt {
    type Err = ArithmeticError;

    /// Parses a non-empty decimal digit string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ArithmeticError::MalformedDecimal);
        }
        let mut limbs: Vec<u32> = Vec::with_capacity(s.len() / 9 + 1);
        let first = match s.len() % 9 {
            0 => 9,
            r => r,
        };
        let mut rest = s;
        let mut chunk_len = first;
        while !rest.is_empty() {
            let (chunk, tail) = rest.split_at(chunk_len);
            let value: u32 = chunk.parse().expect("digits already validated");
            mul_small_add(&mut limbs, POW10[chunk_len], value);
            rest = tail;
            chunk_len = 9;
        }
        trim(&mut limbs);
        Ok(BigInt { limbs })
    }
}

fn mul_small_add(limbs: &mut Vec<u32>, multiplier: u32, addend: u32) {
    let mut carry = addend as u64;
    for limb in limbs.iter_mut() {
        let t = *limb as u64 * multiplier as u64 + carry;
        *limb = t as u32;
        carry = t >> 32;
    }
    if carry != 0 {
        limbs.push(carry as u32);
    }
}

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        let mut chunks = Vec::new();
        let mut limbs = self.limbs.clone();
        while !limbs.is_empty() {
            let (q, r) = division::div_rem_small(&limbs, 1_000_000_000);
            chunks.push(r);
            limbs = q;
        }
        write!(f, "{}", chunks.last().unwrap())?;
        for chunk in chunks.iter().rev().skip(1) {
            write!(f, "{chunk:09}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
