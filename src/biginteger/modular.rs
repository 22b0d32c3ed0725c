//! Modular exponentiation, inversion, square roots and the Jacobi symbol.

use std::cmp::Ordering;

use crate::errors::ArithmeticError;

use super::{BigInt, Modulus, SignedBigInt};

/// Window width for left-to-right exponentiation, monotone in the modulus
/// bit length.
fn window_width(modulus_bits: usize) -> usize {
    match modulus_bits {
        0..=128 => 2,
        129..=512 => 3,
        513..=1024 => 4,
        1025..=2048 => 5,
        2049..=3072 => 6,
        3073..=4095 => 7,
        _ => 8,
    }
}

impl Modulus {
    /// `base^exponent mod m` by sliding-window exponentiation with
    /// precomputed odd powers of the base.
    pub fn pow(&self, base: &BigInt, exponent: &BigInt) -> BigInt {
        if self.value().is_one() {
            return BigInt::zero();
        }
        let base = self.reduce(base);
        if exponent.is_zero() {
            return BigInt::one();
        }
        if base.is_zero() {
            return BigInt::zero();
        }
        let w = window_width(self.bit_len());
        let squared = self.square(&base);
        let mut odd_powers = Vec::with_capacity(1 << (w - 1));
        odd_powers.push(base);
        for _ in 1..(1usize << (w - 1)) {
            let next = self.mul(odd_powers.last().unwrap(), &squared);
            odd_powers.push(next);
        }
        let mut acc = BigInt::one();
        let mut i = exponent.bit_len() as isize - 1;
        while i >= 0 {
            if !exponent.bit(i as usize) {
                acc = self.square(&acc);
                i -= 1;
                continue;
            }
            // Longest window of at most w bits ending in a set bit.
            let mut j = (i - w as isize + 1).max(0);
            while !exponent.bit(j as usize) {
                j += 1;
            }
            for _ in 0..(i - j + 1) {
                acc = self.square(&acc);
            }
            let mut window = 0usize;
            for k in (j..=i).rev() {
                window = (window << 1) | exponent.bit(k as usize) as usize;
            }
            acc = self.mul(&acc, &odd_powers[window >> 1]);
            i = j - 1;
        }
        acc
    }

    /// Simultaneous exponentiation `Π bases[i]^exponents[i] mod m` with a
    /// 2^k subset-product table.
    pub fn prod_pow(&self, bases: &[BigInt], exponents: &[BigInt]) -> BigInt {
        assert_eq!(bases.len(), exponents.len());
        assert!(
            !bases.is_empty() && bases.len() <= 12,
            "subset-product table grows as 2^k"
        );
        let k = bases.len();
        let mut table = vec![BigInt::one(); 1 << k];
        for (i, base) in bases.iter().enumerate() {
            table[1 << i] = self.reduce(base);
        }
        for mask in 1usize..(1 << k) {
            if mask & (mask - 1) != 0 {
                let low = mask & mask.wrapping_neg();
                table[mask] = self.mul(&table[mask ^ low], &table[low]);
            }
        }
        let top = exponents.iter().map(BigInt::bit_len).max().unwrap();
        let mut acc = BigInt::one();
        for bit in (0..top).rev() {
            acc = self.square(&acc);
            let mut mask = 0usize;
            for (i, e) in exponents.iter().enumerate() {
                if e.bit(bit) {
                    mask |= 1 << i;
                }
            }
            if mask != 0 {
                acc = self.mul(&acc, &table[mask]);
            }
        }
        acc
    }

    /// Multiplicative inverse modulo an odd modulus via the binary extended
    /// GCD (HAC 14.61), with signed Bezout coefficients.
    pub fn inv(&self, x: &BigInt) -> Result<BigInt, ArithmeticError> {
        if self.value().is_even() {
            return Err(ArithmeticError::EvenModulus);
        }
        let x = self.reduce(x);
        if x.is_zero() {
            return Err(ArithmeticError::NotInvertible);
        }
        let y = self.value().clone();
        let sx = SignedBigInt::from(x.clone());
        let sy = SignedBigInt::from(y.clone());
        let mut u = x;
        let mut v = y;
        // Invariants: a·x + b·y = u and c·x + d·y = v.
        let mut a = SignedBigInt::one();
        let mut b = SignedBigInt::zero();
        let mut c = SignedBigInt::zero();
        let mut d = SignedBigInt::one();
        loop {
            while u.is_even() {
                u = u.shr(1);
                if a.is_even() && b.is_even() {
                    a = a.half();
                    b = b.half();
                } else {
                    a = a.add(&sy).half();
                    b = b.sub(&sx).half();
                }
            }
            while v.is_even() {
                v = v.shr(1);
                if c.is_even() && d.is_even() {
                    c = c.half();
                    d = d.half();
                } else {
                    c = c.add(&sy).half();
                    d = d.sub(&sx).half();
                }
            }
            if u.cmp(&v) != Ordering::Less {
                u = &u - &v;
                a = a.sub(&c);
                b = b.sub(&d);
            } else {
                v = &v - &u;
                c = c.sub(&a);
                d = d.sub(&b);
            }
            if u.is_zero() {
                if !v.is_one() {
                    return Err(ArithmeticError::NotInvertible);
                }
                return Ok(c.rem_euclid(self.value()));
            }
        }
    }

    /// Square root modulo an odd prime by Shanks–Tonelli, with the
    /// `p ≡ 3 (mod 4)` fast path. Errors on quadratic non-residues.
    pub fn sqrt(&self, a: &BigInt) -> Result<BigInt, ArithmeticError> {
        let p = self.value();
        let a = self.reduce(a);
        if a.is_zero() {
            return Ok(BigInt::zero());
        }
        if jacobi(&a, p) != 1 {
            return Err(ArithmeticError::NonResidue);
        }
        let one = BigInt::one();
        if p.bit(0) && p.bit(1) {
            let e = (p + &one).shr(2);
            return Ok(self.pow(&a, &e));
        }
        // p - 1 = q0 · 2^s with q0 odd.
        let mut q0 = p - &one;
        let mut s = 0usize;
        while q0.is_even() {
            q0 = q0.shr(1);
            s += 1;
        }
        let mut z = BigInt::from(2u32);
        while jacobi(&z, p) != -1 {
            z = &z + &one;
        }
        let mut m = s;
        let mut c = self.pow(&z, &q0);
        let mut t = self.pow(&a, &q0);
        let mut r = self.pow(&a, &(&q0 + &one).shr(1));
        while !t.is_one() {
            let mut i = 0usize;
            let mut probe = t.clone();
            while !probe.is_one() {
                probe = self.square(&probe);
                i += 1;
            }
            let mut b = c.clone();
            for _ in 0..(m - i - 1) {
                b = self.square(&b);
            }
            m = i;
            c = self.square(&b);
            t = self.mul(&t, &c);
            r = self.mul(&r, &b);
        }
        Ok(r)
    }
}

/// Jacobi symbol `(a | n)` for odd positive `n`; coincides with the
/// Legendre symbol when `n` is an odd prime.
pub fn jacobi(a: &BigInt, n: &BigInt) -> i32 {
    assert!(n.is_odd(), "Jacobi symbol needs an odd denominator");
    let mut a = a.div_qr(n).1;
    let mut n = n.clone();
    let mut t = 1i32;
    while !a.is_zero() {
        while a.is_even() {
            a = a.shr(1);
            let r = n.limbs()[0] & 7;
            if r == 3 || r == 5 {
                t = -t;
            }
        }
        std::mem::swap(&mut a, &mut n);
        if a.limbs()[0] & 3 == 3 && n.limbs()[0] & 3 == 3 {
            t = -t;
        }
        a = a.div_qr(&n).1;
    }
    if n.is_one() {
        t
    } else {
        0
    }
}

/// Fixed-base exponentiation: the exponent is cut into `width` slices and
/// evaluated by simultaneous exponentiation over the sliced bases, so one
/// subset-product table serves many exponentiations with the same base.
#[derive(Clone, Debug)]
pub struct FixedBaseTable {
    slice_bits: usize,
    width: usize,
    table: Vec<BigInt>,
}

impl FixedBaseTable {
    /// Builds a table for `base` and exponents of at most `exponent_bits`
    /// bits. `amortize` is the number of exponentiations the table is
    /// expected to serve; wider tables only pay off over more calls.
    pub fn new(ctx: &Modulus, base: &BigInt, exponent_bits: usize, amortize: usize) -> Self {
        let width = (usize::BITS - amortize.max(1).leading_zeros()) as usize;
        let width = width.clamp(1, 10);
        let exponent_bits = exponent_bits.max(1);
        let slice_bits = exponent_bits.div_ceil(width);
        let width = exponent_bits.div_ceil(slice_bits);

        let mut bases = Vec::with_capacity(width);
        let mut cur = ctx.reduce(base);
        for i in 0..width {
            bases.push(cur.clone());
            if i + 1 < width {
                for _ in 0..slice_bits {
                    cur = ctx.square(&cur);
                }
            }
        }
        let mut table = vec![BigInt::one(); 1 << width];
        for (i, b) in bases.iter().enumerate() {
            table[1 << i] = b.clone();
        }
        for mask in 1usize..(1 << width) {
            if mask & (mask - 1) != 0 {
                let low = mask & mask.wrapping_neg();
                table[mask] = ctx.mul(&table[mask ^ low], &table[low]);
            }
        }
        FixedBaseTable {
            slice_bits,
            width,
            table,
        }
    }

    /// Largest exponent bit length the table covers.
    pub fn exponent_capacity(&self) -> usize {
        self.slice_bits * self.width
    }

    /// `base^exponent mod m`; the exponent must fit the bit budget the
    /// table was built for.
    pub fn pow(&self, ctx: &Modulus, exponent: &BigInt) -> BigInt {
        debug_assert!(exponent.bit_len() <= self.slice_bits * self.width);
        let mut acc = BigInt::one();
        for bit in (0..self.slice_bits).rev() {
            acc = ctx.square(&acc);
            let mut mask = 0usize;
            for i in 0..self.width {
                if exponent.bit(i * self.slice_bits + bit) {
                    mask |= 1 << i;
                }
            }
            if mask != 0 {
                acc = ctx.mul(&acc, &self.table[mask]);
            }
        }
        acc
    }
}
