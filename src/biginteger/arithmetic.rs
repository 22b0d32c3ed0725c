//! Limb-level kernels shared by the `BigInt` operations.
//!
//! All routines work on little-endian `u32` limb slices. Inputs are assumed
//! normalized (no most-significant zero limbs, zero is the empty slice) and
//! every routine returns a normalized vector.

use std::cmp::Ordering;

/// Products switch from schoolbook to Karatsuba above this operand size.
pub(crate) const KARATSUBA_THRESHOLD: usize = 24;

pub(crate) fn trim(limbs: &mut Vec<u32>) {
    while limbs.last() == Some(&0) {
        limbs.pop();
    }
}

pub(crate) fn cmp_limbs(a: &[u32], b: &[u32]) -> Ordering {
    if a.len() != b.len() {
        return a.len().cmp(&b.len());
    }
    for (x, y) in a.iter().rev().zip(b.iter().rev()) {
        if x != y {
            return x.cmp(y);
        }
    }
    Ordering::Equal
}

pub(crate) fn add_limbs(a: &[u32], b: &[u32]) -> Vec<u32> {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut out = Vec::with_capacity(long.len() + 1);
    let mut carry = 0u64;
    for i in 0..long.len() {
        let s = long[i] as u64 + short.get(i).copied().unwrap_or(0) as u64 + carry;
        out.push(s as u32);
        carry = s >> 32;
    }
    if carry != 0 {
        out.push(carry as u32);
    }
    out
}

/// `a - b`; the caller guarantees `a >= b`.
pub(crate) fn sub_limbs(a: &[u32], b: &[u32]) -> Vec<u32> {
    debug_assert!(cmp_limbs(a, b) != Ordering::Less);
    let mut out = Vec::with_capacity(a.len());
    let mut borrow = 0i64;
    for i in 0..a.len() {
        let d = a[i] as i64 - b.get(i).copied().unwrap_or(0) as i64 - borrow;
        if d < 0 {
            out.push((d + (1i64 << 32)) as u32);
            borrow = 1;
        } else {
            out.push(d as u32);
            borrow = 0;
        }
    }
    debug_assert_eq!(borrow, 0);
    trim(&mut out);
    out
}

/// Adds `addend << (32 * offset)` into `acc` in place, growing it as needed.
pub(crate) fn add_shifted_into(acc: &mut Vec<u32>, addend: &[u32], offset: usize) {
    if addend.is_empty() {
        return;
    }
    if acc.len() < offset + addend.len() + 1 {
        acc.resize(offset + addend.len() + 1, 0);
    }
    let mut carry = 0u64;
    for (i, &limb) in addend.iter().enumerate() {
        let s = acc[offset + i] as u64 + limb as u64 + carry;
        acc[offset + i] = s as u32;
        carry = s >> 32;
    }
    let mut i = offset + addend.len();
    while carry != 0 {
        if i == acc.len() {
            acc.push(carry as u32);
            break;
        }
        let s = acc[i] as u64 + carry;
        acc[i] = s as u32;
        carry = s >> 32;
        i += 1;
    }
}

pub(crate) fn mul_limbs(a: &[u32], b: &[u32]) -> Vec<u32> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    if a.len().min(b.len()) <= KARATSUBA_THRESHOLD {
        schoolbook_mul(a, b)
    } else {
        karatsuba(a, b)
    }
}

fn schoolbook_mul(a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut out = vec![0u32; a.len() + b.len()];
    for (i, &ai) in a.iter().enumerate() {
        let mut carry = 0u64;
        for (j, &bj) in b.iter().enumerate() {
            let t = out[i + j] as u64 + ai as u64 * bj as u64 + carry;
            out[i + j] = t as u32;
            carry = t >> 32;
        }
        out[i + b.len()] = carry as u32;
    }
    trim(&mut out);
    out
}

fn karatsuba(a: &[u32], b: &[u32]) -> Vec<u32> {
    let m = (a.len().max(b.len()) + 1) / 2;
    let (a0, a1) = a.split_at(m.min(a.len()));
    let (b0, b1) = b.split_at(m.min(b.len()));
    let mut a0 = a0.to_vec();
    let mut b0 = b0.to_vec();
    trim(&mut a0);
    trim(&mut b0);

    let z0 = mul_limbs(&a0, &b0);
    let z2 = mul_limbs(a1, b1);
    let sa = add_limbs(&a0, a1);
    let sb = add_limbs(&b0, b1);
    let z1 = sub_limbs(&sub_limbs(&mul_limbs(&sa, &sb), &z0), &z2);

    let mut out = z0;
    add_shifted_into(&mut out, &z1, m);
    add_shifted_into(&mut out, &z2, 2 * m);
    trim(&mut out);
    out
}

pub(crate) fn square_limbs(a: &[u32]) -> Vec<u32> {
    if a.is_empty() {
        return Vec::new();
    }
    if a.len() <= KARATSUBA_THRESHOLD {
        schoolbook_square(a)
    } else {
        karatsuba(a, a)
    }
}

/// Schoolbook squaring: accumulate the cross products once, double, then
/// add the diagonal terms.
fn schoolbook_square(a: &[u32]) -> Vec<u32> {
    let n = a.len();
    let mut out = vec![0u32; 2 * n];
    for i in 0..n {
        let mut carry = 0u64;
        for j in (i + 1)..n {
            let t = out[i + j] as u64 + a[i] as u64 * a[j] as u64 + carry;
            out[i + j] = t as u32;
            carry = t >> 32;
        }
        out[i + n] = carry as u32;
    }
    let mut carry = 0u64;
    for limb in out.iter_mut() {
        let t = ((*limb as u64) << 1) | carry;
        *limb = t as u32;
        carry = t >> 32;
    }
    let mut carry = 0u64;
    for i in 0..n {
        let d = a[i] as u64 * a[i] as u64;
        let t = out[2 * i] as u64 + (d & 0xffff_ffff) + carry;
        out[2 * i] = t as u32;
        let t = out[2 * i + 1] as u64 + (d >> 32) + (t >> 32);
        out[2 * i + 1] = t as u32;
        carry = t >> 32;
    }
    debug_assert_eq!(carry, 0);
    trim(&mut out);
    out
}

pub(crate) fn shl_limbs(a: &[u32], bits: usize) -> Vec<u32> {
    if a.is_empty() {
        return Vec::new();
    }
    let limb_shift = bits / 32;
    let bit_shift = (bits % 32) as u32;
    let mut out = vec![0u32; limb_shift];
    if bit_shift == 0 {
        out.extend_from_slice(a);
        return out;
    }
    let mut carry = 0u32;
    for &limb in a {
        out.push((limb << bit_shift) | carry);
        carry = limb >> (32 - bit_shift);
    }
    if carry != 0 {
        out.push(carry);
    }
    out
}

pub(crate) fn shr_limbs(a: &[u32], bits: usize) -> Vec<u32> {
    let limb_shift = bits / 32;
    if limb_shift >= a.len() {
        return Vec::new();
    }
    let bit_shift = (bits % 32) as u32;
    let src = &a[limb_shift..];
    if bit_shift == 0 {
        return src.to_vec();
    }
    let mut out = Vec::with_capacity(src.len());
    for i in 0..src.len() {
        let hi = src.get(i + 1).copied().unwrap_or(0);
        out.push((src[i] >> bit_shift) | (hi << (32 - bit_shift)));
    }
    trim(&mut out);
    out
}
