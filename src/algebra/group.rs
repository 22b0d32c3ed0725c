//! The order-q multiplicative subgroup of Z*p.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::biginteger::{jacobi, BigInt, FixedBaseTable, Modulus};
use crate::bytetree::ByteTree;
use crate::errors::AlgebraError;

use super::{FieldElement, GroupElt, PrimeField};

/// How message bytes map into group elements. Only the safe-prime style
/// encoding is supported; it relies on exactly one of {v, p − v} being a
/// quadratic residue, which holds for p ≡ 3 (mod 4).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GroupEncoding {
    SafePrime,
}

impl GroupEncoding {
    /// Wire code 1 is the safe-prime encoding; everything else is rejected.
    pub fn from_wire(code: u32) -> Result<Self, AlgebraError> {
        match code {
            1 => Ok(GroupEncoding::SafePrime),
            other => Err(AlgebraError::UnsupportedEncoding(other)),
        }
    }
}

/// Multiplicative group of quadratic residues modulo p with subgroup order
/// q. Membership of a value is its Legendre symbol being 1, which also
/// guarantees invertibility.
pub struct ModPGroup {
    modulus: BigInt,
    ctx: Modulus,
    field: Arc<PrimeField>,
    generator: BigInt,
    generator_table: Arc<FixedBaseTable>,
    byte_len: usize,
    encode_len: usize,
}

// The generator is the base of nearly every exponentiation a record
// audit performs, so its fixed-base table is built with the group.
const GENERATOR_AMORTIZE: usize = 256;

impl ModPGroup {
    /// Group over trusted (named) parameters: basic shape checks only.
    /// Panics on a blatantly unusable modulus.
    pub fn new(modulus: BigInt, order: BigInt, generator: BigInt) -> Arc<Self> {
        assert!(modulus.is_odd() && modulus > BigInt::from(3u32), "bad group modulus");
        assert!(generator > BigInt::one() && generator < modulus, "bad generator");
        let byte_len = modulus.byte_len();
        assert!(byte_len >= 6, "modulus too small for the byte encoding");
        let ctx = Modulus::new(modulus.clone());
        let generator_table =
            FixedBaseTable::new(&ctx, &generator, order.bit_len(), GENERATOR_AMORTIZE);
        Arc::new(ModPGroup {
            modulus,
            ctx,
            field: PrimeField::new(order),
            generator,
            generator_table: Arc::new(generator_table),
            byte_len,
            encode_len: byte_len - 5,
        })
    }

    /// Group from wire-supplied parameters. On top of the shape checks this
    /// verifies the encoding code, that g is a quadratic residue and that
    /// g^q = 1, so a forged generator cannot smuggle a bigger subgroup in.
    pub fn from_wire(
        modulus: BigInt,
        order: BigInt,
        generator: BigInt,
        encoding: u32,
    ) -> Result<Arc<Self>, AlgebraError> {
        GroupEncoding::from_wire(encoding)?;
        if modulus.is_even() || modulus <= BigInt::from(3u32) || modulus.byte_len() < 6 {
            return Err(AlgebraError::BadModulus);
        }
        if order <= BigInt::one() {
            return Err(AlgebraError::BadModulus);
        }
        if generator <= BigInt::one() || generator >= modulus {
            return Err(AlgebraError::BadGenerator);
        }
        if jacobi(&generator, &modulus) != 1 {
            return Err(AlgebraError::BadGenerator);
        }
        let ctx = Modulus::new(modulus.clone());
        if !ctx.pow(&generator, &order).is_one() {
            return Err(AlgebraError::BadGenerator);
        }
        let byte_len = modulus.byte_len();
        let generator_table =
            FixedBaseTable::new(&ctx, &generator, order.bit_len(), GENERATOR_AMORTIZE);
        Ok(Arc::new(ModPGroup {
            modulus,
            ctx,
            field: PrimeField::new(order),
            generator,
            generator_table: Arc::new(generator_table),
            byte_len,
            encode_len: byte_len - 5,
        }))
    }

    pub fn modulus(&self) -> &BigInt {
        &self.modulus
    }

    pub fn order(&self) -> &BigInt {
        self.field.order()
    }

    /// The exponent field Fq shared by all elements of this group.
    pub fn field(&self) -> &Arc<PrimeField> {
        &self.field
    }

    /// Fixed serialized width of an element in bytes.
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// Longest message the byte encoding accepts.
    pub fn encode_len(&self) -> usize {
        self.encode_len
    }

    pub fn one(self: &Arc<Self>) -> GroupElement {
        GroupElement {
            group: self.clone(),
            value: BigInt::one(),
            fixed: None,
        }
    }

    pub fn generator(self: &Arc<Self>) -> GroupElement {
        GroupElement {
            group: self.clone(),
            value: self.generator.clone(),
            fixed: Some(self.generator_table.clone()),
        }
    }

    /// Element from a raw value: requires 1 ≤ v < p and Legendre symbol 1.
    pub fn element(self: &Arc<Self>, value: BigInt) -> Result<GroupElement, AlgebraError> {
        if value.is_zero() || value >= self.modulus {
            return Err(AlgebraError::OutOfRange);
        }
        if jacobi(&value, &self.modulus) != 1 {
            return Err(AlgebraError::NotQuadraticResidue);
        }
        Ok(GroupElement {
            group: self.clone(),
            value,
            fixed: None,
        })
    }

    /// Wire decimal string to a group element.
    pub fn element_from_decimal(self: &Arc<Self>, s: &str) -> Result<GroupElement, AlgebraError> {
        let value = BigInt::from_str(s)?;
        self.element(value)
    }

    /// Leaf of exactly [`Self::byte_len`] bytes holding a member value.
    pub fn element_from_byte_tree(
        self: &Arc<Self>,
        tree: &ByteTree,
    ) -> Result<GroupElement, AlgebraError> {
        match tree {
            ByteTree::Leaf(bytes) if bytes.len() == self.byte_len => {
                self.element(BigInt::from_bytes_be(bytes))
            }
            _ => Err(AlgebraError::OutOfRange),
        }
    }

    /// Embeds up to [`Self::encode_len`] message bytes into an element: a
    /// 4-byte big-endian length prefix, the payload, zero padding to
    /// `byte_len − 1` bytes, negated mod p when the result is not a
    /// residue. Empty messages get one nonzero pad byte so zero is never
    /// encoded.
    pub fn encode(self: &Arc<Self>, message: &[u8]) -> Result<GroupElement, AlgebraError> {
        if message.len() > self.encode_len {
            return Err(AlgebraError::MessageTooLong(message.len()));
        }
        let mut buf = vec![0u8; self.byte_len - 1];
        buf[..4].copy_from_slice(&(message.len() as u32).to_be_bytes());
        buf[4..4 + message.len()].copy_from_slice(message);
        if message.is_empty() {
            buf[4] = 1;
        }
        let mut value = BigInt::from_bytes_be(&buf);
        if jacobi(&value, &self.modulus) != 1 {
            value = &self.modulus - &value;
        }
        self.element(value)
    }

    /// Inverts [`Self::encode`]: picks the sub-(p−1)/2 representative,
    /// reads the length prefix and returns the payload.
    pub fn decode(&self, element: &GroupElement) -> Result<Vec<u8>, AlgebraError> {
        element.assert_group(self);
        let half = (&self.modulus - &BigInt::one()).shr(1);
        let value = if element.value > half {
            &self.modulus - &element.value
        } else {
            element.value.clone()
        };
        if value.byte_len() > self.byte_len - 1 {
            return Err(AlgebraError::OutOfRange);
        }
        let buf = value.to_bytes_be_padded(self.byte_len - 1);
        let len = u32::from_be_bytes(buf[..4].try_into().unwrap()) as usize;
        if len > self.encode_len {
            return Err(AlgebraError::OutOfRange);
        }
        Ok(buf[4..4 + len].to_vec())
    }
}

impl PartialEq for ModPGroup {
    fn eq(&self, other: &Self) -> bool {
        self.modulus == other.modulus && self.field.order() == other.field.order()
    }
}

impl Eq for ModPGroup {}

impl fmt::Debug for ModPGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModPGroup({} bits)", self.modulus.bit_len())
    }
}

/// An element of a [`ModPGroup`], optionally carrying a fixed-base table
/// for amortized exponentiation.
#[derive(Clone)]
pub struct GroupElement {
    group: Arc<ModPGroup>,
    value: BigInt,
    fixed: Option<Arc<FixedBaseTable>>,
}

impl GroupElement {
    pub fn group(&self) -> &Arc<ModPGroup> {
        &self.group
    }

    pub fn value(&self) -> &BigInt {
        &self.value
    }

    /// A copy of this element carrying a fixed-base table sized for
    /// roughly `amortize` upcoming exponentiations.
    pub fn fix(&self, amortize: usize) -> GroupElement {
        let table = FixedBaseTable::new(
            &self.group.ctx,
            &self.value,
            self.group.order().bit_len(),
            amortize,
        );
        GroupElement {
            group: self.group.clone(),
            value: self.value.clone(),
            fixed: Some(Arc::new(table)),
        }
    }

    /// Exponentiation by a raw integer (not necessarily reduced mod q).
    pub fn exp_int(&self, exponent: &BigInt) -> GroupElement {
        let ctx = &self.group.ctx;
        let value = match &self.fixed {
            Some(table) if exponent.bit_len() <= table.exponent_capacity() => {
                table.pow(ctx, exponent)
            }
            _ => ctx.pow(&self.value, exponent),
        };
        GroupElement {
            group: self.group.clone(),
            value,
            fixed: None,
        }
    }

    fn assert_group(&self, group: &ModPGroup) {
        assert!(
            self.group.as_ref() == group,
            "mixed elements of different groups"
        );
    }
}

impl GroupElt for GroupElement {
    fn mul(&self, other: &Self) -> Self {
        other.assert_group(&self.group);
        GroupElement {
            group: self.group.clone(),
            value: self.group.ctx.mul(&self.value, &other.value),
            fixed: None,
        }
    }

    fn inv(&self) -> Self {
        // Membership implies gcd(v, p) = 1, so inversion cannot fail.
        let value = self
            .group
            .ctx
            .inv(&self.value)
            .expect("group member is invertible");
        GroupElement {
            group: self.group.clone(),
            value,
            fixed: None,
        }
    }

    fn exp(&self, exponent: &FieldElement) -> Self {
        assert!(
            exponent.field().as_ref() == self.group.field.as_ref(),
            "exponent from a foreign field"
        );
        self.exp_int(exponent.value())
    }

    fn to_byte_tree(&self) -> ByteTree {
        ByteTree::leaf(self.value.to_bytes_be_padded(self.group.byte_len))
    }
}

impl PartialEq for GroupElement {
    fn eq(&self, other: &Self) -> bool {
        self.group.as_ref() == other.group.as_ref() && self.value == other.value
    }
}

impl Eq for GroupElement {}

impl fmt::Debug for GroupElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GroupElement({})", self.value)
    }
}
