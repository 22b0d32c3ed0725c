//! The prime-order field Fq and its k-wide product ring.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;
use std::sync::Arc;

use crate::biginteger::{BigInt, Modulus};
use crate::bytetree::ByteTree;
use crate::errors::AlgebraError;

/// Field of integers modulo a prime `q`. Shared read-only by every element
/// and verifier that works over it.
#[derive(Debug)]
pub struct PrimeField {
    order: BigInt,
    ctx: Modulus,
    byte_len: usize,
}

impl PrimeField {
    /// Panics if `order` is not at least 2; primality is the caller's
    /// contract.
    pub fn new(order: BigInt) -> Arc<Self> {
        assert!(order > BigInt::one(), "field order must be at least 2");
        let byte_len = order.byte_len();
        let ctx = Modulus::new(order.clone());
        Arc::new(PrimeField {
            order,
            ctx,
            byte_len,
        })
    }

    pub fn order(&self) -> &BigInt {
        &self.order
    }

    /// Fixed serialized width of an element in bytes.
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    pub fn zero(self: &Arc<Self>) -> FieldElement {
        FieldElement {
            field: self.clone(),
            value: BigInt::zero(),
        }
    }

    pub fn one(self: &Arc<Self>) -> FieldElement {
        FieldElement {
            field: self.clone(),
            value: self.ctx.reduce(&BigInt::one()),
        }
    }

    /// Element from a canonical (already reduced) value.
    pub fn element(self: &Arc<Self>, value: BigInt) -> Result<FieldElement, AlgebraError> {
        if value >= self.order {
            return Err(AlgebraError::OutOfRange);
        }
        Ok(FieldElement {
            field: self.clone(),
            value,
        })
    }

    /// Element from an arbitrary integer, reduced mod q.
    pub fn element_reduced(self: &Arc<Self>, value: &BigInt) -> FieldElement {
        FieldElement {
            field: self.clone(),
            value: self.ctx.reduce(value),
        }
    }

    /// Big-endian bytes reduced mod q; this is how hash digests become
    /// challenges.
    pub fn element_from_bytes_mod_order(self: &Arc<Self>, bytes: &[u8]) -> FieldElement {
        self.element_reduced(&BigInt::from_bytes_be(bytes))
    }

    /// Wire decimal string to a canonical element.
    pub fn element_from_decimal(self: &Arc<Self>, s: &str) -> Result<FieldElement, AlgebraError> {
        let value = BigInt::from_str(s)?;
        self.element(value)
    }

    /// Leaf of exactly [`Self::byte_len`] bytes holding a canonical value.
    pub fn element_from_byte_tree(
        self: &Arc<Self>,
        tree: &ByteTree,
    ) -> Result<FieldElement, AlgebraError> {
        match tree {
            ByteTree::Leaf(bytes) if bytes.len() == self.byte_len => {
                self.element(BigInt::from_bytes_be(bytes))
            }
            _ => Err(AlgebraError::OutOfRange),
        }
    }
}

impl PartialEq for PrimeField {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
    }
}

impl Eq for PrimeField {}

/// An element of Fq, carrying its field.
#[derive(Clone, PartialEq, Eq)]
pub struct FieldElement {
    field: Arc<PrimeField>,
    value: BigInt,
}

impl FieldElement {
    pub fn field(&self) -> &Arc<PrimeField> {
        &self.field
    }

    pub fn value(&self) -> &BigInt {
        &self.value
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Multiplicative inverse. Panics on zero.
    pub fn inv(&self) -> FieldElement {
        let value = self
            .field
            .ctx
            .inv(&self.value)
            .expect("inverse of a nonzero field element");
        FieldElement {
            field: self.field.clone(),
            value,
        }
    }

    pub fn to_byte_tree(&self) -> ByteTree {
        ByteTree::leaf(self.value.to_bytes_be_padded(self.field.byte_len))
    }

    fn assert_same_field(&self, other: &FieldElement) {
        assert!(
            self.field.order == other.field.order,
            "mixed elements of different fields"
        );
    }
}

impl Add<&FieldElement> for &FieldElement {
    type Output = FieldElement;

    fn add(self, rhs: &FieldElement) -> FieldElement {
        self.assert_same_field(rhs);
        FieldElement {
            field: self.field.clone(),
            value: self.field.ctx.add(&self.value, &rhs.value),
        }
    }
}

impl Sub<&FieldElement> for &FieldElement {
    type Output = FieldElement;

    fn sub(self, rhs: &FieldElement) -> FieldElement {
        self.assert_same_field(rhs);
        FieldElement {
            field: self.field.clone(),
            value: self.field.ctx.sub(&self.value, &rhs.value),
        }
    }
}

impl Mul<&FieldElement> for &FieldElement {
    type Output = FieldElement;

    fn mul(self, rhs: &FieldElement) -> FieldElement {
        self.assert_same_field(rhs);
        FieldElement {
            field: self.field.clone(),
            value: self.field.ctx.mul(&self.value, &rhs.value),
        }
    }
}

impl Neg for &FieldElement {
    type Output = FieldElement;

    fn neg(self) -> FieldElement {
        FieldElement {
            field: self.field.clone(),
            value: self.field.ctx.neg(&self.value),
        }
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({})", self.value)
    }
}

/// Element of the product ring Fq^k: an ordered sequence of equal-field
/// elements with pointwise arithmetic.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ProductRingElement {
    components: Vec<FieldElement>,
}

impl ProductRingElement {
    /// Panics on an empty sequence or mixed fields.
    pub fn new(components: Vec<FieldElement>) -> Self {
        assert!(!components.is_empty(), "empty product ring element");
        for pair in components.windows(2) {
            pair[0].assert_same_field(&pair[1]);
        }
        ProductRingElement { components }
    }

    pub fn width(&self) -> usize {
        self.components.len()
    }

    pub fn components(&self) -> &[FieldElement] {
        &self.components
    }

    pub fn add(&self, other: &Self) -> Self {
        assert_eq!(self.width(), other.width(), "mismatched ring widths");
        ProductRingElement {
            components: self
                .components
                .iter()
                .zip(&other.components)
                .map(|(a, b)| a + b)
                .collect(),
        }
    }

    pub fn mul(&self, other: &Self) -> Self {
        assert_eq!(self.width(), other.width(), "mismatched ring widths");
        ProductRingElement {
            components: self
                .components
                .iter()
                .zip(&other.components)
                .map(|(a, b)| a * b)
                .collect(),
        }
    }

    pub fn to_byte_tree(&self) -> ByteTree {
        ByteTree::node(self.components.iter().map(FieldElement::to_byte_tree).collect())
    }
}
