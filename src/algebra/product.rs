//! Product group G^k.

use std::sync::Arc;

use crate::bytetree::ByteTree;

use super::{FieldElement, GroupElement, GroupElt, ModPGroup, ProductRingElement};

/// Product of k groups over one exponent field. In this verifier every
/// factor is the same Gq; the pair (g, K) used by Chaum–Pedersen proofs is
/// the width-2 case.
#[derive(Clone, Debug)]
pub struct PPGroup {
    factors: Vec<Arc<ModPGroup>>,
}

impl PPGroup {
    /// Panics on an empty factor list or factors with different exponent
    /// fields.
    pub fn new(factors: Vec<Arc<ModPGroup>>) -> Arc<Self> {
        assert!(!factors.is_empty(), "empty product group");
        for pair in factors.windows(2) {
            assert!(
                pair[0].field().as_ref() == pair[1].field().as_ref(),
                "product group factors over different exponent fields"
            );
        }
        Arc::new(PPGroup { factors })
    }

    /// The k-fold power of one group.
    pub fn power(group: &Arc<ModPGroup>, width: usize) -> Arc<Self> {
        Self::new(vec![group.clone(); width])
    }

    pub fn width(&self) -> usize {
        self.factors.len()
    }

    pub fn factors(&self) -> &[Arc<ModPGroup>] {
        &self.factors
    }

    /// Element from per-component elements; each must belong to the
    /// matching factor.
    pub fn prod(&self, components: Vec<GroupElement>) -> ProductElement {
        assert_eq!(components.len(), self.width(), "wrong component count");
        for (c, f) in components.iter().zip(&self.factors) {
            assert!(c.group().as_ref() == f.as_ref(), "component from a foreign factor");
        }
        ProductElement { components }
    }

    /// Broadcasts one element across all factors; the factors must all be
    /// the element's group.
    pub fn broadcast(&self, x: &GroupElement) -> ProductElement {
        self.prod(vec![x.clone(); self.width()])
    }

    pub fn one(&self) -> ProductElement {
        ProductElement {
            components: self.factors.iter().map(|f| f.one()).collect(),
        }
    }
}

/// An element of G^k: an ordered sequence of group elements. Multiply and
/// invert are pointwise; a scalar exponent broadcasts to every component.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ProductElement {
    components: Vec<GroupElement>,
}

impl ProductElement {
    /// Panics on an empty sequence.
    pub fn new(components: Vec<GroupElement>) -> Self {
        assert!(!components.is_empty(), "empty product element");
        ProductElement { components }
    }

    pub fn width(&self) -> usize {
        self.components.len()
    }

    pub fn components(&self) -> &[GroupElement] {
        &self.components
    }

    pub fn component(&self, i: usize) -> &GroupElement {
        &self.components[i]
    }

    /// Pointwise exponentiation by a product-ring element of matching
    /// width.
    pub fn exp_components(&self, exponent: &ProductRingElement) -> ProductElement {
        assert_eq!(self.width(), exponent.width(), "mismatched widths");
        ProductElement {
            components: self
                .components
                .iter()
                .zip(exponent.components())
                .map(|(b, e)| b.exp(e))
                .collect(),
        }
    }
}

impl GroupElt for ProductElement {
    fn mul(&self, other: &Self) -> Self {
        assert_eq!(self.width(), other.width(), "mismatched widths");
        ProductElement {
            components: self
                .components
                .iter()
                .zip(&other.components)
                .map(|(a, b)| a.mul(b))
                .collect(),
        }
    }

    fn inv(&self) -> Self {
        ProductElement {
            components: self.components.iter().map(GroupElement::inv).collect(),
        }
    }

    fn exp(&self, exponent: &FieldElement) -> Self {
        ProductElement {
            components: self.components.iter().map(|c| c.exp(exponent)).collect(),
        }
    }

    fn to_byte_tree(&self) -> ByteTree {
        ByteTree::node(
            self.components
                .iter()
                .map(GroupElement::to_byte_tree)
                .collect(),
        )
    }
}
