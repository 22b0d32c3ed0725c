//! The algebraic stack: prime field Fq, the order-q subgroup of Z*p, and
//! their k-wide products.
//!
//! Fields and groups are long-lived shared objects; elements hold an `Arc`
//! handle to the structure they belong to, and mixing elements of different
//! structures panics. Everything is immutable after construction.

mod field;
mod group;
mod hom;
mod product;


pub use field::{FieldElement, PrimeField, ProductRingElement};
pub use group::{GroupElement, GroupEncoding, ModPGroup};
pub use hom::ExpHom;
pub use product::{PPGroup, ProductElement};

use crate::bytetree::ByteTree;

/// What the sigma layer needs from a group element: the same capability
/// surface is offered by scalar elements of Gq and by product elements of
/// Gq^k, so one verifier covers Schnorr and Chaum–Pedersen shapes.
pub trait GroupElt: Clone + PartialEq {
    fn mul(&self, other: &Self) -> Self;
    fn inv(&self) -> Self;
    fn exp(&self, exponent: &FieldElement) -> Self;
    fn to_byte_tree(&self) -> ByteTree;
}
