//! The exponentiation homomorphism x ↦ b^x.

use std::sync::Arc;

use super::{FieldElement, GroupElt, PrimeField};

/// Homomorphism from the exponent ring into a group, fixed at a basis.
/// Over a product basis, evaluation is simultaneous exponentiation by the
/// shared scalar: `(b1, b2)^x = (b1^x, b2^x)`.
#[derive(Clone, Debug)]
pub struct ExpHom<E: GroupElt> {
    domain: Arc<PrimeField>,
    basis: E,
}

impl<E: GroupElt> ExpHom<E> {
    pub fn new(domain: Arc<PrimeField>, basis: E) -> Self {
        ExpHom { domain, basis }
    }

    pub fn domain(&self) -> &Arc<PrimeField> {
        &self.domain
    }

    pub fn basis(&self) -> &E {
        &self.basis
    }

    pub fn eva(&self, exponent: &FieldElement) -> E {
        assert!(
            exponent.field().as_ref() == self.domain.as_ref(),
            "exponent from a foreign field"
        );
        self.basis.exp(exponent)
    }
}
