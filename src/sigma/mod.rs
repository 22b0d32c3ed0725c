//! Sigma-protocol verifiers made non-interactive by Fiat–Shamir.
//!
//! A transcript is the triple (commitment, challenge, response). The
//! challenge is bound to the statement by hashing the canonical byte tree
//! `Node[label, instance, commitment]` with SHA-256 and reducing the
//! digest into Fq; the layering is fixed and any deviation fails
//! verification against existing records.

#[cfg(test)]
mod tests;

use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::algebra::{ExpHom, FieldElement, GroupElt, PrimeField};
use crate::bytetree::ByteTree;

/// Fiat–Shamir challenge for a (label, instance, commitment) transcript
/// prefix.
pub fn challenge(
    field: &Arc<PrimeField>,
    label: &[u8],
    instance: &ByteTree,
    commitment: &ByteTree,
) -> FieldElement {
    let transcript = ByteTree::node(vec![
        ByteTree::from(label),
        instance.clone(),
        commitment.clone(),
    ]);
    let digest = Sha256::digest(transcript.to_bytes());
    field.element_from_bytes_mod_order(&digest)
}

/// A three-message proof transcript over elements of `E`.
#[derive(Clone, PartialEq, Debug)]
pub struct SchnorrProof<E: GroupElt> {
    pub commitment: E,
    pub challenge: FieldElement,
    pub response: FieldElement,
}

impl<E: GroupElt> SchnorrProof<E> {
    /// The on-wire shape: the challenge rides along as the third child even
    /// though the hash input covers only label, instance and commitment.
    pub fn to_byte_tree(&self) -> ByteTree {
        ByteTree::node(vec![
            self.commitment.to_byte_tree(),
            self.challenge.to_byte_tree(),
            self.response.to_byte_tree(),
        ])
    }
}

/// Verifier for Schnorr proofs of knowledge of a discrete logarithm:
/// given instance Y and transcript (A, c, z), accept iff c is the derived
/// challenge and `Y^c · A = b^z` for the homomorphism basis b.
///
/// Instantiated over Gq this is the plain Schnorr check; over Gq×Gq with
/// basis (g, K) it is the Chaum–Pedersen check.
#[derive(Clone, Debug)]
pub struct SchnorrVerifier<E: GroupElt> {
    hom: ExpHom<E>,
}

impl<E: GroupElt> SchnorrVerifier<E> {
    pub fn new(hom: ExpHom<E>) -> Self {
        SchnorrVerifier { hom }
    }

    pub fn hom(&self) -> &ExpHom<E> {
        &self.hom
    }

    /// Full verification: challenge binding plus the check equation.
    pub fn verify(&self, label: &[u8], instance: &E, proof: &SchnorrProof<E>) -> bool {
        let derived = challenge(
            self.hom.domain(),
            label,
            &instance.to_byte_tree(),
            &proof.commitment.to_byte_tree(),
        );
        derived == proof.challenge && self.check_equation(instance, proof)
    }

    /// The check equation alone, under the transcript's own challenge.
    /// OR-composition calls this per branch and binds the challenges by
    /// their sum instead.
    pub fn check_equation(&self, instance: &E, proof: &SchnorrProof<E>) -> bool {
        let lhs = instance.exp(&proof.challenge).mul(&proof.commitment);
        lhs == self.hom.eva(&proof.response)
    }
}

/// Cramer–Damgård–Schoenmakers OR-composition: proves one of k statements
/// without revealing which. Subproofs pair with instances positionally.
#[derive(Clone, Debug)]
pub struct SigmaOr<E: GroupElt> {
    verifiers: Vec<SchnorrVerifier<E>>,
}

impl<E: GroupElt> SigmaOr<E> {
    /// Panics on an empty verifier list or mismatched challenge spaces.
    pub fn new(verifiers: Vec<SchnorrVerifier<E>>) -> Self {
        assert!(!verifiers.is_empty(), "empty sigma-or composition");
        for pair in verifiers.windows(2) {
            assert!(
                pair[0].hom.domain().as_ref() == pair[1].hom.domain().as_ref(),
                "sigma-or branches over different challenge spaces"
            );
        }
        SigmaOr { verifiers }
    }

    pub fn width(&self) -> usize {
        self.verifiers.len()
    }

    /// Accepts iff every branch equation holds under its own subchallenge
    /// and the subchallenges sum to the challenge derived from the
    /// instance and commitment vectors. Visits branches in index order and
    /// short-circuits on the first failure.
    pub fn verify(&self, label: &[u8], instances: &[E], proofs: &[SchnorrProof<E>]) -> bool {
        if instances.len() != self.verifiers.len() || proofs.len() != self.verifiers.len() {
            return false;
        }
        for ((verifier, instance), proof) in self.verifiers.iter().zip(instances).zip(proofs) {
            if !verifier.check_equation(instance, proof) {
                return false;
            }
        }
        self.challenge_sum_holds(label, instances, proofs)
    }

    /// Per-branch equation outcomes, for diagnostics; no short-circuit.
    pub fn branch_results(&self, instances: &[E], proofs: &[SchnorrProof<E>]) -> Vec<bool> {
        self.verifiers
            .iter()
            .zip(instances)
            .zip(proofs)
            .map(|((v, i), p)| v.check_equation(i, p))
            .collect()
    }

    fn challenge_sum_holds(
        &self,
        label: &[u8],
        instances: &[E],
        proofs: &[SchnorrProof<E>],
    ) -> bool {
        let field = self.verifiers[0].hom.domain();
        let instance_vector =
            ByteTree::node(instances.iter().map(GroupElt::to_byte_tree).collect());
        let commitment_vector =
            ByteTree::node(proofs.iter().map(|p| p.commitment.to_byte_tree()).collect());
        let derived = challenge(field, label, &instance_vector, &commitment_vector);

        let mut sum = field.zero();
        for proof in proofs {
            sum = &sum + &proof.challenge;
        }
        sum == derived
    }
}
