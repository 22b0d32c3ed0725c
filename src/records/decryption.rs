//! Loading and checking of tally and spoiled-ballot decryption material.

use std::sync::Arc;

use crate::algebra::{FieldElement, GroupElement, GroupElt, ModPGroup};
use crate::errors::AlgebraError;
use crate::schema;

use super::{codes, parse_element, parse_scalar, LoadFailure};

/// Parsed per-selection decryption data: the encrypted pair (A, B), the
/// claimed plaintext exponentiation g^m and the cleartext exponent m.
/// Shares are loaded separately so each gets its own predicate context.
pub struct DecryptionRecord {
    pub alpha: GroupElement,
    pub beta: GroupElement,
    pub decrypted: GroupElement,
    pub cleartext: FieldElement,
}

impl DecryptionRecord {
    pub fn load(
        group: &Arc<ModPGroup>,
        selection: &schema::TallySelection,
    ) -> Result<Self, LoadFailure> {
        let alpha = parse_element(group, &selection.encrypted_tally.public_key)
            .map_err(|e| LoadFailure::new(codes::ALPHA_LOADING, e))?;
        let beta = parse_element(group, &selection.encrypted_tally.ciphertext)
            .map_err(|e| LoadFailure::new(codes::DECRYPTION_DATA, e))?;
        let decrypted = parse_element(group, &selection.decrypted_tally)
            .map_err(|e| LoadFailure::new(codes::DECRYPTION_DATA, e))?;
        let cleartext = parse_scalar(group, &selection.cleartext)
            .map_err(|e| LoadFailure::new(codes::DECRYPTION_DATA, e))?;
        Ok(DecryptionRecord {
            alpha,
            beta,
            decrypted,
            cleartext,
        })
    }

    /// `B · M⁻¹ = g^m` for the combined share product M.
    pub fn decryption_matches(&self, combined_shares: &GroupElement) -> bool {
        self.beta.mul(&combined_shares.inv()) == self.decrypted
    }

    /// `g^m` recomputed from the cleartext exponent equals the claimed
    /// plaintext exponentiation.
    pub fn cleartext_matches(&self) -> bool {
        let generator = self.decrypted.group().generator();
        generator.exp(&self.cleartext) == self.decrypted
    }
}

/// One share value off the wire; failures carry the `ShareLoading` code.
pub fn parse_share(
    group: &Arc<ModPGroup>,
    share: &schema::Share,
) -> Result<GroupElement, LoadFailure> {
    parse_element(group, &share.share).map_err(|e| LoadFailure::new(codes::SHARE_LOADING, e))
}

/// Share-correctness proof: Chaum–Pedersen over bases (g, α) with
/// instance (trustee public key, share), i.e. the trustee exponentiated α
/// with the same secret that underlies its key.
pub fn verify_share(
    group: &Arc<ModPGroup>,
    alpha: &GroupElement,
    trustee_key: &GroupElement,
    share: &GroupElement,
    proof: &schema::ChaumPedersenProof,
) -> Result<bool, AlgebraError> {
    super::verify_chaum_pedersen(group, alpha, trustee_key, share, proof)
}
