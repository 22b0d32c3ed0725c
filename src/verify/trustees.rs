//! Trustee key rows and coefficient commitments.

use std::sync::Arc;

use crate::algebra::{GroupElement, ModPGroup};
use crate::records::{self, codes};
use crate::schema;

use super::Walk;

/// Verifies one trustee's commitment row and returns its coefficient-0
/// commitment (the trustee public key) when it loads.
pub(super) fn verify_trustee(
    walk: &mut Walk<'_>,
    group: &Arc<ModPGroup>,
    threshold: usize,
    row: &schema::TrusteeKeys,
) -> Option<GroupElement> {
    walk.record(
        row.coefficients.len() == threshold,
        "NumberOfCoefficients",
        "one coefficient commitment per threshold degree",
    );

    let mut public_key = None;
    for (j, cell) in row.coefficients.iter().enumerate() {
        let mut child = walk.child(format!("Coefficient #{j}"));
        match records::parse_element(group, &cell.public_key) {
            Err(e) => {
                child.record(false, codes::COEFFICIENT_COMMITMENT_LOADING, &e.to_string());
            }
            Ok(commitment) => {
                match records::verify_schnorr(group, &commitment, &cell.proof) {
                    Ok(ok) => child.record(
                        ok,
                        codes::SCHNORR_PROOF,
                        "knowledge of the coefficient exponent",
                    ),
                    Err(e) => child.record(false, codes::SCHNORR_PROOF, &e.to_string()),
                }
                if j == 0 {
                    public_key = Some(commitment);
                }
            }
        }
    }
    public_key
}
