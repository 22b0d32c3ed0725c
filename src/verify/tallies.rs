//! Tally-contest and spoiled-ballot verification.
//!
//! Both walk per-selection decryption records; tally selections
//! additionally check the homomorphic sum against the cast ballots, while
//! spoiled contests check that the plaintexts sum to the selection limit
//! (a spoiled ballot aggregates nothing, so `TallySum` is skipped).

use std::sync::Arc;

use crate::algebra::{FieldElement, GroupElement, GroupElt, ModPGroup};
use crate::biginteger::BigInt;
use crate::records::{self, codes, DecryptionRecord};
use crate::schema;

use super::Walk;

pub(super) fn verify_tally_contest(
    walk: &mut Walk<'_>,
    group: &Arc<ModPGroup>,
    trustee_keys: &[Option<GroupElement>],
    record: &schema::ElectionRecord,
    contest_index: usize,
    tally: &schema::ContestTally,
) {
    for (j, selection) in tally.selections.iter().enumerate() {
        let mut child = walk.child(format!("Selection #{j}"));
        verify_selection(
            &mut child,
            group,
            trustee_keys,
            selection,
            Some((record, contest_index, j)),
        );
    }
}

pub(super) fn verify_spoiled_ballot(
    walk: &mut Walk<'_>,
    group: &Arc<ModPGroup>,
    trustee_keys: &[Option<GroupElement>],
    ballot: &schema::SpoiledBallot,
) {
    for (j, contest) in ballot.contests.iter().enumerate() {
        let mut child = walk.child(format!("Contest #{j}"));
        verify_spoiled_contest(&mut child, group, trustee_keys, contest);
    }
}

fn verify_spoiled_contest(
    walk: &mut Walk<'_>,
    group: &Arc<ModPGroup>,
    trustee_keys: &[Option<GroupElement>],
    contest: &schema::SpoiledContest,
) {
    let mut cleartexts = Vec::with_capacity(contest.selections.len());
    for (k, selection) in contest.selections.iter().enumerate() {
        let mut child = walk.child(format!("Selection #{k}"));
        cleartexts.push(verify_selection(
            &mut child,
            group,
            trustee_keys,
            selection,
            None,
        ));
    }

    match cleartexts.into_iter().collect::<Option<Vec<_>>>() {
        None => walk.record(
            false,
            codes::SUM_OF_PLAINTEXTS,
            "selections failed to load",
        ),
        Some(values) => {
            let field = group.field();
            let mut sum = field.zero();
            for value in &values {
                sum = &sum + value;
            }
            let limit = field.element_reduced(&BigInt::from(contest.max_selections));
            walk.record(
                sum == limit,
                codes::SUM_OF_PLAINTEXTS,
                "plaintexts sum to the selection limit",
            );
        }
    }
}

/// Verifies one decryption selection: share-correctness proofs, the
/// optional tally sum, the combined decryption and the cleartext. Returns
/// the cleartext exponent when the record loaded, for the spoiled-ballot
/// plaintext sum.
fn verify_selection(
    walk: &mut Walk<'_>,
    group: &Arc<ModPGroup>,
    trustee_keys: &[Option<GroupElement>],
    selection: &schema::TallySelection,
    tally_source: Option<(&schema::ElectionRecord, usize, usize)>,
) -> Option<FieldElement> {
    let decryption = match DecryptionRecord::load(group, selection) {
        Ok(d) => d,
        Err(failure) => {
            walk.fail_load(&failure);
            return None;
        }
    };

    let mut shares = Vec::with_capacity(selection.shares.len());
    let mut all_loaded = true;
    for (s, share) in selection.shares.iter().enumerate() {
        let mut child = walk.child(format!("Share #{s}"));
        match records::parse_share(group, share) {
            Err(failure) => {
                child.fail_load(&failure);
                all_loaded = false;
            }
            Ok(value) => {
                match trustee_keys.get(s).and_then(Option::as_ref) {
                    None => child.record(
                        false,
                        codes::CHAUM_PEDERSEN_PROOF,
                        "share correctness: trustee key unavailable",
                    ),
                    Some(key) => match records::verify_share(
                        group,
                        &decryption.alpha,
                        key,
                        &value,
                        &share.proof,
                    ) {
                        Ok(ok) => child.record(ok, codes::CHAUM_PEDERSEN_PROOF, "share correctness"),
                        Err(e) => child.record(
                            false,
                            codes::CHAUM_PEDERSEN_PROOF,
                            &format!("share correctness: {e}"),
                        ),
                    },
                }
                shares.push(value);
            }
        }
    }

    if !all_loaded {
        walk.record(
            false,
            codes::SHARES_LOADING,
            "some decryption shares failed to load",
        );
        // The cleartext itself loaded, so the plaintext sum can still be
        // checked upstream.
        return Some(decryption.cleartext);
    }

    if let Some((record, contest_index, selection_index)) = tally_source {
        tally_sum(walk, group, record, contest_index, selection_index, &decryption);
    }

    let combined = shares.iter().fold(group.one(), |acc, m| acc.mul(m));
    walk.record(
        decryption.decryption_matches(&combined),
        codes::DECRYPTION_MATCHES,
        "ciphertext matches the combined decryption",
    );
    walk.record(
        decryption.cleartext_matches(),
        codes::CLEARTEXT_MATCHES,
        "cleartext matches the decrypted value",
    );
    Some(decryption.cleartext)
}

/// The declared encrypted tally must be the componentwise product of the
/// cast ballots' ciphertexts for this contest cell.
fn tally_sum(
    walk: &mut Walk<'_>,
    group: &Arc<ModPGroup>,
    record: &schema::ElectionRecord,
    contest_index: usize,
    selection_index: usize,
    decryption: &DecryptionRecord,
) {
    let mut sum_a = group.one();
    let mut sum_b = group.one();
    for ballot in &record.cast_ballots {
        let cell = ballot
            .contests
            .get(contest_index)
            .and_then(|c| c.selections.get(selection_index));
        let Some(cell) = cell else {
            walk.record(
                false,
                codes::LOADING_BALLOTS,
                "a cast ballot is missing this contest cell",
            );
            return;
        };
        match records::parse_message(group, &cell.message) {
            Err(e) => {
                walk.record(false, codes::LOADING_BALLOTS, &e.to_string());
                return;
            }
            Ok((a, b)) => {
                sum_a = sum_a.mul(&a);
                sum_b = sum_b.mul(&b);
            }
        }
    }
    walk.record(
        sum_a == decryption.alpha && sum_b == decryption.beta,
        codes::TALLY_SUM,
        "encrypted tally is the product of the cast ballots",
    );
}
