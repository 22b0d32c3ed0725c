//! Cast-ballot verification: shape checks, the homomorphic selection-sum
//! proof, and the per-selection zero-or-one proofs.

use std::sync::Arc;

use itertools::izip;

use crate::algebra::{GroupElement, GroupElt, ModPGroup};
use crate::biginteger::BigInt;
use crate::records::{self, codes};
use crate::schema;

use super::{ContestSchema, Walk};

pub(super) fn verify_cast_ballot(
    walk: &mut Walk<'_>,
    group: &Arc<ModPGroup>,
    joint_key: Option<&GroupElement>,
    contest_schema: &[ContestSchema],
    ballot: &schema::CastBallot,
) {
    walk.record(
        ballot.contests.len() == contest_schema.len(),
        "CastBallotNumberOfContests",
        "ballot covers every tallied contest",
    );

    for (j, contest) in ballot.contests.iter().enumerate() {
        let mut child = walk.child(format!("Contest #{j}"));
        verify_contest(&mut child, group, joint_key, contest_schema.get(j), contest);
    }
}

fn verify_contest(
    walk: &mut Walk<'_>,
    group: &Arc<ModPGroup>,
    joint_key: Option<&GroupElement>,
    shape: Option<&ContestSchema>,
    contest: &schema::BallotContest,
) {
    walk.record(
        shape.is_some_and(|s| contest.selections.len() == s.selections),
        "CastBallotNumberOfSelections",
        "selection count matches the contest schema",
    );
    walk.record(
        shape.is_some_and(|s| contest.max_selections == s.max_selections),
        "CastBallotMaxSelections",
        "selection limit matches the contest schema",
    );

    let mut pairs: Vec<Option<(GroupElement, GroupElement)>> =
        Vec::with_capacity(contest.selections.len());
    for (k, selection) in contest.selections.iter().enumerate() {
        match records::parse_message(group, &selection.message) {
            Ok(pair) => pairs.push(Some(pair)),
            Err(e) => {
                let mut child = walk.child(format!("Selection #{k}"));
                child.record(false, codes::CAST_BALLOT, &e.to_string());
                pairs.push(None);
            }
        }
    }

    // The homomorphic sum of the selections must encrypt exactly the
    // selection limit: S / (1, g^max) encrypts zero under (g, K).
    match joint_key {
        None => walk.record(
            false,
            codes::CHAUM_PEDERSEN_PROOF,
            "ballot max selections: joint public key unavailable",
        ),
        Some(key) => {
            if pairs.iter().all(Option::is_some) {
                let mut sum_a = group.one();
                let mut sum_b = group.one();
                for (a, b) in pairs.iter().flatten() {
                    sum_a = sum_a.mul(a);
                    sum_b = sum_b.mul(b);
                }
                let limit = group
                    .generator()
                    .exp_int(&BigInt::from(contest.max_selections));
                let shifted = sum_b.mul(&limit.inv());
                match records::verify_chaum_pedersen(
                    group,
                    key,
                    &sum_a,
                    &shifted,
                    &contest.num_selections_proof,
                ) {
                    Ok(ok) => walk.record(ok, codes::CHAUM_PEDERSEN_PROOF, "ballot max selections"),
                    Err(e) => walk.record(
                        false,
                        codes::CHAUM_PEDERSEN_PROOF,
                        &format!("ballot max selections: {e}"),
                    ),
                }
            } else {
                walk.record(
                    false,
                    codes::CHAUM_PEDERSEN_PROOF,
                    "ballot max selections: selections failed to load",
                );
            }
        }
    }

    for (k, selection, pair) in izip!(0.., &contest.selections, &pairs) {
        let (Some(key), Some((a, b))) = (joint_key, pair) else {
            continue;
        };
        let mut child = walk.child(format!("Selection #{k}"));
        match records::verify_zero_or_one(
            group,
            key,
            a,
            b,
            &selection.zero_proof,
            &selection.one_proof,
        ) {
            Ok(ok) => child.record(ok, codes::ZERO_OR_ONE_PROOF, "selection encrypts zero or one"),
            Err(e) => child.record(false, codes::ZERO_OR_ONE_PROOF, &e.to_string()),
        }
    }
}
