//! The verification tree: a depth-first walk of the election record that
//! emits one named predicate per checkable claim.
//!
//! Deserialization failures never abort the walk. A failure at a node
//! emits one failure predicate there and suppresses the predicates
//! strictly beneath it; sibling subtrees keep verifying, so one run over a
//! record yields the full audit trail.

mod ballots;
mod recorder;
mod tallies;
mod trustees;

pub use recorder::{CliRecorder, CollectingRecorder, Failure, Recorder};

use std::str::FromStr;
use std::sync::Arc;

use crate::algebra::{GroupElement, GroupElt, ModPGroup};
use crate::biginteger::BigInt;
use crate::params::Baseline;
use crate::records::{self, LoadFailure};
use crate::schema;

/// Recorder handle plus the context breadcrumb; children get the parent's
/// path by copy, extended with their own label.
pub(crate) struct Walk<'r> {
    recorder: &'r mut dyn Recorder,
    path: Vec<String>,
}

impl<'r> Walk<'r> {
    fn new(recorder: &'r mut dyn Recorder) -> Self {
        Walk {
            recorder,
            path: vec!["Election".to_string()],
        }
    }

    pub(crate) fn child(&mut self, label: String) -> Walk<'_> {
        let mut path = self.path.clone();
        path.push(label);
        Walk {
            recorder: &mut *self.recorder,
            path,
        }
    }

    pub(crate) fn record(&mut self, status: bool, name: &str, title: &str) {
        self.recorder.record(status, &self.path, name, title);
    }

    pub(crate) fn fail_load(&mut self, failure: &LoadFailure) {
        let title = failure.source.to_string();
        self.record(false, failure.code, &title);
    }
}

/// Per-contest shape inferred from the tally section (contest count and
/// selection counts) and the first ballot (selection limit); every cast
/// ballot is compared against it.
pub(crate) struct ContestSchema {
    pub selections: usize,
    pub max_selections: u32,
}

fn infer_contest_schema(record: &schema::ElectionRecord) -> Vec<ContestSchema> {
    record
        .contest_tallies
        .iter()
        .enumerate()
        .map(|(i, tally)| {
            let from_cast = record
                .cast_ballots
                .first()
                .and_then(|b| b.contests.get(i))
                .map(|c| c.max_selections);
            let from_spoiled = record
                .spoiled_ballots
                .first()
                .and_then(|b| b.contests.get(i))
                .map(|c| c.max_selections);
            ContestSchema {
                selections: tally.selections.len(),
                max_selections: from_cast.or(from_spoiled).unwrap_or(1),
            }
        })
        .collect()
}

/// Verifies a parsed record against the baseline and reports every
/// predicate to the recorder. Returns true iff no predicate failed.
pub fn verify_election(
    record: &schema::ElectionRecord,
    baseline: &Baseline,
    recorder: &mut dyn Recorder,
) -> bool {
    run(record, baseline, recorder);
    recorder.all_passed()
}

fn run(record: &schema::ElectionRecord, baseline: &Baseline, recorder: &mut dyn Recorder) {
    let mut walk = Walk::new(recorder);
    walk.record(true, "JsonSchema", "record parsed against the fixed schema");

    let params = &record.parameters;
    let n = params.num_trustees as usize;
    let t = params.threshold as usize;
    walk.record(
        params.threshold <= params.num_trustees,
        "ThresholdTrustees",
        "threshold is at most the number of trustees",
    );
    walk.record(
        record.trustee_public_keys.len() == n,
        "NumPubKeys",
        "one commitment row per trustee",
    );

    let declared_prime = BigInt::from_str(&params.prime);
    let declared_generator = BigInt::from_str(&params.generator);
    walk.record(
        declared_prime.as_ref().ok() == Some(baseline.group.modulus()),
        "BaselineEncryptionModulus",
        "declared prime is the baseline modulus",
    );
    walk.record(
        declared_generator.as_ref().ok() == Some(baseline.group.generator().value()),
        "BaselineEncryptionGenerator",
        "declared generator is the baseline generator",
    );

    let expected_base = baseline.base_hash.base_hash(params);
    walk.record(
        BigInt::from_str(&record.base_hash).ok().as_ref() == Some(&expected_base),
        "ElectionBaseHash",
        "declared base hash matches the computed one",
    );
    let expected_extended = baseline
        .base_hash
        .extended_base_hash(params, &expected_base);
    walk.record(
        BigInt::from_str(&record.extended_base_hash).ok().as_ref() == Some(&expected_extended),
        "ElectionExtendedBaseHash",
        "declared extended base hash matches the computed one",
    );

    // The working group comes from the wire so its parameters get the full
    // checks (including g^q = 1); the predicates above already flagged any
    // deviation from the baseline.
    let group: Arc<ModPGroup> = match (declared_prime, declared_generator) {
        (Ok(p), Ok(g)) => {
            match ModPGroup::from_wire(p, baseline.group.order().clone(), g, 1) {
                Ok(group) => group,
                Err(e) => {
                    walk.record(false, "EncryptionGroup", &e.to_string());
                    return;
                }
            }
        }
        _ => {
            walk.record(false, "EncryptionGroup", "declared parameters do not parse");
            return;
        }
    };

    let mut trustee_keys: Vec<Option<GroupElement>> = Vec::with_capacity(n);
    for (i, row) in record.trustee_public_keys.iter().enumerate() {
        let mut child = walk.child(format!("Trustee #{i}"));
        trustee_keys.push(trustees::verify_trustee(&mut child, &group, t, row));
    }

    let joint_key = match records::parse_element(&group, &record.joint_public_key) {
        Err(e) => {
            walk.record(false, "JointPublicKeyCalculation", &e.to_string());
            None
        }
        Ok(declared) => {
            if trustee_keys.len() == n && n > 0 && trustee_keys.iter().all(Option::is_some) {
                let product = trustee_keys
                    .iter()
                    .flatten()
                    .fold(group.one(), |acc, k| acc.mul(k));
                walk.record(
                    product == declared,
                    "JointPublicKeyCalculation",
                    "joint key is the product of the trustees' first coefficients",
                );
            } else {
                walk.record(
                    false,
                    "JointPublicKeyCalculation",
                    "trustee keys unavailable",
                );
            }
            Some(declared)
        }
    };

    // The joint key is the second basis component of every encryption
    // proof; amortize its exponentiations with a fixed-base table.
    let selection_count: usize = record
        .cast_ballots
        .iter()
        .flat_map(|b| &b.contests)
        .map(|c| c.selections.len() + 1)
        .sum();
    let joint_key = joint_key.map(|k| k.fix(3 * selection_count + 4));

    let contest_schema = infer_contest_schema(record);

    for (i, ballot) in record.cast_ballots.iter().enumerate() {
        let mut child = walk.child(format!("Cast ballot #{i}"));
        ballots::verify_cast_ballot(
            &mut child,
            &group,
            joint_key.as_ref(),
            &contest_schema,
            ballot,
        );
    }

    for (i, tally) in record.contest_tallies.iter().enumerate() {
        let mut child = walk.child(format!("Tally, contest #{i}"));
        tallies::verify_tally_contest(&mut child, &group, &trustee_keys, record, i, tally);
    }

    for (i, ballot) in record.spoiled_ballots.iter().enumerate() {
        let mut child = walk.child(format!("Spoiled ballot #{i}"));
        tallies::verify_spoiled_ballot(&mut child, &group, &trustee_keys, ballot);
    }
}
