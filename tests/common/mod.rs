//! Record builder for the end-to-end scenarios: a deterministic test-only
//! prover that produces valid election records over a small safe-prime
//! group, using the crate's own primitives.

#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;

use rand::{rngs::StdRng, Rng, SeedableRng};

use scrutiny::algebra::{
    ExpHom, FieldElement, GroupElement, GroupElt, ModPGroup, PPGroup, ProductElement,
};
use scrutiny::biginteger::BigInt;
use scrutiny::bytetree::ByteTree;
use scrutiny::records::{CHAUM_PEDERSEN_LABEL, SCHNORR_LABEL, ZERO_OR_ONE_LABEL};
use scrutiny::schema;
use scrutiny::sigma::challenge;

/// Safe prime p = 2q + 1; the subgroup of quadratic residues has prime
/// order q and is generated by 4.
pub const TEST_P: &str = "18446744073709554719";
pub const TEST_Q: &str = "9223372036854777359";
pub const TEST_G: &str = "4";

pub fn test_group() -> Arc<ModPGroup> {
    ModPGroup::new(
        BigInt::from_str(TEST_P).unwrap(),
        BigInt::from_str(TEST_Q).unwrap(),
        BigInt::from_str(TEST_G).unwrap(),
    )
}

/// A decimal value in [1, p) that is not a quadratic residue: since
/// p = 3 (mod 4), the negation of a residue never is one.
pub fn non_residue_decimal(group: &Arc<ModPGroup>) -> String {
    (group.modulus() - &BigInt::from(4u32)).to_string()
}

pub struct RecordBuilder {
    pub group: Arc<ModPGroup>,
    rng: StdRng,
}

impl RecordBuilder {
    pub fn new(seed: u64) -> Self {
        RecordBuilder {
            group: test_group(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn random_scalar(&mut self) -> FieldElement {
        let raw = BigInt::from(self.rng.gen::<u64>());
        self.group.field().element_reduced(&raw)
    }

    fn pair_basis(&self, second: &GroupElement) -> (Arc<PPGroup>, ExpHom<ProductElement>) {
        let pair = PPGroup::power(&self.group, 2);
        let basis = pair.prod(vec![self.group.generator(), second.clone()]);
        let hom = ExpHom::new(self.group.field().clone(), basis);
        (pair, hom)
    }

    /// Schnorr proof of knowledge for the instance g^witness.
    pub fn schnorr_proof(&mut self, witness: &FieldElement) -> (GroupElement, schema::SchnorrProof) {
        let instance = self.group.generator().exp(witness);
        let nonce = self.random_scalar();
        let commitment = self.group.generator().exp(&nonce);
        let c = challenge(
            self.group.field(),
            SCHNORR_LABEL,
            &instance.to_byte_tree(),
            &commitment.to_byte_tree(),
        );
        let response = &nonce + &(&c * witness);
        let wire = schema::SchnorrProof {
            commitment: commitment.value().to_string(),
            challenge: c.value().to_string(),
            response: response.value().to_string(),
        };
        (instance, wire)
    }

    /// Chaum–Pedersen proof that (g^w, second^w) shares the witness w.
    pub fn chaum_pedersen_proof(
        &mut self,
        second: &GroupElement,
        witness: &FieldElement,
    ) -> schema::ChaumPedersenProof {
        let (_, hom) = self.pair_basis(second);
        let instance = hom.eva(witness);
        let nonce = self.random_scalar();
        let commitment = hom.eva(&nonce);
        let c = challenge(
            self.group.field(),
            CHAUM_PEDERSEN_LABEL,
            &instance.to_byte_tree(),
            &commitment.to_byte_tree(),
        );
        let response = &nonce + &(&c * witness);
        schema::ChaumPedersenProof {
            commitment: schema::Message {
                public_key: commitment.component(0).value().to_string(),
                ciphertext: commitment.component(1).value().to_string(),
            },
            challenge: c.value().to_string(),
            response: response.value().to_string(),
        }
    }

    /// CDS zero-or-one proof pair for the ElGamal pair (a, b) under `key`,
    /// where (a, b) encrypts `message` with randomness `r`. The prover
    /// holds a real witness only when message is 0 or 1; for anything else
    /// the transcript is built the same way and cannot verify.
    pub fn zero_or_one_proofs(
        &mut self,
        key: &GroupElement,
        a: &GroupElement,
        b: &GroupElement,
        message: u32,
        r: &FieldElement,
    ) -> (schema::ChaumPedersenProof, schema::ChaumPedersenProof) {
        let (pair, hom) = self.pair_basis(key);
        let instances = [
            pair.prod(vec![a.clone(), b.clone()]),
            pair.prod(vec![a.clone(), b.mul(&self.group.generator().inv())]),
        ];
        let real = usize::from(message != 0).min(1);
        let fake = 1 - real;

        let fake_challenge = self.random_scalar();
        let fake_response = self.random_scalar();
        let fake_commitment = hom
            .eva(&fake_response)
            .mul(&instances[fake].exp(&fake_challenge).inv());
        let nonce = self.random_scalar();
        let real_commitment = hom.eva(&nonce);

        let mut commitments = [fake_commitment.clone(), fake_commitment];
        commitments[real] = real_commitment;

        let instance_vector =
            ByteTree::node(instances.iter().map(GroupElt::to_byte_tree).collect());
        let commitment_vector =
            ByteTree::node(commitments.iter().map(GroupElt::to_byte_tree).collect());
        let total = challenge(
            self.group.field(),
            ZERO_OR_ONE_LABEL,
            &instance_vector,
            &commitment_vector,
        );
        let real_challenge = &total - &fake_challenge;
        let real_response = &nonce + &(&real_challenge * r);

        let mut challenges = [fake_challenge.clone(), fake_challenge];
        challenges[real] = real_challenge;
        let mut responses = [fake_response.clone(), fake_response];
        responses[real] = real_response;

        let wire = |i: usize| schema::ChaumPedersenProof {
            commitment: schema::Message {
                public_key: commitments[i].component(0).value().to_string(),
                ciphertext: commitments[i].component(1).value().to_string(),
            },
            challenge: challenges[i].value().to_string(),
            response: responses[i].value().to_string(),
        };
        (wire(0), wire(1))
    }

    pub fn encrypt(
        &mut self,
        key: &GroupElement,
        message: u32,
    ) -> (FieldElement, GroupElement, GroupElement) {
        let r = self.random_scalar();
        let alpha = self.group.generator().exp(&r);
        let beta = key
            .exp(&r)
            .mul(&self.group.generator().exp_int(&BigInt::from(message)));
        (r, alpha, beta)
    }

    /// A complete valid record: `contests[i]` is the selection count of
    /// contest i, every contest has a selection limit of 1, and every
    /// ballot votes for one selection per contest.
    pub fn build(
        &mut self,
        num_trustees: usize,
        threshold: usize,
        contests: &[usize],
        num_ballots: usize,
        num_spoiled: usize,
    ) -> schema::ElectionRecord {
        // Trustee polynomial coefficients and their commitments.
        let mut secrets: Vec<Vec<FieldElement>> = Vec::with_capacity(num_trustees);
        let mut trustee_public_keys = Vec::with_capacity(num_trustees);
        for _ in 0..num_trustees {
            let row: Vec<FieldElement> = (0..threshold).map(|_| self.random_scalar()).collect();
            let coefficients = row
                .iter()
                .map(|secret| {
                    let (instance, proof) = self.schnorr_proof(secret);
                    schema::CoefficientCommitment {
                        public_key: instance.value().to_string(),
                        proof,
                    }
                })
                .collect();
            trustee_public_keys.push(schema::TrusteeKeys { coefficients });
            secrets.push(row);
        }
        let joint_secret = secrets
            .iter()
            .map(|row| row[0].clone())
            .reduce(|acc, s| &acc + &s)
            .expect("at least one trustee");
        let joint_key = self.group.generator().exp(&joint_secret);

        // Cast ballots, accumulating the per-cell homomorphic sums.
        let mut cell_alpha: Vec<Vec<GroupElement>> = contests
            .iter()
            .map(|&n| vec![self.group.one(); n])
            .collect();
        let mut cell_beta = cell_alpha.clone();
        let mut cell_votes: Vec<Vec<u32>> = contests.iter().map(|&n| vec![0u32; n]).collect();

        let mut cast_ballots = Vec::with_capacity(num_ballots);
        for ballot_index in 0..num_ballots {
            let mut ballot_contests = Vec::with_capacity(contests.len());
            for (ci, &num_selections) in contests.iter().enumerate() {
                let vote = (ballot_index + ci) % num_selections;
                let mut selections = Vec::with_capacity(num_selections);
                let mut randomness_sum = self.group.field().zero();
                for k in 0..num_selections {
                    let message = u32::from(k == vote);
                    let (r, alpha, beta) = self.encrypt(&joint_key, message);
                    let (zero_proof, one_proof) =
                        self.zero_or_one_proofs(&joint_key, &alpha, &beta, message, &r);
                    randomness_sum = &randomness_sum + &r;
                    cell_alpha[ci][k] = cell_alpha[ci][k].mul(&alpha);
                    cell_beta[ci][k] = cell_beta[ci][k].mul(&beta);
                    cell_votes[ci][k] += message;
                    selections.push(schema::BallotSelection {
                        message: schema::Message {
                            public_key: alpha.value().to_string(),
                            ciphertext: beta.value().to_string(),
                        },
                        zero_proof,
                        one_proof,
                    });
                }
                // The selection sum encrypts exactly max_selections = 1.
                let num_selections_proof =
                    self.chaum_pedersen_proof(&joint_key, &randomness_sum);
                ballot_contests.push(schema::BallotContest {
                    max_selections: 1,
                    selections,
                    num_selections_proof,
                });
            }
            cast_ballots.push(schema::CastBallot {
                ballot_info: format!("ballot-{ballot_index}"),
                contests: ballot_contests,
            });
        }

        // Contest tallies with per-trustee decryption shares.
        let mut contest_tallies = Vec::with_capacity(contests.len());
        for (ci, &num_selections) in contests.iter().enumerate() {
            let mut selections = Vec::with_capacity(num_selections);
            for k in 0..num_selections {
                let alpha = cell_alpha[ci][k].clone();
                let beta = cell_beta[ci][k].clone();
                let votes = cell_votes[ci][k];
                selections.push(self.decryption_selection(
                    &secrets, &alpha, &beta, votes,
                ));
            }
            contest_tallies.push(schema::ContestTally { selections });
        }

        // Spoiled ballots decrypt selection-wise.
        let mut spoiled_ballots = Vec::with_capacity(num_spoiled);
        for spoiled_index in 0..num_spoiled {
            let mut spoiled_contests = Vec::with_capacity(contests.len());
            for (ci, &num_selections) in contests.iter().enumerate() {
                let vote = (spoiled_index + ci + 1) % num_selections;
                let mut selections = Vec::with_capacity(num_selections);
                for k in 0..num_selections {
                    let message = u32::from(k == vote);
                    let (_, alpha, beta) = self.encrypt(&joint_key, message);
                    selections.push(self.decryption_selection(
                        &secrets, &alpha, &beta, message,
                    ));
                }
                spoiled_contests.push(schema::SpoiledContest {
                    max_selections: 1,
                    selections,
                });
            }
            spoiled_ballots.push(schema::SpoiledBallot {
                ballot_info: format!("spoiled-{spoiled_index}"),
                contests: spoiled_contests,
            });
        }

        schema::ElectionRecord {
            parameters: schema::Parameters {
                date: "2026-08-02".to_string(),
                location: "testing".to_string(),
                num_trustees: num_trustees as u32,
                threshold: threshold as u32,
                prime: self.group.modulus().to_string(),
                generator: self.group.generator().value().to_string(),
            },
            base_hash: "0".to_string(),
            trustee_public_keys,
            joint_public_key: joint_key.value().to_string(),
            extended_base_hash: "0".to_string(),
            cast_ballots,
            contest_tallies,
            spoiled_ballots,
        }
    }

    /// One decrypted selection: the encrypted pair, per-trustee shares of
    /// its decryption with correctness proofs, the claimed g^votes and the
    /// cleartext.
    fn decryption_selection(
        &mut self,
        secrets: &[Vec<FieldElement>],
        alpha: &GroupElement,
        beta: &GroupElement,
        votes: u32,
    ) -> schema::TallySelection {
        let shares = secrets
            .iter()
            .map(|row| {
                let share = alpha.exp(&row[0]);
                let proof = self.chaum_pedersen_proof(alpha, &row[0]);
                schema::Share {
                    share: share.value().to_string(),
                    proof,
                }
            })
            .collect();
        let decrypted = self.group.generator().exp_int(&BigInt::from(votes));
        schema::TallySelection {
            encrypted_tally: schema::Message {
                public_key: alpha.value().to_string(),
                ciphertext: beta.value().to_string(),
            },
            decrypted_tally: decrypted.value().to_string(),
            shares,
            cleartext: votes.to_string(),
        }
    }
}
