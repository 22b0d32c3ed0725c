//! Wire data model of the election record.
//!
//! One JSON document, fixed shape, with every big natural number carried
//! as a decimal string. serde gives the structural validation; turning the
//! strings into field and group elements is the records layer's job and
//! failures there become predicate failures, not parse aborts.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::StructuralError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectionRecord {
    pub parameters: Parameters,
    pub base_hash: String,
    pub trustee_public_keys: Vec<TrusteeKeys>,
    pub joint_public_key: String,
    pub extended_base_hash: String,
    #[serde(default)]
    pub cast_ballots: Vec<CastBallot>,
    #[serde(default)]
    pub contest_tallies: Vec<ContestTally>,
    #[serde(default)]
    pub spoiled_ballots: Vec<SpoiledBallot>,
}

impl ElectionRecord {
    pub fn from_json(json: &str) -> Result<Self, StructuralError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, StructuralError> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameters {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub location: String,
    pub num_trustees: u32,
    pub threshold: u32,
    pub prime: String,
    pub generator: String,
}

/// One trustee's row of polynomial coefficient commitments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrusteeKeys {
    pub coefficients: Vec<CoefficientCommitment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoefficientCommitment {
    pub public_key: String,
    pub proof: SchnorrProof,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchnorrProof {
    pub commitment: String,
    pub challenge: String,
    pub response: String,
}

/// An ElGamal pair (α, β) = (g^r, K^r · g^m).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub public_key: String,
    pub ciphertext: String,
}

/// A Chaum–Pedersen transcript; the commitment lives in G×G.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChaumPedersenProof {
    pub commitment: Message,
    pub challenge: String,
    pub response: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastBallot {
    #[serde(default)]
    pub ballot_info: String,
    pub contests: Vec<BallotContest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallotContest {
    pub max_selections: u32,
    pub selections: Vec<BallotSelection>,
    /// Proves that the homomorphic sum of the selections encrypts
    /// `max_selections`.
    pub num_selections_proof: ChaumPedersenProof,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallotSelection {
    pub message: Message,
    pub zero_proof: ChaumPedersenProof,
    pub one_proof: ChaumPedersenProof,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContestTally {
    pub selections: Vec<TallySelection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TallySelection {
    pub encrypted_tally: Message,
    /// The claimed plaintext exponentiation g^m.
    pub decrypted_tally: String,
    pub shares: Vec<Share>,
    pub cleartext: String,
}

/// A trustee's partial decryption M_i with its correctness proof.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Share {
    pub share: String,
    pub proof: ChaumPedersenProof,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpoiledBallot {
    #[serde(default)]
    pub ballot_info: String,
    pub contests: Vec<SpoiledContest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpoiledContest {
    pub max_selections: u32,
    pub selections: Vec<TallySelection>,
}
