//! Verifier for ElectionGuard v0.85 election records.
//!
//! A record is a single JSON document carrying the election parameters,
//! trustee key commitments, cast ballots, homomorphic contest tallies and
//! spoiled ballots. [`verify::verify_election`] walks the record and emits
//! one named predicate per checkable claim into a [`verify::Recorder`];
//! the aggregate outcome is the audit trail.
//!
//! The arithmetic in this crate is **not** constant-time. Verification
//! only ever touches public values, so this is fine for its purpose, but
//! none of the primitives here are suitable where side-channel adversaries
//! matter.

pub mod algebra;
pub mod biginteger;
pub mod bytetree;
pub mod errors;
pub mod params;
pub mod records;
pub mod schema;
pub mod sigma;
pub mod verify;
