use std::str::FromStr;
use std::sync::Arc;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::algebra::{
    ExpHom, FieldElement, GroupElement, GroupElt, ModPGroup, PPGroup, PrimeField, ProductElement,
};
use crate::biginteger::BigInt;
use crate::bytetree::ByteTree;

use super::{challenge, SchnorrProof, SchnorrVerifier, SigmaOr};

const TEST_P: &str = "18446744073709554719";
const TEST_Q: &str = "9223372036854777359";

fn test_rng() -> StdRng {
    StdRng::seed_from_u64(0x516a)
}

fn test_group() -> Arc<ModPGroup> {
    ModPGroup::new(
        BigInt::from_str(TEST_P).unwrap(),
        BigInt::from_str(TEST_Q).unwrap(),
        BigInt::from(4u32),
    )
}

fn random_scalar(rng: &mut StdRng, field: &Arc<PrimeField>) -> FieldElement {
    field.element_reduced(&BigInt::from(rng.gen::<u64>()))
}

/// Honest prover for the plain Schnorr relation Y = g^x.
fn schnorr_prove(
    rng: &mut StdRng,
    hom: &ExpHom<GroupElement>,
    witness: &FieldElement,
    label: &[u8],
) -> (GroupElement, SchnorrProof<GroupElement>) {
    let instance = hom.eva(witness);
    let nonce = random_scalar(rng, hom.domain());
    let commitment = hom.eva(&nonce);
    let c = challenge(
        hom.domain(),
        label,
        &instance.to_byte_tree(),
        &commitment.to_byte_tree(),
    );
    let response = &nonce + &(&c * witness);
    (
        instance,
        SchnorrProof {
            commitment,
            challenge: c,
            response,
        },
    )
}

/// Honest prover over a product basis (the Chaum–Pedersen shape).
fn paired_prove(
    rng: &mut StdRng,
    hom: &ExpHom<ProductElement>,
    witness: &FieldElement,
    label: &[u8],
) -> (ProductElement, SchnorrProof<ProductElement>) {
    let instance = hom.eva(witness);
    let nonce = random_scalar(rng, hom.domain());
    let commitment = hom.eva(&nonce);
    let c = challenge(
        hom.domain(),
        label,
        &instance.to_byte_tree(),
        &commitment.to_byte_tree(),
    );
    let response = &nonce + &(&c * witness);
    (
        instance,
        SchnorrProof {
            commitment,
            challenge: c,
            response,
        },
    )
}

/// CDS prover: real witness for `real` among the two instances, simulated
/// transcript for the other branch.
fn or_prove(
    rng: &mut StdRng,
    hom: &ExpHom<ProductElement>,
    instances: &[ProductElement; 2],
    real: usize,
    witness: &FieldElement,
    label: &[u8],
) -> [SchnorrProof<ProductElement>; 2] {
    let field = hom.domain();
    let fake = 1 - real;

    let fake_challenge = random_scalar(rng, field);
    let fake_response = random_scalar(rng, field);
    // basis^z · Y^{-c} makes the fake equation hold by construction.
    let fake_commitment = hom
        .eva(&fake_response)
        .mul(&instances[fake].exp(&fake_challenge).inv());

    let nonce = random_scalar(rng, field);
    let real_commitment = hom.eva(&nonce);

    let mut commitments = [fake_commitment.clone(), fake_commitment];
    commitments[real] = real_commitment;

    let instance_vector = ByteTree::node(instances.iter().map(GroupElt::to_byte_tree).collect());
    let commitment_vector = ByteTree::node(commitments.iter().map(GroupElt::to_byte_tree).collect());
    let total = challenge(field, label, &instance_vector, &commitment_vector);
    let real_challenge = &total - &fake_challenge;
    let real_response = &nonce + &(&real_challenge * witness);

    let mut challenges = [fake_challenge.clone(), fake_challenge];
    challenges[real] = real_challenge;
    let mut responses = [fake_response.clone(), fake_response];
    responses[real] = real_response;

    let [c0, c1] = commitments;
    let [e0, e1] = challenges;
    let [z0, z1] = responses;
    [
        SchnorrProof {
            commitment: c0,
            challenge: e0,
            response: z0,
        },
        SchnorrProof {
            commitment: c1,
            challenge: e1,
            response: z1,
        },
    ]
}

fn bump(x: &FieldElement) -> FieldElement {
    x + &x.field().one()
}

#[test]
fn honest_schnorr_transcript_verifies() {
    let mut rng = test_rng();
    let group = test_group();
    let hom = ExpHom::new(group.field().clone(), group.generator());
    let verifier = SchnorrVerifier::new(hom.clone());
    let witness = random_scalar(&mut rng, group.field());
    let (instance, proof) = schnorr_prove(&mut rng, &hom, &witness, b"test");
    assert!(verifier.verify(b"test", &instance, &proof));
}

#[test]
fn schnorr_rejects_any_tampering() {
    let mut rng = test_rng();
    let group = test_group();
    let hom = ExpHom::new(group.field().clone(), group.generator());
    let verifier = SchnorrVerifier::new(hom.clone());
    let witness = random_scalar(&mut rng, group.field());
    let (instance, proof) = schnorr_prove(&mut rng, &hom, &witness, b"test");

    let wrong_instance = instance.mul(&group.generator());
    assert!(!verifier.verify(b"test", &wrong_instance, &proof));

    let mut tampered = proof.clone();
    tampered.commitment = tampered.commitment.mul(&group.generator());
    assert!(!verifier.verify(b"test", &instance, &tampered));

    let mut tampered = proof.clone();
    tampered.challenge = bump(&tampered.challenge);
    assert!(!verifier.verify(b"test", &instance, &tampered));

    let mut tampered = proof.clone();
    tampered.response = bump(&tampered.response);
    assert!(!verifier.verify(b"test", &instance, &tampered));

    // Same transcript under a different label re-derives a different
    // challenge.
    assert!(!verifier.verify(b"other", &instance, &proof));
}

#[test]
fn honest_chaum_pedersen_transcript_verifies() {
    let mut rng = test_rng();
    let group = test_group();
    let pair = PPGroup::power(&group, 2);
    let k = group
        .generator()
        .exp(&random_scalar(&mut rng, group.field()));
    let basis = pair.prod(vec![group.generator(), k]);
    let hom = ExpHom::new(group.field().clone(), basis);
    let verifier = SchnorrVerifier::new(hom.clone());

    let witness = random_scalar(&mut rng, group.field());
    let (instance, proof) = paired_prove(&mut rng, &hom, &witness, b"cp");
    assert!(verifier.verify(b"cp", &instance, &proof));

    let mut tampered = proof.clone();
    tampered.response = bump(&tampered.response);
    assert!(!verifier.verify(b"cp", &instance, &tampered));

    let skewed = pair.prod(vec![
        instance.component(0).mul(&group.generator()),
        instance.component(1).clone(),
    ]);
    assert!(!verifier.verify(b"cp", &skewed, &proof));
}

#[test]
fn sigma_or_accepts_either_true_branch() {
    let mut rng = test_rng();
    let group = test_group();
    let pair = PPGroup::power(&group, 2);
    let k = group
        .generator()
        .exp(&random_scalar(&mut rng, group.field()));
    let basis = pair.prod(vec![group.generator(), k.clone()]);
    let hom = ExpHom::new(group.field().clone(), basis);
    let composition = SigmaOr::new(vec![
        SchnorrVerifier::new(hom.clone()),
        SchnorrVerifier::new(hom.clone()),
    ]);

    for real in [0usize, 1] {
        let witness = random_scalar(&mut rng, group.field());
        let truthful = hom.eva(&witness);
        // The other statement has no known witness; any unrelated pair of
        // subgroup members will do.
        let decoy = hom.eva(&random_scalar(&mut rng, group.field()));
        let decoy = decoy.mul(&pair.broadcast(&group.generator()));

        let mut instances = [decoy.clone(), decoy];
        instances[real] = truthful;
        let proofs = or_prove(&mut rng, &hom, &instances, real, &witness, b"or");
        assert!(composition.verify(b"or", &instances, &proofs));
        assert_eq!(composition.branch_results(&instances, &proofs), vec![true, true]);
    }
}

#[test]
fn sigma_or_rejects_subchallenge_tampering() {
    let mut rng = test_rng();
    let group = test_group();
    let pair = PPGroup::power(&group, 2);
    let basis = pair.prod(vec![
        group.generator(),
        group
            .generator()
            .exp(&random_scalar(&mut rng, group.field())),
    ]);
    let hom = ExpHom::new(group.field().clone(), basis);
    let composition = SigmaOr::new(vec![
        SchnorrVerifier::new(hom.clone()),
        SchnorrVerifier::new(hom.clone()),
    ]);

    let witness = random_scalar(&mut rng, group.field());
    let truthful = hom.eva(&witness);
    let decoy = hom
        .eva(&random_scalar(&mut rng, group.field()))
        .mul(&pair.broadcast(&group.generator()));
    let instances = [truthful, decoy];
    let proofs = or_prove(&mut rng, &hom, &instances, 0, &witness, b"or");

    // Shifting one subchallenge breaks that branch's equation.
    let mut tampered = proofs.clone();
    tampered[0].challenge = bump(&tampered[0].challenge);
    assert!(!composition.verify(b"or", &instances, &tampered));

    // Shifting both subchallenges so the equations stay balanced is not
    // possible without the witness, but even a compensating shift of the
    // responses leaves the challenge sum intact and the equations broken.
    let mut tampered = proofs.clone();
    tampered[0].response = bump(&tampered[0].response);
    assert!(!composition.verify(b"or", &instances, &tampered));

    // Mismatched arity is rejected outright.
    assert!(!composition.verify(b"or", &instances[..1], &proofs));
}

#[test]
fn sigma_or_rejects_two_false_branches() {
    let mut rng = test_rng();
    let group = test_group();
    let pair = PPGroup::power(&group, 2);
    let basis = pair.prod(vec![
        group.generator(),
        group
            .generator()
            .exp(&random_scalar(&mut rng, group.field())),
    ]);
    let hom = ExpHom::new(group.field().clone(), basis);
    let composition = SigmaOr::new(vec![
        SchnorrVerifier::new(hom.clone()),
        SchnorrVerifier::new(hom.clone()),
    ]);

    // Prove branch 0 honestly, then swap the instances so neither
    // statement matches its transcript.
    let witness = random_scalar(&mut rng, group.field());
    let truthful = hom.eva(&witness);
    let decoy = hom
        .eva(&random_scalar(&mut rng, group.field()))
        .mul(&pair.broadcast(&group.generator()));
    let instances = [truthful, decoy];
    let proofs = or_prove(&mut rng, &hom, &instances, 0, &witness, b"or");
    let swapped = [instances[1].clone(), instances[0].clone()];
    assert!(!composition.verify(b"or", &swapped, &proofs));
}

#[test]
fn challenge_is_deterministic_and_label_separated() {
    let group = test_group();
    let field = group.field();
    let instance = group.generator().to_byte_tree();
    let commitment = group.one().to_byte_tree();
    let a = challenge(field, b"label-a", &instance, &commitment);
    let b = challenge(field, b"label-a", &instance, &commitment);
    let c = challenge(field, b"label-b", &instance, &commitment);
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn proof_byte_tree_carries_three_children() {
    let mut rng = test_rng();
    let group = test_group();
    let hom = ExpHom::new(group.field().clone(), group.generator());
    let witness = random_scalar(&mut rng, group.field());
    let (_, proof) = schnorr_prove(&mut rng, &hom, &witness, b"shape");
    match proof.to_byte_tree() {
        ByteTree::Node(children) => assert_eq!(children.len(), 3),
        ByteTree::Leaf(_) => panic!("proof must serialize to a node"),
    }
}
