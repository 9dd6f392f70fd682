use phase2::{
    compute_challenge,
    compute_response,
    create_keypair,
    dummy_phase2,
    finalize,
    is_well_formed,
    read_keypair,
    verify_response,
    verify_transcript,
    write_keypair,
    Challenge,
    Environment,
    PublicKey,
    Response,
};
use setup_utils::{CheckForCorrectness, Error};
use test_helpers::{run_contributions, setup_ceremony, CubicCircuit};

use ark_bls12_377::Bls12_377;
use ark_bn254::{Bn254, Fr};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::One;
use ark_groth16::{Groth16, ProvingKey};
use ark_snark::SNARK;
use ark_std::UniformRand;
use rand::thread_rng;

// the cubic circuit fits a domain of 8, which needs 15 powers in G1
const POWERS: usize = 16;

fn prove_and_verify<E: Pairing>(pk: &ProvingKey<E>) {
    let rng = &mut thread_rng();
    // x = 1 gives y = 12
    let proof = Groth16::<E>::prove(pk, CubicCircuit::new(E::ScalarField::one()), rng).unwrap();
    assert!(Groth16::<E>::verify(&pk.vk, &[E::ScalarField::from(12u64)], &proof).unwrap());
    assert!(!Groth16::<E>::verify(&pk.vk, &[E::ScalarField::from(13u64)], &proof).unwrap());
}

fn full_ceremony<E: Pairing>() {
    let rng = &mut thread_rng();
    let setup = setup_ceremony::<E>(POWERS);
    let contributions = (0..3).map(|_| E::ScalarField::rand(rng)).collect::<Vec<_>>();
    let (responses, transcript) = run_contributions(&setup.challenge, &contributions);

    // every response is checked before it becomes the next challenge
    let mut challenge = setup.challenge.clone();
    for response in &responses {
        assert!(verify_response(&challenge, response).unwrap());
        challenge = compute_challenge(response);
    }

    let summary = verify_transcript::<E, _>(
        setup.challenge.transcript_digest,
        setup.challenge.accumulator.delta_g1,
        &transcript[..],
        Some(&responses[1].transcript_digest),
    )
    .unwrap();
    assert!(summary.is_valid);
    assert!(summary.contribution_found);
    assert_eq!(summary.final_digest, challenge.transcript_digest);
    let product = contributions.iter().product::<E::ScalarField>();
    assert_eq!(
        summary.final_delta_g1,
        (E::G1Affine::generator() * product).into_affine()
    );
    finalize(&setup.challenge, &challenge, &summary).unwrap();

    let pk = create_keypair(&setup.powers, &setup.lin_comb, &challenge.accumulator, &setup.qap).unwrap();
    is_well_formed(&pk, &setup.qap).unwrap();
    prove_and_verify(&pk);

    let mut buf = vec![];
    write_keypair(&mut buf, &pk).unwrap();
    let pk = read_keypair::<E, _>(&buf[..], CheckForCorrectness::Full).unwrap();
    prove_and_verify(&pk);
}

#[test]
fn test_full_ceremony_bn254() {
    full_ceremony::<Bn254>()
}

#[test]
fn test_full_ceremony_bls12_377() {
    full_ceremony::<Bls12_377>()
}

#[test]
fn test_dummy_phase2_proves() {
    let rng = &mut thread_rng();
    let setup = setup_ceremony::<Bn254>(POWERS);
    let challenge = dummy_phase2(&setup.lin_comb, &Fr::rand(rng), setup.qap.num_instance_variables).unwrap();
    let pk = create_keypair(&setup.powers, &setup.lin_comb, &challenge.accumulator, &setup.qap).unwrap();
    is_well_formed(&pk, &setup.qap).unwrap();
    prove_and_verify(&pk);
}

#[test]
fn test_flipping_any_transcript_byte_is_detected() {
    let rng = &mut thread_rng();
    let setup = setup_ceremony::<Bn254>(POWERS);
    let contributions = (0..3).map(|_| Fr::rand(rng)).collect::<Vec<_>>();
    let (_, transcript) = run_contributions(&setup.challenge, &contributions);
    assert_eq!(transcript.len(), 3 * PublicKey::<Bn254>::size());

    for i in 0..transcript.len() {
        let mut tampered = transcript.clone();
        tampered[i] ^= 1 << (i % 8);
        let summary = verify_transcript::<Bn254, _>(
            setup.challenge.transcript_digest,
            setup.challenge.accumulator.delta_g1,
            &tampered[..],
            None,
        )
        .unwrap();
        assert!(!summary.is_valid, "flipping byte {} went unnoticed", i);
    }
}

#[test]
fn test_contribution_against_the_wrong_digest_is_detected() {
    let rng = &mut thread_rng();
    let setup = setup_ceremony::<Bn254>(POWERS);
    let (responses, mut transcript) = run_contributions(&setup.challenge, &[Fr::rand(rng)]);

    // contributes on top of the right accumulator but with a stale digest
    let stale = Challenge {
        accumulator: responses[0].accumulator.clone(),
        transcript_digest: setup.challenge.transcript_digest,
    };
    let response = compute_response(&stale, &Fr::rand(rng), rng).unwrap();
    assert!(!verify_response(&compute_challenge(&responses[0]), &response).unwrap());
    response.public_key.write(&mut transcript).unwrap();

    let summary = verify_transcript::<Bn254, _>(
        setup.challenge.transcript_digest,
        setup.challenge.accumulator.delta_g1,
        &transcript[..],
        Some(&response.transcript_digest),
    )
    .unwrap();
    assert!(!summary.is_valid);
    assert!(!summary.contribution_found);
    assert_eq!(summary.final_digest, responses[0].transcript_digest);
}

#[test]
fn test_files_round_trip_through_the_environment() {
    let rng = &mut thread_rng();
    let env = Environment::bls12_377();
    let setup = setup_ceremony::<Bls12_377>(8);

    let mut buf = vec![];
    setup.challenge.write(&mut buf).unwrap();
    assert_eq!(Challenge::read(&env, &buf[..]).unwrap(), setup.challenge);

    let contribution = <Bls12_377 as Pairing>::ScalarField::rand(rng);
    let response = compute_response(&setup.challenge, &contribution, rng).unwrap();
    let mut buf = vec![];
    response.write(&mut buf).unwrap();
    let read = Response::read(&env, &buf[..]).unwrap();
    assert!(verify_response(&setup.challenge, &read).unwrap());
}

#[test]
fn test_keypair_from_another_ceremony_is_refused() {
    let rng = &mut thread_rng();
    let first = setup_ceremony::<Bn254>(POWERS);
    let second = setup_ceremony::<Bn254>(POWERS);
    let (responses, _) = run_contributions(&second.challenge, &[Fr::rand(rng)]);
    assert!(matches!(
        create_keypair(&first.powers, &first.lin_comb, &responses[0].accumulator, &first.qap),
        Err(Error::CircuitMismatch { .. })
    ));
    assert!(matches!(
        verify_response(&first.challenge, &responses[0]),
        Err(Error::CircuitMismatch { .. })
    ));
}
