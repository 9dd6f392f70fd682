use crate::cli::{create_file, map_file, read_circuit, write_hash_file};
use phase2::{dummy_phase2 as run_dummy_phase2, Environment, LinearCombination};

use anyhow::Result;
use ark_ec::pairing::Pairing;
use ark_std::UniformRand;
use gumdrop::Options;
use rand::Rng;

#[derive(Debug, Options, Clone)]
pub struct DummyPhase2Opts {
    help: bool,
    #[options(help = "the linear combination file", default = "linear_combination")]
    pub lin_comb_fname: String,
    #[options(help = "the circuit file", default = "circuit")]
    pub circuit_fname: String,
    #[options(help = "the final challenge file to be created", default = "final_challenge")]
    pub final_challenge_fname: String,
    #[options(help = "the final challenge file hash", default = "final_challenge.hash")]
    pub final_challenge_hash_fname: String,
}

pub fn dummy_phase2<E: Pairing, R: Rng>(env: &Environment<E>, opts: &DummyPhase2Opts, rng: &mut R) -> Result<()> {
    let map = map_file(&opts.lin_comb_fname)?;
    let lin_comb = LinearCombination::<E>::read(&map[..], env.check_input_for_correctness)?;
    let qap = read_circuit::<E::ScalarField>(&opts.circuit_fname)?;

    let delta = E::ScalarField::rand(rng);
    let challenge = run_dummy_phase2(&lin_comb, &delta, qap.num_instance_variables)?;
    let mut file = create_file(&opts.final_challenge_fname)?;
    challenge.write(&mut file)?;
    write_hash_file(
        &opts.final_challenge_hash_fname,
        "final challenge digest",
        &challenge.transcript_digest,
    )
}
