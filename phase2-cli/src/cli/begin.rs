use crate::cli::{create_file, map_file, read_circuit, write_hash_file};
use phase2::{initial_challenge, Environment, LinearCombination, Phase2Accumulator};

use anyhow::Result;
use ark_ec::pairing::Pairing;
use gumdrop::Options;

#[derive(Debug, Options, Clone)]
pub struct BeginOpts {
    help: bool,
    #[options(help = "the linear combination file", default = "linear_combination")]
    pub lin_comb_fname: String,
    #[options(help = "the circuit file", default = "circuit")]
    pub circuit_fname: String,
    #[options(help = "the challenge file name to be created", default = "challenge")]
    pub challenge_fname: String,
    #[options(help = "the new challenge file hash", default = "challenge.hash")]
    pub challenge_hash_fname: String,
}

pub fn begin<E: Pairing>(env: &Environment<E>, opts: &BeginOpts) -> Result<()> {
    let map = map_file(&opts.lin_comb_fname)?;
    let lin_comb = LinearCombination::<E>::read(&map[..], env.check_input_for_correctness)?;
    let qap = read_circuit::<E::ScalarField>(&opts.circuit_fname)?;

    let accumulator = Phase2Accumulator::begin(lin_comb.hash()?, &lin_comb, qap.num_instance_variables)?;
    let challenge = initial_challenge(accumulator)?;
    let mut file = create_file(&opts.challenge_fname)?;
    challenge.write(&mut file)?;
    write_hash_file(&opts.challenge_hash_fname, "challenge digest", &challenge.transcript_digest)
}
