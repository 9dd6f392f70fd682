use crate::cli::{create_file, map_file, read_circuit};
use phase2::{
    create_keypair as assemble,
    is_well_formed,
    write_keypair,
    Challenge,
    Environment,
    LinearCombination,
    PowersOfTau,
};

use anyhow::Result;
use ark_ec::pairing::Pairing;
use gumdrop::Options;
use std::io::Write;
use tracing::info;

#[derive(Debug, Options, Clone)]
pub struct CreateKeypairOpts {
    help: bool,
    #[options(help = "the powers of tau file", default = "powersoftau")]
    pub powers_fname: String,
    #[options(help = "the number of powers in G2 held by the powers of tau file", default = "1024")]
    pub degree: usize,
    #[options(help = "the linear combination file", default = "linear_combination")]
    pub lin_comb_fname: String,
    #[options(help = "the circuit file", default = "circuit")]
    pub circuit_fname: String,
    #[options(help = "the last challenge of the ceremony", default = "final_challenge")]
    pub final_challenge_fname: String,
    #[options(help = "the keypair file to be created", default = "keypair")]
    pub keypair_fname: String,
}

pub fn create_keypair<E: Pairing>(env: &Environment<E>, opts: &CreateKeypairOpts) -> Result<()> {
    let powers_map = map_file(&opts.powers_fname)?;
    let powers = PowersOfTau::<E>::read(env, &powers_map[..], opts.degree)?;
    let lin_comb_map = map_file(&opts.lin_comb_fname)?;
    let lin_comb = LinearCombination::<E>::read(&lin_comb_map[..], env.check_input_for_correctness)?;
    let qap = read_circuit::<E::ScalarField>(&opts.circuit_fname)?;
    let challenge_map = map_file(&opts.final_challenge_fname)?;
    let challenge = Challenge::<E>::read(env, &challenge_map[..])?;

    let pk = assemble(&powers, &lin_comb, &challenge.accumulator, &qap)?;
    is_well_formed(&pk, &qap)?;

    let mut file = create_file(&opts.keypair_fname)?;
    write_keypair(&mut file, &pk)?;
    file.flush()?;
    info!("wrote the keypair to {}", opts.keypair_fname);
    Ok(())
}
