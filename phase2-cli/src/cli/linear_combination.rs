use crate::cli::{create_file, map_file, read_circuit, write_hash_file};
use phase2::{Environment, LagrangeEvaluations, LinearCombination, PowersOfTau};

use anyhow::Result;
use ark_ec::pairing::Pairing;
use gumdrop::Options;
use std::io::Write;

#[derive(Debug, Options, Clone)]
pub struct LinearCombinationOpts {
    help: bool,
    #[options(help = "the powers of tau file", default = "powersoftau")]
    pub powers_fname: String,
    #[options(help = "the number of powers in G2 held by the powers of tau file", default = "1024")]
    pub degree: usize,
    #[options(help = "the Lagrange evaluations file", default = "lagrange")]
    pub lagrange_fname: String,
    #[options(help = "the circuit file", default = "circuit")]
    pub circuit_fname: String,
    #[options(help = "the linear combination file to be created", default = "linear_combination")]
    pub lin_comb_fname: String,
    #[options(help = "where the circuit hash is written", default = "circuit.hash")]
    pub cs_hash_fname: String,
}

pub fn linear_combination<E: Pairing>(env: &Environment<E>, opts: &LinearCombinationOpts) -> Result<()> {
    let powers_map = map_file(&opts.powers_fname)?;
    let powers = PowersOfTau::<E>::read(env, &powers_map[..], opts.degree)?;
    let lagrange_map = map_file(&opts.lagrange_fname)?;
    let lagrange = LagrangeEvaluations::<E>::read(&lagrange_map[..], env.check_input_for_correctness)?;
    let qap = read_circuit::<E::ScalarField>(&opts.circuit_fname)?;

    let lin_comb = LinearCombination::new(&powers, &lagrange, &qap)?;
    let mut file = create_file(&opts.lin_comb_fname)?;
    lin_comb.write(&mut file)?;
    file.flush()?;
    write_hash_file(&opts.cs_hash_fname, "circuit hash", &lin_comb.hash()?)
}
