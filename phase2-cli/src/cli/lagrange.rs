use crate::cli::{create_file, map_file, read_circuit};
use phase2::{Environment, LagrangeEvaluations, PowersOfTau};

use anyhow::Result;
use ark_ec::pairing::Pairing;
use gumdrop::Options;
use std::io::Write;
use tracing::info;

#[derive(Debug, Options, Clone)]
pub struct LagrangeOpts {
    help: bool,
    #[options(help = "the powers of tau file", default = "powersoftau")]
    pub powers_fname: String,
    #[options(help = "the number of powers in G2 held by the powers of tau file", default = "1024")]
    pub degree: usize,
    #[options(help = "the circuit file", default = "circuit")]
    pub circuit_fname: String,
    #[options(help = "the Lagrange evaluations file to be created", default = "lagrange")]
    pub lagrange_fname: String,
}

pub fn lagrange<E: Pairing>(env: &Environment<E>, opts: &LagrangeOpts) -> Result<()> {
    let map = map_file(&opts.powers_fname)?;
    let powers = PowersOfTau::<E>::read(env, &map[..], opts.degree)?;
    let qap = read_circuit::<E::ScalarField>(&opts.circuit_fname)?;

    let lagrange = LagrangeEvaluations::from_powers_of_tau(&powers, qap.domain_size())?;
    let mut file = create_file(&opts.lagrange_fname)?;
    lagrange.write(&mut file)?;
    file.flush()?;
    info!("wrote {} Lagrange evaluations to {}", lagrange.degree(), opts.lagrange_fname);
    Ok(())
}
