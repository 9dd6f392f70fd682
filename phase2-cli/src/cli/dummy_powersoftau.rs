use crate::cli::create_file;
use phase2::{Environment, PowersOfTau};
use setup_utils::contribution_from_entropy;

use anyhow::{ensure, Context, Result};
use ark_ec::pairing::Pairing;
use gumdrop::Options;
use std::io::Write;
use tracing::info;

#[derive(Debug, Options, Clone)]
pub struct DummyPowersOfTauOpts {
    help: bool,
    #[options(help = "the powers of tau file to be created", default = "powersoftau")]
    pub powers_fname: String,
    #[options(help = "the number of powers in G2", default = "1024")]
    pub degree: usize,
    #[options(help = "hex seed the trapdoors are derived from", default = "00")]
    pub seed: String,
}

pub fn dummy_powersoftau<E: Pairing>(env: &Environment<E>, opts: &DummyPowersOfTauOpts) -> Result<()> {
    ensure!(opts.degree >= 2, "the degree must be at least 2, got {}", opts.degree);
    let seed = hex::decode(opts.seed.trim()).context("seed should be a hex string")?;
    let trapdoor = |label: &[u8]| contribution_from_entropy::<E::ScalarField>(&[&seed[..], label].concat());
    let powers = PowersOfTau::<E>::dummy(opts.degree, trapdoor(b"tau")?, trapdoor(b"alpha")?, trapdoor(b"beta")?);

    let mut file = create_file(&opts.powers_fname)?;
    powers.write(env, &mut file)?;
    file.flush()?;
    info!("wrote {} powers of tau to {}", opts.degree, opts.powers_fname);
    Ok(())
}
