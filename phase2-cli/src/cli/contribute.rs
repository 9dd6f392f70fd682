use crate::cli::{create_file, map_file, write_hash_file};
use phase2::{compute_response, Challenge, Environment};
use setup_utils::contribution_from_entropy;

use anyhow::{Context, Result};
use ark_ec::pairing::Pairing;
use gumdrop::Options;
use rand::{rngs::OsRng, Rng, RngCore};
use std::io::Write;

// bytes drawn from the system randomness for each contribution
const SYSTEM_ENTROPY_SIZE: usize = 1024;

#[derive(Debug, Options, Clone)]
pub struct ContributeOpts {
    help: bool,
    #[options(help = "the provided challenge file", default = "challenge")]
    pub challenge_fname: String,
    #[options(help = "the response file which will be generated", default = "response")]
    pub response_fname: String,
    #[options(help = "the response file hash", default = "response.hash")]
    pub response_hash_fname: String,
    #[options(help = "extra text mixed into the system randomness")]
    pub entropy: Option<String>,
}

pub fn contribute<E: Pairing, R: Rng>(env: &Environment<E>, opts: &ContributeOpts, rng: &mut R) -> Result<()> {
    let map = map_file(&opts.challenge_fname)?;
    let challenge = Challenge::<E>::read(env, &map[..])
        .with_context(|| format!("could not read the challenge {}", opts.challenge_fname))?;

    let mut entropy = vec![0u8; SYSTEM_ENTROPY_SIZE];
    OsRng.fill_bytes(&mut entropy);
    if let Some(text) = &opts.entropy {
        entropy.extend_from_slice(text.as_bytes());
    }
    let contribution = contribution_from_entropy::<E::ScalarField>(&entropy)?;

    let response = compute_response(&challenge, &contribution, rng)?;

    let mut file = create_file(&opts.response_fname)?;
    response.write(&mut file)?;
    file.flush()?;
    write_hash_file(&opts.response_hash_fname, "response digest", &response.transcript_digest)
}
