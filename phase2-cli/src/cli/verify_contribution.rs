use crate::cli::{append_file, create_file, map_file, write_hash_file};
use phase2::{compute_challenge, verify_response, Challenge, Environment, Response};

use anyhow::{bail, Context, Result};
use ark_ec::pairing::Pairing;
use gumdrop::Options;
use std::io::Write;
use tracing::info;

#[derive(Debug, Options, Clone)]
pub struct VerifyContributionOpts {
    help: bool,
    #[options(help = "the provided challenge file", default = "challenge")]
    pub challenge_fname: String,
    #[options(help = "the provided response file which will be verified", default = "response")]
    pub response_fname: String,
    #[options(help = "the transcript the contribution is appended to", default = "transcript")]
    pub transcript_fname: String,
    #[options(help = "the new challenge file to be created", default = "new_challenge")]
    pub new_challenge_fname: String,
    #[options(help = "the new challenge file hash", default = "new_challenge.hash")]
    pub new_challenge_hash_fname: String,
}

pub fn verify_contribution<E: Pairing>(env: &Environment<E>, opts: &VerifyContributionOpts) -> Result<()> {
    let challenge_map = map_file(&opts.challenge_fname)?;
    let challenge = Challenge::<E>::read(env, &challenge_map[..])
        .with_context(|| format!("could not read the challenge {}", opts.challenge_fname))?;
    let response_map = map_file(&opts.response_fname)?;
    let response = Response::<E>::read(env, &response_map[..])
        .with_context(|| format!("could not read the response {}", opts.response_fname))?;

    if !verify_response(&challenge, &response)? {
        bail!("the response {} is not a valid contribution", opts.response_fname);
    }
    info!("the response is valid");

    let mut transcript = append_file(&opts.transcript_fname)?;
    response.public_key.write(&mut transcript)?;
    transcript.flush()?;

    let next = compute_challenge(&response);
    let mut file = create_file(&opts.new_challenge_fname)?;
    next.write(&mut file)?;
    write_hash_file(&opts.new_challenge_hash_fname, "new challenge digest", &next.transcript_digest)
}
