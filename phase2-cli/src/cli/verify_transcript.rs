use crate::cli::map_file;
use phase2::{finalize, verify_transcript as replay_transcript, Challenge, Environment};
use setup_utils::{log_hash, read_hash_text};

use anyhow::{bail, Result};
use ark_ec::pairing::Pairing;
use fs_err::File;
use gumdrop::Options;
use std::io::BufReader;
use tracing::{info, warn};

#[derive(Debug, Options, Clone)]
pub struct VerifyTranscriptOpts {
    help: bool,
    #[options(help = "the first challenge of the ceremony", default = "challenge")]
    pub initial_challenge_fname: String,
    #[options(help = "the transcript of all the contributions", default = "transcript")]
    pub transcript_fname: String,
    #[options(help = "the last challenge of the ceremony", default = "final_challenge")]
    pub final_challenge_fname: String,
    #[options(help = "a contribution hash file to look for in the transcript")]
    pub contribution_hash_fname: Option<String>,
}

pub fn verify_transcript<E: Pairing>(env: &Environment<E>, opts: &VerifyTranscriptOpts) -> Result<()> {
    let initial_map = map_file(&opts.initial_challenge_fname)?;
    let initial = Challenge::<E>::read(env, &initial_map[..])?;
    let final_map = map_file(&opts.final_challenge_fname)?;
    let last = Challenge::<E>::read(env, &final_map[..])?;
    let contribution = match &opts.contribution_hash_fname {
        Some(path) => Some(read_hash_text(&map_file(path)?[..])?),
        None => None,
    };

    let transcript = BufReader::new(File::open(&opts.transcript_fname)?);
    let summary = replay_transcript::<E, _>(
        initial.transcript_digest,
        initial.accumulator.delta_g1,
        transcript,
        contribution.as_ref(),
    )?;
    if !summary.is_valid {
        bail!("the transcript {} is invalid", opts.transcript_fname);
    }
    finalize(&initial, &last, &summary)?;

    if let Some(hash) = &contribution {
        if summary.contribution_found {
            info!("the contribution is part of the transcript:");
            log_hash(hash);
        } else {
            warn!("the contribution was not found in the transcript");
            bail!("contribution not found");
        }
    }
    info!("the transcript is valid");
    Ok(())
}
