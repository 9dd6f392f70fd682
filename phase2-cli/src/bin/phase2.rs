use phase2::Environment;
use phase2_cli::*;
use setup_utils::CurveKind;

use anyhow::Result;
use ark_ec::pairing::Pairing;
use gumdrop::Options;
use rand::thread_rng;
use std::{process, time::Instant};
use tracing::{error, info};
use tracing_subscriber::{
    filter::EnvFilter,
    fmt::{time::UtcTime, Subscriber},
};

fn execute_cmd<E: Pairing>(opts: Phase2Opts, env: Environment<E>) -> Result<()> {
    let command = opts.clone().command.unwrap_or_else(|| {
        error!("No command was provided.");
        error!("{}", Phase2Opts::usage());
        process::exit(2)
    });

    let now = Instant::now();

    let contribute_env = |env: Environment<E>| {
        env.with_correctness_check(opts.correctness_check(DEFAULT_CONTRIBUTE_CHECK_INPUT_CORRECTNESS))
    };
    let verify_env =
        |env: Environment<E>| env.with_correctness_check(opts.correctness_check(DEFAULT_VERIFY_CHECK_INPUT_CORRECTNESS));

    match command {
        Command::DummyPowersoftau(opt) => dummy_powersoftau(&env, &opt)?,
        Command::Lagrange(opt) => lagrange(&verify_env(env), &opt)?,
        Command::LinearCombination(opt) => linear_combination(&verify_env(env), &opt)?,
        Command::Begin(opt) => begin(&verify_env(env), &opt)?,
        Command::Contribute(opt) => contribute(&contribute_env(env), &opt, &mut thread_rng())?,
        Command::VerifyContribution(opt) => verify_contribution(&verify_env(env), &opt)?,
        Command::VerifyTranscript(opt) => verify_transcript(&verify_env(env), &opt)?,
        Command::CreateKeypair(opt) => create_keypair(&verify_env(env), &opt)?,
        Command::DummyPhase2(opt) => dummy_phase2(&verify_env(env), &opt, &mut thread_rng())?,
    };

    let new_now = Instant::now();
    info!("Executing {:?} took: {:?}", opts, new_now.duration_since(now));
    Ok(())
}

fn main() {
    Subscriber::builder()
        .with_target(false)
        .with_timer(UtcTime::rfc_3339())
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts: Phase2Opts = Phase2Opts::parse_args_default_or_exit();

    let result = match opts.curve_kind {
        CurveKind::Bn254 => execute_cmd(opts, Environment::bn254()),
        CurveKind::Bls12_377 => execute_cmd(opts, Environment::bls12_377()),
    };
    if let Err(e) = result {
        error!("{:#}", e);
        process::exit(1);
    }
}
