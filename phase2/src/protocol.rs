//! Sequential rounds of the ceremony. Each participant takes the latest
//! challenge, contributes a secret factor and publishes a response, which is
//! checked before it becomes the next challenge.

use crate::{
    accumulator::update_is_consistent,
    CircuitQap,
    Environment,
    LagrangeEvaluations,
    LinearCombination,
    Phase2Accumulator,
    PowersOfTau,
    PublicKey,
};
use setup_utils::{
    log_hash,
    read_hash,
    write_element,
    Error,
    Hash,
    HashWriter,
    Result,
    UseCompression,
    ValidationError,
};

use ark_ec::pairing::Pairing;
use ark_ff::Zero;
use rand::Rng;
use std::io::{Read, Write};
use tracing::{debug, info, info_span, warn};

/// The accumulator a participant contributes to, with the digest of the
/// ceremony history so far.
#[derive(Clone, Debug, PartialEq)]
pub struct Challenge<E: Pairing> {
    pub accumulator: Phase2Accumulator<E>,
    pub transcript_digest: Hash,
}

impl<E: Pairing> Challenge<E> {
    /// `[accumulator][transcript_digest]`
    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        self.accumulator.write(&mut writer)?;
        writer.write_all(&self.transcript_digest)?;
        writer.flush()?;
        Ok(())
    }

    pub fn read<R: Read>(env: &Environment<E>, mut reader: R) -> Result<Self> {
        let accumulator = Phase2Accumulator::read(&mut reader, env.check_input_for_correctness)?;
        let transcript_digest = read_hash(&mut reader)?;
        Ok(Self {
            accumulator,
            transcript_digest,
        })
    }
}

/// A contribution: the updated accumulator, the public key proving it and
/// the digest extending the hash chain.
#[derive(Clone, Debug, PartialEq)]
pub struct Response<E: Pairing> {
    pub accumulator: Phase2Accumulator<E>,
    pub public_key: PublicKey<E>,
    pub transcript_digest: Hash,
}

impl<E: Pairing> Response<E> {
    /// `[accumulator][public key][transcript_digest]`
    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        self.accumulator.write(&mut writer)?;
        self.public_key.write(&mut writer)?;
        writer.write_all(&self.transcript_digest)?;
        writer.flush()?;
        Ok(())
    }

    pub fn read<R: Read>(env: &Environment<E>, mut reader: R) -> Result<Self> {
        let accumulator = Phase2Accumulator::read(&mut reader, env.check_input_for_correctness)?;
        let public_key = PublicKey::read(&mut reader, env.check_input_for_correctness)?;
        let transcript_digest = read_hash(&mut reader)?;
        Ok(Self {
            accumulator,
            public_key,
            transcript_digest,
        })
    }
}

/// Derives the circuit specific linear combination and the accumulator
/// before any contribution.
pub fn begin<E: Pairing>(
    powers: &PowersOfTau<E>,
    qap: &CircuitQap<E::ScalarField>,
) -> Result<(LinearCombination<E>, Phase2Accumulator<E>)> {
    let span = info_span!("phase2-begin");
    let _enter = span.enter();

    let lagrange = LagrangeEvaluations::from_powers_of_tau(powers, qap.domain_size())?;
    let lin_comb = LinearCombination::new(powers, &lagrange, qap)?;
    let cs_hash = lin_comb.hash()?;
    info!("circuit hash:");
    log_hash(&cs_hash);

    let accumulator = Phase2Accumulator::begin(cs_hash, &lin_comb, qap.num_instance_variables)?;
    Ok((lin_comb, accumulator))
}

/// The first challenge. Its digest is the hash of the accumulator itself.
pub fn initial_challenge<E: Pairing>(accumulator: Phase2Accumulator<E>) -> Result<Challenge<E>> {
    let transcript_digest = accumulator.hash()?;
    Ok(Challenge {
        accumulator,
        transcript_digest,
    })
}

/// Applies `contribution` to the challenge. The caller must forget the
/// contribution afterwards.
pub fn compute_response<E: Pairing, R: Rng>(
    challenge: &Challenge<E>,
    contribution: &E::ScalarField,
    rng: &mut R,
) -> Result<Response<E>> {
    let span = info_span!("phase2-contribute");
    let _enter = span.enter();

    if contribution.is_zero() {
        return Err(ValidationError::ZeroContribution.into());
    }
    let accumulator = challenge.accumulator.contribute(contribution)?;
    let public_key = PublicKey::new(challenge.transcript_digest, accumulator.delta_g1, contribution, rng)?;
    let transcript_digest = public_key.contribution_digest()?;
    info!("contribution digest:");
    log_hash(&transcript_digest);

    Ok(Response {
        accumulator,
        public_key,
        transcript_digest,
    })
}

/// Checks a response against the challenge it claims to answer. A response
/// for another circuit is an error, a bad contribution is `Ok(false)`.
pub fn verify_response<E: Pairing>(challenge: &Challenge<E>, response: &Response<E>) -> Result<bool> {
    let span = info_span!("phase2-verify-response");
    let _enter = span.enter();

    if challenge.accumulator.cs_hash != response.accumulator.cs_hash {
        return Err(Error::CircuitMismatch {
            expected: hex::encode(&challenge.accumulator.cs_hash[..]),
            found: hex::encode(&response.accumulator.cs_hash[..]),
        });
    }

    let public_key = &response.public_key;
    if public_key.transcript_digest != challenge.transcript_digest {
        warn!("the contribution was made against another transcript digest");
        return Ok(false);
    }
    if !public_key.verify_pok() {
        warn!("the proof of knowledge does not verify");
        return Ok(false);
    }
    if !public_key.verify_update(&challenge.accumulator.delta_g1) {
        warn!("delta was not updated by the proven factor");
        return Ok(false);
    }
    if response.accumulator.delta_g1 != public_key.new_delta_g1 {
        warn!("the accumulator delta differs from the public key");
        return Ok(false);
    }
    if response.transcript_digest != public_key.contribution_digest()? {
        warn!("the response digest does not extend the transcript");
        return Ok(false);
    }
    if !update_is_consistent(&challenge.accumulator, &response.accumulator) {
        return Ok(false);
    }

    debug!("response is valid");
    Ok(true)
}

/// The challenge for the next participant, built from a verified response.
pub fn compute_challenge<E: Pairing>(response: &Response<E>) -> Challenge<E> {
    Challenge {
        accumulator: response.accumulator.clone(),
        transcript_digest: response.transcript_digest,
    }
}

/// Runs a whole ceremony with a single known contribution `delta`. Whoever
/// calls it knows the toxic waste, so it is only useful for testing.
pub fn dummy_phase2<E: Pairing>(
    lin_comb: &LinearCombination<E>,
    delta: &E::ScalarField,
    num_inputs: usize,
) -> Result<Challenge<E>> {
    let accumulator = Phase2Accumulator::begin(lin_comb.hash()?, lin_comb, num_inputs)?;
    let challenge = initial_challenge(accumulator)?;
    let accumulator = challenge.accumulator.contribute(delta)?;

    let mut hasher = HashWriter::sink();
    hasher.update(&challenge.transcript_digest);
    write_element(&mut hasher, &accumulator.delta_g1, UseCompression::Yes)?;
    Ok(Challenge {
        accumulator,
        transcript_digest: hasher.into_hash(),
    })
}
