//! Replays the public record of a ceremony, the concatenated contribution
//! public keys, and checks it against the final challenge.

use crate::{accumulator::update_is_consistent, Challenge, PublicKey};
use setup_utils::{log_hash, CheckForCorrectness, Error, FormatError, Hash, Result, ValidationError};

use ark_ec::pairing::Pairing;
use std::io::{ErrorKind, Read};
use tracing::{debug, info, info_span, warn};

/// The outcome of replaying a transcript.
#[derive(Clone, Debug, PartialEq)]
pub struct TranscriptSummary<E: Pairing> {
    /// Whether every record verified. Replay stops at the first bad record.
    pub is_valid: bool,
    /// Delta after the last verified contribution
    pub final_delta_g1: E::G1Affine,
    /// Digest after the last verified contribution
    pub final_digest: Hash,
    /// Whether the contribution digest we looked for appears in the chain
    pub contribution_found: bool,
}

/// Reads contribution records until the end of `reader`, checking that every
/// one extends the hash chain and carries a valid proof for its delta update.
pub fn verify_transcript<E: Pairing, R: Read>(
    initial_digest: Hash,
    initial_delta_g1: E::G1Affine,
    mut reader: R,
    check_for_contribution: Option<&Hash>,
) -> Result<TranscriptSummary<E>> {
    let span = info_span!("phase2-verify-transcript");
    let _enter = span.enter();

    let mut summary = TranscriptSummary {
        is_valid: true,
        final_delta_g1: initial_delta_g1,
        final_digest: initial_digest,
        contribution_found: false,
    };
    let mut record = vec![0u8; PublicKey::<E>::size()];
    let mut index = 0;
    while read_record(&mut reader, &mut record)? {
        let public_key = match PublicKey::<E>::read(&record[..], CheckForCorrectness::Full) {
            Ok(public_key) => public_key,
            Err(e) => {
                warn!("contribution {} could not be decoded: {}", index, e);
                summary.is_valid = false;
                break;
            }
        };
        if public_key.transcript_digest != summary.final_digest {
            warn!("contribution {} was made against another transcript digest", index);
            summary.is_valid = false;
            break;
        }
        if !public_key.verify_pok() || !public_key.verify_update(&summary.final_delta_g1) {
            warn!("contribution {} does not verify", index);
            summary.is_valid = false;
            break;
        }

        summary.final_delta_g1 = public_key.new_delta_g1;
        summary.final_digest = public_key.contribution_digest()?;
        if check_for_contribution == Some(&summary.final_digest) {
            debug!("found the contribution at index {}", index);
            summary.contribution_found = true;
        }
        index += 1;
    }

    info!("replayed {} contributions, valid: {}", index, summary.is_valid);
    Ok(summary)
}

/// Fills `record` from the reader. Returns `false` on a clean end of stream
/// and an error if the stream ends within a record.
fn read_record<R: Read>(reader: &mut R, record: &mut [u8]) -> Result<bool> {
    let mut filled = 0;
    while filled < record.len() {
        match reader.read(&mut record[filled..]) {
            Ok(0) => break,
            Ok(read) => filled += read,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    match filled {
        0 => Ok(false),
        n if n == record.len() => Ok(true),
        _ => Err(FormatError::UnexpectedEof.into()),
    }
}

/// Checks that `final_challenge` is the outcome of the transcript replayed in
/// `summary`, starting from `challenge_0`.
pub fn finalize<E: Pairing>(
    challenge_0: &Challenge<E>,
    final_challenge: &Challenge<E>,
    summary: &TranscriptSummary<E>,
) -> Result<()> {
    let span = info_span!("phase2-finalize");
    let _enter = span.enter();

    if challenge_0.transcript_digest != challenge_0.accumulator.hash()? {
        return Err(Error::TranscriptInconsistency(
            "the initial digest is not the hash of the initial accumulator".to_string(),
        ));
    }
    if challenge_0.accumulator.cs_hash != final_challenge.accumulator.cs_hash {
        return Err(Error::CircuitMismatch {
            expected: hex::encode(&challenge_0.accumulator.cs_hash[..]),
            found: hex::encode(&final_challenge.accumulator.cs_hash[..]),
        });
    }
    if !summary.is_valid {
        return Err(Error::TranscriptInconsistency("the transcript is invalid".to_string()));
    }
    if final_challenge.transcript_digest != summary.final_digest {
        return Err(Error::TranscriptInconsistency(
            "the final digest differs from the transcript".to_string(),
        ));
    }
    if final_challenge.accumulator.delta_g1 != summary.final_delta_g1 {
        return Err(Error::TranscriptInconsistency(
            "the final delta differs from the transcript".to_string(),
        ));
    }
    if !update_is_consistent(&challenge_0.accumulator, &final_challenge.accumulator) {
        return Err(ValidationError::InvalidRatio("final accumulator".to_string()).into());
    }

    info!("final digest:");
    log_hash(&summary.final_digest);
    Ok(())
}
