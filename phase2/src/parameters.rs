//! Assembles the Groth16 keypair once the ceremony is over.

use crate::{CircuitQap, LinearCombination, Phase2Accumulator, PowersOfTau};
use setup_utils::{
    read_compressed,
    write_compressed,
    CheckForCorrectness,
    Error,
    Result,
    UseCompression,
    ValidationError,
};

use ark_ec::{pairing::Pairing, AffineRepr};
use ark_groth16::{ProvingKey, VerifyingKey};
use ark_serialize::Valid;
use std::io::{Read, Write};
use tracing::{debug, info_span};

/// Combines the phase 1 powers, the circuit's linear combination and the
/// final accumulator into a proving key with `gamma = 1`.
pub fn create_keypair<E: Pairing>(
    powers: &PowersOfTau<E>,
    lin_comb: &LinearCombination<E>,
    accumulator: &Phase2Accumulator<E>,
    qap: &CircuitQap<E::ScalarField>,
) -> Result<ProvingKey<E>> {
    let span = info_span!("phase2-create-keypair");
    let _enter = span.enter();

    let cs_hash = lin_comb.hash()?;
    if cs_hash != accumulator.cs_hash {
        return Err(Error::CircuitMismatch {
            expected: hex::encode(&cs_hash[..]),
            found: hex::encode(&accumulator.cs_hash[..]),
        });
    }
    let num_inputs = qap.num_instance_variables;
    if num_inputs > lin_comb.num_variables() {
        return Err(Error::InvalidParameters(format!(
            "{} inputs requested but the circuit has {} variables",
            num_inputs,
            lin_comb.num_variables()
        )));
    }

    let vk = VerifyingKey::<E> {
        alpha_g1: powers.alpha_tau_powers_g1[0],
        beta_g2: powers.beta_g2,
        gamma_g2: E::G2Affine::generator(),
        delta_g2: accumulator.delta_g2,
        gamma_abc_g1: lin_comb.abc_g1[..num_inputs].to_vec(),
    };
    debug!("assembled the verifying key for {} inputs", num_inputs);

    Ok(ProvingKey {
        vk,
        beta_g1: powers.beta_tau_powers_g1[0],
        delta_g1: accumulator.delta_g1,
        a_query: lin_comb.a_g1.clone(),
        b_g1_query: lin_comb.b_g1.clone(),
        b_g2_query: lin_comb.b_g2.clone(),
        h_query: accumulator.h_g1.clone(),
        l_query: accumulator.l_g1.clone(),
    })
}

/// Checks the shape of a keypair against the circuit it is meant for, and
/// that every point is valid.
pub fn is_well_formed<E: Pairing>(pk: &ProvingKey<E>, qap: &CircuitQap<E::ScalarField>) -> Result<()> {
    let num_variables = qap.num_variables();
    let sizes = [
        ("A query", pk.a_query.len(), num_variables),
        ("B query in G1", pk.b_g1_query.len(), num_variables),
        ("B query in G2", pk.b_g2_query.len(), num_variables),
        ("H query", pk.h_query.len(), qap.domain_size() - 1),
        ("L query", pk.l_query.len(), qap.num_witness_variables),
        ("ABC", pk.vk.gamma_abc_g1.len(), qap.num_instance_variables),
    ];
    for (name, got, expected) in sizes.iter() {
        if got != expected {
            return Err(malformed(format!("{} has {} elements, expected {}", name, got, expected)));
        }
    }
    if pk.delta_g1.is_zero() || pk.vk.delta_g2.is_zero() {
        return Err(malformed("delta is zero".to_string()));
    }
    pk.check()
        .map_err(|e| malformed(format!("invalid point: {}", e)))?;
    Ok(())
}

fn malformed(reason: String) -> Error {
    ValidationError::MalformedKeypair(reason).into()
}

pub fn write_keypair<E: Pairing, W: Write>(writer: W, pk: &ProvingKey<E>) -> Result<()> {
    write_compressed(writer, pk, UseCompression::Yes)
}

pub fn read_keypair<E: Pairing, R: Read>(reader: R, check_input_for_correctness: CheckForCorrectness) -> Result<ProvingKey<E>> {
    read_compressed(reader, UseCompression::Yes, check_input_for_correctness)
}
