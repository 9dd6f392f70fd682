use crate::LinearCombination;
use setup_utils::{
    batch_mul,
    calculate_hash,
    merge_pairs,
    read_element,
    read_elements,
    read_hash,
    read_length,
    report_progress_ending,
    report_progress_starting,
    same_ratio,
    write_element,
    write_elements,
    write_length,
    CheckForCorrectness,
    ElementType,
    Error,
    Hash,
    Result,
    UseCompression,
    ValidationError,
};

use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::Field;
use std::io::{Read, Write};
use tracing::{debug, info_span, warn};

const COMPRESSION: UseCompression = UseCompression::Yes;

/// The `delta` dependent part of the CRS which participants contribute to.
///
/// * `[δ]₁` and `[δ]₂`
/// * `H[i] = [t(τ)·τ^i / δ]₁`
/// * `L[i] = [(β·A_i(τ) + α·B_i(τ) + C_i(τ)) / δ]₁` for the witness variables
#[derive(Clone, Debug, PartialEq)]
pub struct Phase2Accumulator<E: Pairing> {
    /// Digest of the linear combination this accumulator was derived from
    pub cs_hash: Hash,
    pub delta_g1: E::G1Affine,
    pub delta_g2: E::G2Affine,
    pub h_g1: Vec<E::G1Affine>,
    pub l_g1: Vec<E::G1Affine>,
}

impl<E: Pairing> Phase2Accumulator<E> {
    /// The accumulator before any contribution, i.e. with `δ = 1`.
    pub fn begin(cs_hash: Hash, lin_comb: &LinearCombination<E>, num_inputs: usize) -> Result<Self> {
        if num_inputs > lin_comb.num_variables() {
            return Err(Error::InvalidParameters(format!(
                "{} inputs requested but the circuit has {} variables",
                num_inputs,
                lin_comb.num_variables()
            )));
        }
        Ok(Self {
            cs_hash,
            delta_g1: E::G1Affine::generator(),
            delta_g2: E::G2Affine::generator(),
            h_g1: lin_comb.t_tau_powers_g1.clone(),
            l_g1: lin_comb.abc_g1[num_inputs..].to_vec(),
        })
    }

    pub fn is_well_formed(&self) -> Result<()> {
        if self.delta_g1.is_zero() {
            return Err(ValidationError::ZeroElement(ElementType::DeltaG1).into());
        }
        if self.delta_g2.is_zero() {
            return Err(ValidationError::ZeroElement(ElementType::DeltaG2).into());
        }
        if self.h_g1.is_empty() {
            return Err(ValidationError::EmptyVector(ElementType::H).into());
        }
        if self.l_g1.is_empty() {
            return Err(ValidationError::EmptyVector(ElementType::L).into());
        }
        Ok(())
    }

    /// Multiplies delta by `contribution` and divides H and L by it.
    pub fn contribute(&self, contribution: &E::ScalarField) -> Result<Self> {
        let span = info_span!("contribute", h = self.h_g1.len(), l = self.l_g1.len());
        let _enter = span.enter();

        let inverse = contribution.inverse().ok_or(ValidationError::ZeroContribution)?;
        report_progress_starting("contribute");
        let accumulator = Self {
            cs_hash: self.cs_hash,
            delta_g1: (self.delta_g1 * contribution).into_affine(),
            delta_g2: (self.delta_g2 * contribution).into_affine(),
            h_g1: batch_mul(&self.h_g1, &inverse),
            l_g1: batch_mul(&self.l_g1, &inverse),
        };
        report_progress_ending("contribute");
        Ok(accumulator)
    }

    /// `[cs_hash][H size][L size][δ₁][δ₂][H...][L...]`
    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.cs_hash)?;
        write_length(&mut writer, self.h_g1.len())?;
        write_length(&mut writer, self.l_g1.len())?;
        write_element(&mut writer, &self.delta_g1, COMPRESSION)?;
        write_element(&mut writer, &self.delta_g2, COMPRESSION)?;
        write_elements(&mut writer, &self.h_g1, COMPRESSION)?;
        write_elements(&mut writer, &self.l_g1, COMPRESSION)?;
        Ok(())
    }

    pub fn read<R: Read>(mut reader: R, check_input_for_correctness: CheckForCorrectness) -> Result<Self> {
        let cs_hash = read_hash(&mut reader)?;
        let h_size = read_length(&mut reader)?;
        let l_size = read_length(&mut reader)?;
        let delta_g1 = read_element(&mut reader, COMPRESSION, check_input_for_correctness)?;
        let delta_g2 = read_element(&mut reader, COMPRESSION, check_input_for_correctness)?;
        let h_g1 = read_elements(&mut reader, h_size, COMPRESSION, check_input_for_correctness)?;
        let l_g1 = read_elements(&mut reader, l_size, COMPRESSION, check_input_for_correctness)?;
        Ok(Self {
            cs_hash,
            delta_g1,
            delta_g2,
            h_g1,
            l_g1,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = vec![];
        self.write(&mut buf)?;
        Ok(buf)
    }

    /// Digest of the serialized accumulator, which seeds the transcript.
    pub fn hash(&self) -> Result<Hash> {
        Ok(calculate_hash(&self.to_bytes()?))
    }
}

/// Checks that `after` was obtained from `before` by multiplying delta by some
/// factor and dividing every H and L entry by the same factor.
pub fn update_is_consistent<E: Pairing>(before: &Phase2Accumulator<E>, after: &Phase2Accumulator<E>) -> bool {
    let span = info_span!("update_is_consistent");
    let _enter = span.enter();

    if before.cs_hash != after.cs_hash {
        warn!("accumulators were derived from different circuits");
        return false;
    }
    if before.h_g1.len() != after.h_g1.len() || before.l_g1.len() != after.l_g1.len() {
        warn!("accumulator sizes differ");
        return false;
    }
    if after.delta_g1.is_zero() || after.delta_g2.is_zero() {
        warn!("delta is zero");
        return false;
    }
    if !same_ratio::<E>(&(before.delta_g1, after.delta_g1), &(before.delta_g2, after.delta_g2)) {
        warn!("delta in G1 and G2 were updated inconsistently");
        return false;
    }

    // e(H'[i], δ₂') == e(H[i], δ₂) for every i, batched over H and L
    let old = before.h_g1.iter().chain(&before.l_g1).copied().collect::<Vec<_>>();
    let new = after.h_g1.iter().chain(&after.l_g1).copied().collect::<Vec<_>>();
    let (s, s_new) = merge_pairs(&old, &new);
    if !same_ratio::<E>(&(s_new, s), &(before.delta_g2, after.delta_g2)) {
        warn!("H and L were not updated by the inverse of the delta factor");
        return false;
    }

    debug!("accumulator update is consistent");
    true
}
