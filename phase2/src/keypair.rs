//! The public half of a contribution. It proves knowledge of the secret
//! factor and lets anyone check the delta update without learning it.

use setup_utils::{
    check_same_ratio,
    digest_to_g2,
    element_size,
    read_element,
    read_hash,
    write_element,
    CheckForCorrectness,
    Hash,
    HashWriter,
    Result,
    UseCompression,
    HASH_SIZE,
};

use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_std::UniformRand;
use rand::Rng;
use std::io::{Read, Write};
use tracing::debug;

const COMPRESSION: UseCompression = UseCompression::Yes;

/// A proof of knowledge of the factor `j` which took `δ` to `δ·j`.
///
/// With a fresh random `s` and `r = digest_to_g2(H(digest || [s]₁ || [s·j]₁))`,
/// the key holds `[s]₁`, `[s·j]₁` and `[r·j]₂`. Knowing `j` is needed to
/// produce a `[r·j]₂` matching `[s]₁` and `[s·j]₁`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey<E: Pairing> {
    /// The transcript digest this contribution was made against
    pub transcript_digest: Hash,
    pub new_delta_g1: E::G1Affine,
    pub s_g1: E::G1Affine,
    pub s_delta_j_g1: E::G1Affine,
    pub r_delta_j_g2: E::G2Affine,
}

impl<E: Pairing> PublicKey<E> {
    /// Serialized size of a key, the unit record of a transcript.
    pub fn size() -> usize {
        HASH_SIZE + 3 * element_size::<E::G1Affine>(COMPRESSION) + element_size::<E::G2Affine>(COMPRESSION)
    }

    /// Builds the key for a contribution of `contribution` that produced `new_delta_g1`.
    pub fn new<R: Rng>(
        transcript_digest: Hash,
        new_delta_g1: E::G1Affine,
        contribution: &E::ScalarField,
        rng: &mut R,
    ) -> Result<Self> {
        let s = E::ScalarField::rand(rng);
        let s_g1 = (E::G1Affine::generator() * s).into_affine();
        let s_delta_j_g1 = (s_g1 * contribution).into_affine();
        let r_g2 = compute_r_g2::<E>(&transcript_digest, &s_g1, &s_delta_j_g1)?;
        let r_delta_j_g2 = (r_g2 * contribution).into_affine();
        Ok(Self {
            transcript_digest,
            new_delta_g1,
            s_g1,
            s_delta_j_g1,
            r_delta_j_g2,
        })
    }

    /// `r_g2` re-derived from the public parts of the key.
    pub fn r_g2(&self) -> Result<E::G2Affine> {
        compute_r_g2::<E>(&self.transcript_digest, &self.s_g1, &self.s_delta_j_g1)
    }

    /// Checks the proof of knowledge: `[s]₁ : [s·j]₁ == [r]₂ : [r·j]₂`.
    pub fn verify_pok(&self) -> bool {
        self.check_against_r_g2(&(self.s_g1, self.s_delta_j_g1), "proof of knowledge")
    }

    /// Checks that the same `j` took `previous_delta_g1` to `new_delta_g1`.
    pub fn verify_update(&self, previous_delta_g1: &E::G1Affine) -> bool {
        self.check_against_r_g2(&(*previous_delta_g1, self.new_delta_g1), "delta update")
    }

    fn check_against_r_g2(&self, g1: &(E::G1Affine, E::G1Affine), label: &'static str) -> bool {
        let result = self
            .r_g2()
            .and_then(|r_g2| check_same_ratio::<E>(g1, &(r_g2, self.r_delta_j_g2), label));
        match result {
            Ok(()) => true,
            Err(e) => {
                debug!("{}", e);
                false
            }
        }
    }

    /// The digest following this contribution in the transcript hash chain,
    /// `H(previous digest || new delta)`. It also identifies the contribution.
    pub fn contribution_digest(&self) -> Result<Hash> {
        let mut hasher = HashWriter::sink();
        hasher.update(&self.transcript_digest);
        write_element(&mut hasher, &self.new_delta_g1, COMPRESSION)?;
        Ok(hasher.into_hash())
    }

    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.transcript_digest)?;
        write_element(&mut writer, &self.new_delta_g1, COMPRESSION)?;
        write_element(&mut writer, &self.s_g1, COMPRESSION)?;
        write_element(&mut writer, &self.s_delta_j_g1, COMPRESSION)?;
        write_element(&mut writer, &self.r_delta_j_g2, COMPRESSION)?;
        Ok(())
    }

    pub fn read<R: Read>(mut reader: R, check_input_for_correctness: CheckForCorrectness) -> Result<Self> {
        Ok(Self {
            transcript_digest: read_hash(&mut reader)?,
            new_delta_g1: read_element(&mut reader, COMPRESSION, check_input_for_correctness)?,
            s_g1: read_element(&mut reader, COMPRESSION, check_input_for_correctness)?,
            s_delta_j_g1: read_element(&mut reader, COMPRESSION, check_input_for_correctness)?,
            r_delta_j_g2: read_element(&mut reader, COMPRESSION, check_input_for_correctness)?,
        })
    }
}

fn compute_r_g2<E: Pairing>(digest: &Hash, s_g1: &E::G1Affine, s_delta_j_g1: &E::G1Affine) -> Result<E::G2Affine> {
    let mut hasher = HashWriter::sink();
    hasher.update(digest);
    write_element(&mut hasher, s_g1, COMPRESSION)?;
    write_element(&mut hasher, s_delta_j_g1, COMPRESSION)?;
    Ok(digest_to_g2::<E>(&hasher.into_hash()))
}
