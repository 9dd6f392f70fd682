//! The phase 1 output this ceremony starts from, in the legacy powers of tau
//! file format.

use crate::Environment;
use setup_utils::{
    batch_generator_mul,
    blank_hash,
    check_same_ratio,
    power_pairs,
    powers_of,
    ElementType,
    Error,
    FormatError,
    Result,
    HASH_SIZE,
};

use ark_ec::{pairing::Pairing, AffineRepr};
use std::io::{Read, Write};
use tracing::{debug, info_span};

/// Powers of the phase 1 trapdoors `tau`, `alpha` and `beta`, truncated to the
/// degree `n` of the phase 2 domain.
///
/// * `[1, τ, τ², ..., τ^(2n-2)]₁`
/// * `[1, τ, ..., τ^(n-1)]₂`
/// * `[α, ατ, ..., ατ^(n-1)]₁` and `[β, βτ, ..., βτ^(n-1)]₁`
/// * `[β]₂`
#[derive(Clone, Debug, PartialEq)]
pub struct PowersOfTau<E: Pairing> {
    pub tau_powers_g1: Vec<E::G1Affine>,
    pub tau_powers_g2: Vec<E::G2Affine>,
    pub alpha_tau_powers_g1: Vec<E::G1Affine>,
    pub beta_tau_powers_g1: Vec<E::G1Affine>,
    pub beta_g2: E::G2Affine,
}

impl<E: Pairing> PowersOfTau<E> {
    /// The number of powers in G2, which bounds the phase 2 domain size.
    pub fn degree(&self) -> usize {
        self.tau_powers_g2.len()
    }

    /// Reads a file of degree `n`. The leading hash is skipped.
    pub fn read<R: Read>(env: &Environment<E>, mut reader: R, n: usize) -> Result<Self> {
        let span = info_span!("powersoftau", n);
        let _enter = span.enter();

        if n < 2 {
            return Err(Error::InvalidParameters(format!("degree must be at least 2, got {}", n)));
        }
        let mut previous_hash = [0u8; HASH_SIZE];
        reader.read_exact(&mut previous_hash)?;

        let codec = env.codec();
        let reader: &mut dyn Read = &mut reader;
        let tau_powers_g1 = (0..2 * n - 1)
            .map(|_| codec.read_g1(reader))
            .collect::<Result<Vec<_>>>()?;
        let tau_powers_g2 = (0..n).map(|_| codec.read_g2(reader)).collect::<Result<Vec<_>>>()?;
        let alpha_tau_powers_g1 = (0..n).map(|_| codec.read_g1(reader)).collect::<Result<Vec<_>>>()?;
        let beta_tau_powers_g1 = (0..n).map(|_| codec.read_g1(reader)).collect::<Result<Vec<_>>>()?;
        let beta_g2 = codec.read_g2(reader)?;

        if tau_powers_g1[0] != E::G1Affine::generator() {
            return Err(FormatError::InvalidGenerator(ElementType::TauG1).into());
        }
        if tau_powers_g2[0] != E::G2Affine::generator() {
            return Err(FormatError::InvalidGenerator(ElementType::TauG2).into());
        }
        debug!("read {} powers of tau", n);

        Ok(Self {
            tau_powers_g1,
            tau_powers_g2,
            alpha_tau_powers_g1,
            beta_tau_powers_g1,
            beta_g2,
        })
    }

    /// Writes the file with a blank leading hash.
    pub fn write<W: Write>(&self, env: &Environment<E>, mut writer: W) -> Result<()> {
        let codec = env.codec();
        let writer: &mut dyn Write = &mut writer;
        writer.write_all(&blank_hash())?;
        for point in &self.tau_powers_g1 {
            codec.write_g1(writer, point)?;
        }
        for point in &self.tau_powers_g2 {
            codec.write_g2(writer, point)?;
        }
        for point in self.alpha_tau_powers_g1.iter().chain(&self.beta_tau_powers_g1) {
            codec.write_g1(writer, point)?;
        }
        codec.write_g2(writer, &self.beta_g2)?;
        writer.flush()?;
        Ok(())
    }

    /// Powers of known trapdoors. Only useful for testing, since whoever
    /// calls it knows the toxic waste.
    pub fn dummy(n: usize, tau: E::ScalarField, alpha: E::ScalarField, beta: E::ScalarField) -> Self {
        let powers = powers_of(tau, 2 * n - 1);
        let alpha_powers = powers[..n].iter().map(|p| *p * alpha).collect::<Vec<_>>();
        let beta_powers = powers[..n].iter().map(|p| *p * beta).collect::<Vec<_>>();
        Self {
            tau_powers_g1: batch_generator_mul(&powers),
            tau_powers_g2: batch_generator_mul(&powers[..n]),
            alpha_tau_powers_g1: batch_generator_mul(&alpha_powers),
            beta_tau_powers_g1: batch_generator_mul(&beta_powers),
            beta_g2: batch_generator_mul::<E::G2Affine>(&[beta])[0],
        }
    }

    /// Checks that the powers are consistent with each other.
    pub fn validate(&self) -> Result<()> {
        let n = self.degree();
        if n < 2 || self.tau_powers_g1.len() != 2 * n - 1 {
            return Err(Error::InvalidParameters(format!(
                "expected {} powers in G1 and {} in G2, got {} and {}",
                2 * n - 1,
                n,
                self.tau_powers_g1.len(),
                n
            )));
        }
        if self.alpha_tau_powers_g1.len() != n || self.beta_tau_powers_g1.len() != n {
            return Err(Error::InvalidParameters("alpha and beta powers must match the degree".to_string()));
        }

        let tau_g2 = (self.tau_powers_g2[0], self.tau_powers_g2[1]);
        let tau_g1 = (self.tau_powers_g1[0], self.tau_powers_g1[1]);
        check_same_ratio::<E>(&power_pairs(&self.tau_powers_g1), &tau_g2, "Tau powers in G1")?;
        check_same_ratio::<E>(&tau_g1, &power_pairs(&self.tau_powers_g2), "Tau powers in G2")?;
        check_same_ratio::<E>(&power_pairs(&self.alpha_tau_powers_g1), &tau_g2, "Alpha powers")?;
        check_same_ratio::<E>(&power_pairs(&self.beta_tau_powers_g1), &tau_g2, "Beta powers")?;
        check_same_ratio::<E>(
            &(self.tau_powers_g1[0], self.beta_tau_powers_g1[0]),
            &(self.tau_powers_g2[0], self.beta_g2),
            "Beta in G2",
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::{Bn254, Fr};
    use ark_ec::CurveGroup;
    use ark_std::UniformRand;
    use rand::thread_rng;

    fn dummy(n: usize) -> PowersOfTau<Bn254> {
        let rng = &mut thread_rng();
        PowersOfTau::dummy(n, Fr::rand(rng), Fr::rand(rng), Fr::rand(rng))
    }

    #[test]
    fn legacy_file_round_trip() {
        let env = Environment::bn254();
        let pot = dummy(4);
        let mut buf = vec![];
        pot.write(&env, &mut buf).unwrap();
        assert_eq!(buf.len(), 64 + (7 + 4 + 4) * 65 + 5 * 129);
        assert_eq!(&buf[..64], &blank_hash()[..]);
        assert_eq!(PowersOfTau::read(&env, &buf[..], 4).unwrap(), pot);
    }

    #[test]
    fn bls12_377_round_trip() {
        let env = Environment::bls12_377();
        let rng = &mut thread_rng();
        let pot = PowersOfTau::<ark_bls12_377::Bls12_377>::dummy(
            2,
            ark_bls12_377::Fr::rand(rng),
            ark_bls12_377::Fr::rand(rng),
            ark_bls12_377::Fr::rand(rng),
        );
        let mut buf = vec![];
        pot.write(&env, &mut buf).unwrap();
        assert_eq!(PowersOfTau::read(&env, &buf[..], 2).unwrap(), pot);
    }

    #[test]
    fn non_generator_first_power_is_rejected() {
        let env = Environment::bn254();
        let mut pot = dummy(4);
        pot.tau_powers_g1[0] = pot.tau_powers_g1[1];
        let mut buf = vec![];
        pot.write(&env, &mut buf).unwrap();
        assert!(matches!(
            PowersOfTau::read(&env, &buf[..], 4),
            Err(Error::Format(FormatError::InvalidGenerator(ElementType::TauG1)))
        ));
    }

    #[test]
    fn reading_more_powers_than_the_file_holds_fails() {
        let env = Environment::bn254();
        let mut buf = vec![];
        dummy(4).write(&env, &mut buf).unwrap();
        assert!(PowersOfTau::read(&env, &buf[..], 8).is_err());
        assert!(matches!(
            PowersOfTau::read(&env, &buf[..], 1),
            Err(Error::InvalidParameters(_))
        ));
    }

    #[test]
    fn truncated_files_are_rejected() {
        let env = Environment::bn254();
        let mut buf = vec![];
        dummy(4).write(&env, &mut buf).unwrap();
        buf.truncate(buf.len() - 1);
        assert!(matches!(
            PowersOfTau::read(&env, &buf[..], 4),
            Err(Error::Format(FormatError::UnexpectedEof))
        ));
    }

    #[test]
    fn consistent_powers_validate() {
        dummy(8).validate().unwrap();
    }

    #[test]
    fn inconsistent_powers_fail_validation() {
        let mut pot = dummy(8);
        pot.tau_powers_g1[5] = (pot.tau_powers_g1[5] + pot.tau_powers_g1[0]).into_affine();
        assert!(matches!(pot.validate(), Err(Error::Validation(_))));

        let mut pot = dummy(8);
        pot.beta_g2 = pot.tau_powers_g2[1];
        assert!(pot.validate().is_err());
    }
}
