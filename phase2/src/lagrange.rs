//! Lagrange basis evaluations of the phase 1 powers.
//!
//! Given `[τ^i]` for `i < n`, the evaluations `[L_j(τ)]` over the size `n`
//! multiplicative subgroup are the inverse DFT of the powers, computed here
//! directly on group elements.

use crate::PowersOfTau;
use setup_utils::{
    read_compressed,
    report_progress_ending,
    report_progress_starting,
    write_compressed,
    CheckForCorrectness,
    Error,
    UseCompression,
};

use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::{Field, One};
use ark_poly::{EvaluationDomain, Radix2EvaluationDomain};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rayon::prelude::*;
use std::io::{Read, Write};
use tracing::{debug, info_span};

#[derive(Clone, Debug, PartialEq, CanonicalSerialize, CanonicalDeserialize)]
pub struct LagrangeEvaluations<E: Pairing> {
    /// `[L_j(τ)]₁`
    pub lagrange_g1: Vec<E::G1Affine>,
    /// `[L_j(τ)]₂`
    pub lagrange_g2: Vec<E::G2Affine>,
    /// `[α·L_j(τ)]₁`
    pub alpha_lagrange_g1: Vec<E::G1Affine>,
    /// `[β·L_j(τ)]₁`
    pub beta_lagrange_g1: Vec<E::G1Affine>,
}

impl<E: Pairing> LagrangeEvaluations<E> {
    pub fn from_powers_of_tau(powers: &PowersOfTau<E>, n: usize) -> setup_utils::Result<Self> {
        let span = info_span!("lagrange", n);
        let _enter = span.enter();

        if !n.is_power_of_two() || n > powers.degree() {
            return Err(Error::InvalidParameters(format!(
                "the domain size must be a power of two no larger than {}, got {}",
                powers.degree(),
                n
            )));
        }
        let domain = Radix2EvaluationDomain::<E::ScalarField>::new(n)
            .ok_or_else(|| Error::InvalidParameters(format!("no radix-2 domain of size {}", n)))?;

        report_progress_starting("lagrange");
        let evaluations = Self {
            lagrange_g1: ifft_in_exponent(&powers.tau_powers_g1[..n], &domain),
            lagrange_g2: ifft_in_exponent(&powers.tau_powers_g2[..n], &domain),
            alpha_lagrange_g1: ifft_in_exponent(&powers.alpha_tau_powers_g1[..n], &domain),
            beta_lagrange_g1: ifft_in_exponent(&powers.beta_tau_powers_g1[..n], &domain),
        };
        report_progress_ending("lagrange");
        debug!("computed {} Lagrange evaluations", n);

        Ok(evaluations)
    }

    pub fn degree(&self) -> usize {
        self.lagrange_g1.len()
    }

    pub fn write<W: Write>(&self, writer: W) -> setup_utils::Result<()> {
        write_compressed(writer, self, UseCompression::Yes)
    }

    pub fn read<R: Read>(reader: R, check_input_for_correctness: CheckForCorrectness) -> setup_utils::Result<Self> {
        read_compressed(reader, UseCompression::Yes, check_input_for_correctness)
    }
}

/// Computes `n⁻¹ · Σ_i ω^(-ij) · points[i]` for every `j`.
fn ifft_in_exponent<G: AffineRepr>(points: &[G], domain: &Radix2EvaluationDomain<G::ScalarField>) -> Vec<G> {
    let mut values = points.par_iter().map(|p| p.into_group()).collect::<Vec<_>>();
    fft_in_place(&mut values, domain.group_gen_inv, domain.log_size_of_group);
    let size_inv = domain.size_inv;
    values.par_iter_mut().for_each(|v| *v *= size_inv);
    G::Group::normalize_batch(&values)
}

/// Reverses the lowest `l` bits of `n`.
fn bitreverse(n: u32, l: u32) -> u32 {
    if l == 0 {
        return 0;
    }
    n.reverse_bits() >> (32 - l)
}

/// Iterative radix-2 Cooley-Tukey transform. Butterflies within a layer are
/// independent and run in parallel.
fn fft_in_place<G: CurveGroup>(values: &mut [G], omega: G::ScalarField, log_n: u32) {
    let n = values.len() as u32;
    assert_eq!(n, 1 << log_n);

    for i in 0..n {
        let ri = bitreverse(i, log_n);
        if i < ri {
            values.swap(ri as usize, i as usize);
        }
    }

    let mut m = 1usize;
    for _ in 0..log_n {
        let w_m = omega.pow([(n as u64) / (2 * m as u64)]);
        let mut twiddles = Vec::with_capacity(m);
        let mut w = G::ScalarField::one();
        for _ in 0..m {
            twiddles.push(w);
            w *= w_m;
        }

        values.par_chunks_mut(2 * m).for_each(|chunk| {
            let (lo, hi) = chunk.split_at_mut(m);
            for ((a, b), w) in lo.iter_mut().zip(hi.iter_mut()).zip(&twiddles) {
                let t = *b * w;
                *b = *a - t;
                *a += t;
            }
        });

        m *= 2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::{Bn254, Fr, G1Affine, G2Affine};
    use ark_std::UniformRand;
    use rand::thread_rng;

    #[test]
    fn matches_direct_lagrange_evaluation() {
        let rng = &mut thread_rng();
        let (tau, alpha, beta) = (Fr::rand(rng), Fr::rand(rng), Fr::rand(rng));
        let pot = PowersOfTau::<Bn254>::dummy(16, tau, alpha, beta);

        for n in &[1usize, 2, 8, 16] {
            let evaluations = LagrangeEvaluations::from_powers_of_tau(&pot, *n).unwrap();
            let domain = Radix2EvaluationDomain::<Fr>::new(*n).unwrap();
            let expected = domain.evaluate_all_lagrange_coefficients(tau);
            assert_eq!(evaluations.degree(), *n);
            for (j, l) in expected.iter().enumerate() {
                assert_eq!(evaluations.lagrange_g1[j], (G1Affine::generator() * l).into_affine());
                assert_eq!(evaluations.lagrange_g2[j], (G2Affine::generator() * l).into_affine());
                assert_eq!(
                    evaluations.alpha_lagrange_g1[j],
                    (G1Affine::generator() * (*l * alpha)).into_affine()
                );
                assert_eq!(
                    evaluations.beta_lagrange_g1[j],
                    (G1Affine::generator() * (*l * beta)).into_affine()
                );
            }
        }
    }

    #[test]
    fn bad_domain_sizes_are_rejected() {
        let rng = &mut thread_rng();
        let pot = PowersOfTau::<Bn254>::dummy(8, Fr::rand(rng), Fr::rand(rng), Fr::rand(rng));
        assert!(matches!(
            LagrangeEvaluations::from_powers_of_tau(&pot, 6),
            Err(Error::InvalidParameters(_))
        ));
        assert!(matches!(
            LagrangeEvaluations::from_powers_of_tau(&pot, 16),
            Err(Error::InvalidParameters(_))
        ));
    }

    #[test]
    fn file_round_trip() {
        let rng = &mut thread_rng();
        let pot = PowersOfTau::<Bn254>::dummy(4, Fr::rand(rng), Fr::rand(rng), Fr::rand(rng));
        let evaluations = LagrangeEvaluations::from_powers_of_tau(&pot, 4).unwrap();
        let mut buf = vec![];
        evaluations.write(&mut buf).unwrap();
        assert_eq!(
            LagrangeEvaluations::<Bn254>::read(&buf[..], CheckForCorrectness::Full).unwrap(),
            evaluations
        );
    }

    #[test]
    fn bitreverse_reverses_low_bits() {
        assert_eq!(bitreverse(0b001, 3), 0b100);
        assert_eq!(bitreverse(0b110, 3), 0b011);
        assert_eq!(bitreverse(5, 0), 0);
    }
}
