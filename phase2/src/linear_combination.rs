//! The circuit specific part of the CRS which does not depend on `delta`.

use crate::{polynomial::eval, CircuitQap, LagrangeEvaluations, PowersOfTau};
use setup_utils::{
    read_compressed,
    report_progress_ending,
    report_progress_starting,
    write_compressed,
    CheckForCorrectness,
    Error,
    Hash,
    HashWriter,
    UseCompression,
};

use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rayon::prelude::*;
use std::io::{Read, Write};
use tracing::{debug, info_span};

#[derive(Clone, Debug, PartialEq, CanonicalSerialize, CanonicalDeserialize)]
pub struct LinearCombination<E: Pairing> {
    /// `[t(τ)·τ^i]₁` for `i < n - 1`, where `t(x) = x^n - 1`
    pub t_tau_powers_g1: Vec<E::G1Affine>,
    /// `[A_i(τ)]₁` for every variable
    pub a_g1: Vec<E::G1Affine>,
    /// `[B_i(τ)]₁` for every variable
    pub b_g1: Vec<E::G1Affine>,
    /// `[B_i(τ)]₂` for every variable
    pub b_g2: Vec<E::G2Affine>,
    /// `[β·A_i(τ) + α·B_i(τ) + C_i(τ)]₁` for every variable
    pub abc_g1: Vec<E::G1Affine>,
}

impl<E: Pairing> LinearCombination<E> {
    pub fn new(
        powers: &PowersOfTau<E>,
        lagrange: &LagrangeEvaluations<E>,
        qap: &CircuitQap<E::ScalarField>,
    ) -> setup_utils::Result<Self> {
        let n = lagrange.degree();
        let span = info_span!("linear_combination", n);
        let _enter = span.enter();

        if n != qap.domain_size() {
            return Err(Error::InvalidParameters(format!(
                "Lagrange evaluations have degree {} but the circuit needs {}",
                n,
                qap.domain_size()
            )));
        }
        if powers.tau_powers_g1.len() < 2 * n - 1 {
            return Err(Error::InvalidParameters(format!(
                "{} powers of tau in G1 are needed, got {}",
                2 * n - 1,
                powers.tau_powers_g1.len()
            )));
        }

        report_progress_starting("linear combination");
        let t_tau_powers_g1 = {
            let projective = (0..n - 1)
                .into_par_iter()
                .map(|i| powers.tau_powers_g1[n + i].into_group() - powers.tau_powers_g1[i])
                .collect::<Vec<_>>();
            E::G1::normalize_batch(&projective)
        };

        let (at, bt, ct) = qap.columns();
        let (a_g1, b_g1, b_g2, abc_g1) = eval::<E>(lagrange, &at, &bt, &ct);
        report_progress_ending("linear combination");
        debug!("evaluated {} variables", abc_g1.len());

        Ok(Self {
            t_tau_powers_g1,
            a_g1,
            b_g1,
            b_g2,
            abc_g1,
        })
    }

    pub fn num_variables(&self) -> usize {
        self.abc_g1.len()
    }

    /// The digest identifying the target circuit, `cs_hash`.
    pub fn hash(&self) -> setup_utils::Result<Hash> {
        let mut hasher = HashWriter::sink();
        self.write(&mut hasher)?;
        Ok(hasher.into_hash())
    }

    pub fn write<W: Write>(&self, writer: W) -> setup_utils::Result<()> {
        write_compressed(writer, self, UseCompression::Yes)
    }

    pub fn read<R: Read>(reader: R, check_input_for_correctness: CheckForCorrectness) -> setup_utils::Result<Self> {
        read_compressed(reader, UseCompression::Yes, check_input_for_correctness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::{Bn254, Fr, G1Affine, G2Affine};
    use ark_ff::{Field, One};
    use ark_poly::{EvaluationDomain, Radix2EvaluationDomain};
    use ark_std::UniformRand;
    use rand::thread_rng;
    use test_helpers::CubicCircuit;

    fn evaluate(column: &[(Fr, usize)], lagrange: &[Fr]) -> Fr {
        column.iter().map(|(coeff, index)| *coeff * lagrange[*index]).sum()
    }

    #[test]
    fn matches_direct_evaluation() {
        let rng = &mut thread_rng();
        let (tau, alpha, beta) = (Fr::rand(rng), Fr::rand(rng), Fr::rand(rng));
        let qap = CircuitQap::<Fr>::from_circuit(CubicCircuit::<Fr>::blank()).unwrap();
        let n = qap.domain_size();
        let pot = PowersOfTau::<Bn254>::dummy(16, tau, alpha, beta);
        let lagrange = LagrangeEvaluations::from_powers_of_tau(&pot, n).unwrap();
        let lin_comb = LinearCombination::new(&pot, &lagrange, &qap).unwrap();

        let t = tau.pow([n as u64]) - Fr::one();
        assert_eq!(lin_comb.t_tau_powers_g1.len(), n - 1);
        for (i, point) in lin_comb.t_tau_powers_g1.iter().enumerate() {
            assert_eq!(*point, (G1Affine::generator() * (t * tau.pow([i as u64]))).into_affine());
        }

        let l = Radix2EvaluationDomain::<Fr>::new(n)
            .unwrap()
            .evaluate_all_lagrange_coefficients(tau);
        let (at, bt, ct) = qap.columns();
        assert_eq!(lin_comb.num_variables(), qap.num_variables());
        for v in 0..qap.num_variables() {
            let (a, b, c) = (evaluate(&at[v], &l), evaluate(&bt[v], &l), evaluate(&ct[v], &l));
            assert_eq!(lin_comb.a_g1[v], (G1Affine::generator() * a).into_affine());
            assert_eq!(lin_comb.b_g1[v], (G1Affine::generator() * b).into_affine());
            assert_eq!(lin_comb.b_g2[v], (G2Affine::generator() * b).into_affine());
            assert_eq!(
                lin_comb.abc_g1[v],
                (G1Affine::generator() * (beta * a + alpha * b + c)).into_affine()
            );
        }
    }

    #[test]
    fn hash_depends_on_the_contents() {
        let rng = &mut thread_rng();
        let qap = CircuitQap::<Fr>::from_circuit(CubicCircuit::<Fr>::blank()).unwrap();
        let pot = PowersOfTau::<Bn254>::dummy(8, Fr::rand(rng), Fr::rand(rng), Fr::rand(rng));
        let lagrange = LagrangeEvaluations::from_powers_of_tau(&pot, 8).unwrap();
        let lin_comb = LinearCombination::new(&pot, &lagrange, &qap).unwrap();

        let mut buf = vec![];
        lin_comb.write(&mut buf).unwrap();
        let read = LinearCombination::<Bn254>::read(&buf[..], CheckForCorrectness::Full).unwrap();
        assert_eq!(read.hash().unwrap(), lin_comb.hash().unwrap());

        let mut tampered = lin_comb.clone();
        tampered.abc_g1.swap(0, 1);
        assert_ne!(tampered.hash().unwrap(), lin_comb.hash().unwrap());
    }

    #[test]
    fn mismatched_degree_is_rejected() {
        let rng = &mut thread_rng();
        let qap = CircuitQap::<Fr>::from_circuit(CubicCircuit::<Fr>::blank()).unwrap();
        let pot = PowersOfTau::<Bn254>::dummy(16, Fr::rand(rng), Fr::rand(rng), Fr::rand(rng));
        let lagrange = LagrangeEvaluations::from_powers_of_tau(&pot, 16).unwrap();
        assert!(matches!(
            LinearCombination::new(&pot, &lagrange, &qap),
            Err(Error::InvalidParameters(_))
        ));
    }
}
