use crate::{circuit::Column, LagrangeEvaluations};

use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup, VariableBaseMSM};
use ark_ff::Zero;
use rayon::prelude::*;

// Columns with more terms than this go through a multi-scalar multiplication.
const MSM_THRESHOLD: usize = 10;

/// Evaluates the QAP columns at the Lagrange evaluations of `tau`.
/// Format: [a_g1, b_g1, b_g2, abc_g1], one entry per variable.
/// The returned points are _affine_
#[allow(clippy::type_complexity)]
pub fn eval<E: Pairing>(
    lagrange: &LagrangeEvaluations<E>,
    at: &[Column<E::ScalarField>],
    bt: &[Column<E::ScalarField>],
    ct: &[Column<E::ScalarField>],
) -> (
    Vec<E::G1Affine>,
    Vec<E::G1Affine>,
    Vec<E::G2Affine>,
    Vec<E::G1Affine>,
) {
    let a_g1 = dot_product_vec(at, &lagrange.lagrange_g1);
    let b_g1 = dot_product_vec(bt, &lagrange.lagrange_g1);
    let b_g2 = dot_product_vec(bt, &lagrange.lagrange_g2);
    let abc_g1 = dot_product_ext::<E>(
        (at, &lagrange.beta_lagrange_g1),
        (bt, &lagrange.alpha_lagrange_g1),
        (ct, &lagrange.lagrange_g1),
    );
    (a_g1, b_g1, b_g2, abc_g1)
}

/// `β·A_i(τ) + α·B_i(τ) + C_i(τ)` for every variable `i`.
#[allow(clippy::type_complexity)]
fn dot_product_ext<E: Pairing>(
    (at, beta_coeffs_g1): (&[Column<E::ScalarField>], &[E::G1Affine]),
    (bt, alpha_coeffs_g1): (&[Column<E::ScalarField>], &[E::G1Affine]),
    (ct, coeffs_g1): (&[Column<E::ScalarField>], &[E::G1Affine]),
) -> Vec<E::G1Affine> {
    let ret = at
        .par_iter()
        .zip(bt.par_iter().zip(ct))
        .map(|(at, (bt, ct))| {
            dot_product(at, beta_coeffs_g1) + dot_product(bt, alpha_coeffs_g1) + dot_product(ct, coeffs_g1)
        })
        .collect::<Vec<_>>();
    E::G1::normalize_batch(&ret)
}

/// Applies `dot_product` to each column and batch normalizes the results.
/// This is a NxN * Nx1 -> Nx1 matrix multiplication basically
fn dot_product_vec<C: AffineRepr>(input: &[Column<C::ScalarField>], coeffs: &[C]) -> Vec<C> {
    let ret = input
        .par_iter()
        .map(|column| dot_product(column, coeffs))
        .collect::<Vec<_>>();
    C::Group::normalize_batch(&ret)
}

/// Executes a dot product between a sparse column and the basis (1xN * Nx1).
fn dot_product<C: AffineRepr>(input: &[(C::ScalarField, usize)], coeffs: &[C]) -> C::Group {
    if input.len() > MSM_THRESHOLD {
        let (bases, scalars): (Vec<C>, Vec<C::ScalarField>) =
            input.iter().map(|(coeff, index)| (coeffs[*index], *coeff)).unzip();
        C::Group::msm_unchecked(&bases, &scalars)
    } else {
        input
            .iter()
            .fold(C::Group::zero(), |sum, (coeff, index)| sum + coeffs[*index] * *coeff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::{Bn254, Fr, G1Affine, G1Projective};
    use ark_std::UniformRand;
    use rand::{thread_rng, Rng};
    use test_helpers::random_point_vec;

    fn gen_input(rng: &mut impl Rng, len: usize) -> Vec<(Fr, usize)> {
        (0..len).map(|i| (Fr::rand(rng), (i * 5) % 16)).collect()
    }

    fn get_expected(elements: &[G1Affine], input: &[(Fr, usize)]) -> G1Projective {
        input
            .iter()
            .map(|(coeff, index)| elements[*index] * coeff)
            .fold(G1Projective::zero(), |a, b| a + b)
    }

    #[test]
    fn test_dot_product() {
        let mut rng = thread_rng();
        let elements = random_point_vec::<G1Affine, _>(16, &mut rng);
        // both the folded and the msm path
        for len in &[3usize, 14] {
            let input = gen_input(&mut rng, *len);
            let expected = get_expected(&elements, &input);
            assert_eq!(dot_product(&input, &elements), expected);

            // it also applies the coefficients vector to each column
            let input_vec = vec![input; 10];
            let got = dot_product_vec(&input_vec, &elements);
            assert_eq!(got, vec![expected.into_affine(); 10]);
        }
    }

    #[test]
    fn test_dot_product_ext() {
        let mut rng = thread_rng();
        let at = (0..10).map(|_| gen_input(&mut rng, 6)).collect::<Vec<_>>();
        let bt = (0..10).map(|_| gen_input(&mut rng, 12)).collect::<Vec<_>>();
        let ct = (0..10).map(|_| gen_input(&mut rng, 2)).collect::<Vec<_>>();
        let beta_coeffs_g1 = random_point_vec::<G1Affine, _>(16, &mut rng);
        let alpha_coeffs_g1 = random_point_vec::<G1Affine, _>(16, &mut rng);
        let coeffs_g1 = random_point_vec::<G1Affine, _>(16, &mut rng);

        let got = dot_product_ext::<Bn254>(
            (&at, &beta_coeffs_g1),
            (&bt, &alpha_coeffs_g1),
            (&ct, &coeffs_g1),
        );

        // it should be the sum of the dot products
        for i in 0..at.len() {
            let expected = get_expected(&beta_coeffs_g1, &at[i])
                + get_expected(&alpha_coeffs_g1, &bt[i])
                + get_expected(&coeffs_g1, &ct[i]);
            assert_eq!(got[i], expected.into_affine());
        }
    }

    #[test]
    fn empty_columns_evaluate_to_zero() {
        let mut rng = thread_rng();
        let elements = random_point_vec::<G1Affine, _>(4, &mut rng);
        assert!(dot_product::<G1Affine>(&[], &elements).is_zero());
    }
}
