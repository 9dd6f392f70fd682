use crate::{calculate_hash, ChaChaRng, Result, ValidationError};

use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup, VariableBaseMSM};
use ark_ff::{BigInteger, Field, One, PrimeField, Zero};
use ark_std::UniformRand;
use rand::thread_rng;
use rayon::prelude::*;

/// Checks that `g1.0 / g1.1 == g2.0 / g2.1` in the exponent, i.e.
/// `e(g1.0, g2.1) == e(g1.1, g2.0)`.
pub fn same_ratio<E: Pairing>(g1: &(E::G1Affine, E::G1Affine), g2: &(E::G2Affine, E::G2Affine)) -> bool {
    E::pairing(g1.0, g2.1) == E::pairing(g1.1, g2.0)
}

/// Same as `same_ratio`, but returns an error describing the failed check.
pub fn check_same_ratio<E: Pairing>(
    g1: &(E::G1Affine, E::G1Affine),
    g2: &(E::G2Affine, E::G2Affine),
    err: &'static str,
) -> Result<()> {
    if g1.0.is_zero() || g1.1.is_zero() || g2.0.is_zero() || g2.1.is_zero() {
        return Err(ValidationError::InvalidRatio(format!("{} (zero element)", err)).into());
    }
    if !same_ratio::<E>(g1, g2) {
        return Err(ValidationError::InvalidRatio(err.to_string()).into());
    }
    Ok(())
}

/// Compute a random linear combination of both vectors with the same
/// coefficients. If `v2[i] = x * v1[i]` for every `i`, then the returned pair
/// has the same ratio `x`. Any index breaking the ratio breaks the returned
/// pair with overwhelming probability.
pub fn merge_pairs<G: AffineRepr>(v1: &[G], v2: &[G]) -> (G, G) {
    assert_eq!(v1.len(), v2.len());
    let rng = &mut thread_rng();
    let randomness = (0..v1.len())
        .map(|_| G::ScalarField::rand(rng))
        .collect::<Vec<_>>();
    let s = G::Group::msm_unchecked(v1, &randomness).into_affine();
    let sx = G::Group::msm_unchecked(v2, &randomness).into_affine();
    (s, sx)
}

/// Construct a single pair (s, s^x) for a vector of the form [1, x, x^2, x^3, ...].
pub fn power_pairs<G: AffineRepr>(v: &[G]) -> (G, G) {
    merge_pairs(&v[0..(v.len() - 1)], &v[1..])
}

/// Multiplies every base by `scalar` in parallel and normalizes the results.
pub fn batch_mul<G: AffineRepr>(bases: &[G], scalar: &G::ScalarField) -> Vec<G> {
    let projective = bases.par_iter().map(|base| *base * *scalar).collect::<Vec<G::Group>>();
    G::Group::normalize_batch(&projective)
}

/// Multiplies the generator by each of the scalars in parallel.
pub fn batch_generator_mul<G: AffineRepr>(scalars: &[G::ScalarField]) -> Vec<G> {
    let generator = G::generator();
    let projective = scalars
        .par_iter()
        .map(|scalar| generator * *scalar)
        .collect::<Vec<G::Group>>();
    G::Group::normalize_batch(&projective)
}

/// Returns `[1, x, x^2, ..., x^(length - 1)]`.
pub fn powers_of<F: Field>(x: F, length: usize) -> Vec<F> {
    let mut powers = Vec::with_capacity(length);
    let mut current = F::one();
    for _ in 0..length {
        powers.push(current);
        current *= x;
    }
    powers
}

/// Maps a digest to a scalar. The first 64 bytes of the `ChaChaRng` stream
/// keyed by the digest are read as a little-endian integer `x`, and the result
/// is `x * R^-1` where `R = 2^(64 * limbs)` is the Montgomery radix, which is
/// how the reference tooling reduces a wide value.
pub fn digest_to_scalar<F: PrimeField>(digest: &[u8]) -> F {
    let bytes = ChaChaRng::new(digest).random(64);
    let wide = F::from_le_bytes_mod_order(&bytes);
    let two_inv = F::from(F::MODULUS_MINUS_ONE_DIV_TWO) + F::one();
    let radix_bits = 64 * <F::BigInt as BigInteger>::NUM_LIMBS as u64;
    wide * two_inv.pow([radix_bits])
}

/// Maps a digest to a G2 point: `digest_to_scalar(digest) * G2`.
pub fn digest_to_g2<E: Pairing>(digest: &[u8]) -> E::G2Affine {
    (E::G2Affine::generator() * digest_to_scalar::<E::ScalarField>(digest)).into_affine()
}

/// Derives a contribution scalar from the hash of arbitrary entropy.
pub fn contribution_from_entropy<F: PrimeField>(entropy: &[u8]) -> Result<F> {
    let digest = calculate_hash(entropy);
    let contribution = digest_to_scalar::<F>(&digest);
    if contribution.is_zero() {
        return Err(ValidationError::ZeroContribution.into());
    }
    Ok(contribution)
}
