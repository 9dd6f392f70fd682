use phase2::{
    begin,
    compute_challenge,
    compute_response,
    initial_challenge,
    Challenge,
    CircuitQap,
    LinearCombination,
    PowersOfTau,
    Response,
};

use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::PrimeField;
use ark_relations::{
    lc,
    r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError, Variable},
};
use ark_std::UniformRand;
use rand::{thread_rng, Rng};

/// Proves knowledge of `x` such that `x³ + 4x² + 2x + 5 = y` for a public `y`.
///
/// It has 3 constraints, 2 instance variables (the constant and `y`) and 3
/// witness variables (`x`, `x²` and `x³`).
#[derive(Clone, Debug)]
pub struct CubicCircuit<F: PrimeField> {
    pub x: Option<F>,
}

impl<F: PrimeField> CubicCircuit<F> {
    /// The circuit without a witness, for the setup.
    pub fn blank() -> Self {
        Self { x: None }
    }

    pub fn new(x: F) -> Self {
        Self { x: Some(x) }
    }

    /// The public output for the assigned `x`.
    pub fn output(&self) -> Option<F> {
        self.x
            .map(|x| x * x * x + F::from(4u64) * x * x + F::from(2u64) * x + F::from(5u64))
    }
}

impl<F: PrimeField> ConstraintSynthesizer<F> for CubicCircuit<F> {
    fn generate_constraints(self, cs: ConstraintSystemRef<F>) -> Result<(), SynthesisError> {
        let x_value = self.x;
        let x2_value = x_value.map(|x| x * x);
        let x3_value = x_value.map(|x| x * x * x);

        let y = cs.new_input_variable(|| self.output().ok_or(SynthesisError::AssignmentMissing))?;
        let x = cs.new_witness_variable(|| x_value.ok_or(SynthesisError::AssignmentMissing))?;
        let x2 = cs.new_witness_variable(|| x2_value.ok_or(SynthesisError::AssignmentMissing))?;
        let x3 = cs.new_witness_variable(|| x3_value.ok_or(SynthesisError::AssignmentMissing))?;

        cs.enforce_constraint(lc!() + x, lc!() + x, lc!() + x2)?;
        cs.enforce_constraint(lc!() + x2, lc!() + x, lc!() + x3)?;
        cs.enforce_constraint(
            lc!() + x3 + (F::from(4u64), x2) + (F::from(2u64), x) + (F::from(5u64), Variable::One),
            lc!() + Variable::One,
            lc!() + y,
        )?;
        Ok(())
    }
}

/// Random points of any group, for tests that need arbitrary bases.
pub fn random_point_vec<G: AffineRepr, R: Rng>(n: usize, rng: &mut R) -> Vec<G> {
    (0..n).map(|_| G::Group::rand(rng).into_affine()).collect()
}

/// Everything a ceremony for the cubic circuit starts from.
pub struct CeremonySetup<E: Pairing> {
    pub powers: PowersOfTau<E>,
    pub qap: CircuitQap<E::ScalarField>,
    pub lin_comb: LinearCombination<E>,
    pub challenge: Challenge<E>,
}

/// Begins a ceremony for the cubic circuit on random powers of tau of degree `n`.
pub fn setup_ceremony<E: Pairing>(n: usize) -> CeremonySetup<E> {
    let rng = &mut thread_rng();
    let powers = PowersOfTau::<E>::dummy(
        n,
        E::ScalarField::rand(rng),
        E::ScalarField::rand(rng),
        E::ScalarField::rand(rng),
    );
    let qap = CircuitQap::from_circuit(CubicCircuit::<E::ScalarField>::blank()).unwrap();
    let (lin_comb, accumulator) = begin(&powers, &qap).unwrap();
    let challenge = initial_challenge(accumulator).unwrap();
    CeremonySetup {
        powers,
        qap,
        lin_comb,
        challenge,
    }
}

/// Contributes each factor in turn, starting from `challenge`. Returns the
/// responses and the transcript made of their public keys.
pub fn run_contributions<E: Pairing>(
    challenge: &Challenge<E>,
    contributions: &[E::ScalarField],
) -> (Vec<Response<E>>, Vec<u8>) {
    let rng = &mut thread_rng();
    let mut challenge = challenge.clone();
    let mut responses = vec![];
    let mut transcript = vec![];
    for contribution in contributions {
        let response = compute_response(&challenge, contribution, rng).unwrap();
        response.public_key.write(&mut transcript).unwrap();
        challenge = compute_challenge(&response);
        responses.push(response);
    }
    (responses, transcript)
}
