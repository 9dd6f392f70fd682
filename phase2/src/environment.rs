use setup_utils::{Bls12_377Codec, Bn254Codec, CheckForCorrectness, CurveKind, PointCodec};

use ark_bls12_377::Bls12_377;
use ark_bn254::Bn254;
use ark_ec::pairing::Pairing;

/// The context every reader and writer of ceremony files receives: the point
/// codec of the curve in use and how strictly untrusted input is checked.
pub struct Environment<E: Pairing> {
    codec: Box<dyn PointCodec<E>>,
    pub check_input_for_correctness: CheckForCorrectness,
}

impl Environment<Bn254> {
    pub fn bn254() -> Self {
        Self::new(Box::new(Bn254Codec), CheckForCorrectness::Full)
    }
}

impl Environment<Bls12_377> {
    pub fn bls12_377() -> Self {
        Self::new(Box::new(Bls12_377Codec), CheckForCorrectness::Full)
    }
}

impl<E: Pairing> Environment<E> {
    pub fn new(codec: Box<dyn PointCodec<E>>, check_input_for_correctness: CheckForCorrectness) -> Self {
        Self {
            codec,
            check_input_for_correctness,
        }
    }

    /// Replaces the input checking policy.
    pub fn with_correctness_check(mut self, check_input_for_correctness: CheckForCorrectness) -> Self {
        self.check_input_for_correctness = check_input_for_correctness;
        self
    }

    pub fn codec(&self) -> &dyn PointCodec<E> {
        self.codec.as_ref()
    }

    pub fn curve(&self) -> CurveKind {
        self.codec.curve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environments_pick_the_right_codec() {
        assert_eq!(Environment::bn254().curve(), CurveKind::Bn254);
        assert_eq!(Environment::bls12_377().curve(), CurveKind::Bls12_377);
        let env = Environment::bn254().with_correctness_check(CheckForCorrectness::No);
        assert_eq!(env.check_input_for_correctness, CheckForCorrectness::No);
    }
}
