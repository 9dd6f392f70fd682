use setup_utils::{read_compressed, write_compressed, CheckForCorrectness, Error, FormatError, UseCompression};

use ark_ff::PrimeField;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystem, OptimizationGoal, SynthesisMode};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use std::io::{Read, Write};
use tracing::debug;

/// A sparse column of QAP polynomial coefficients: `(coefficient, lagrange index)`.
pub type Column<F> = Vec<(F, usize)>;

/// The R1CS of a circuit. Variables are numbered with the instance variables
/// first, starting with the constant `1`, followed by the witness variables.
#[derive(Clone, Debug, PartialEq, CanonicalSerialize, CanonicalDeserialize)]
pub struct CircuitQap<F: PrimeField> {
    pub num_instance_variables: usize,
    pub num_witness_variables: usize,
    pub num_constraints: usize,
    /// One row per constraint, holding `(coefficient, variable)` pairs.
    pub a: Vec<Vec<(F, usize)>>,
    pub b: Vec<Vec<(F, usize)>>,
    pub c: Vec<Vec<(F, usize)>>,
}

impl<F: PrimeField> CircuitQap<F> {
    /// Synthesizes the circuit without a witness and extracts its matrices.
    pub fn from_circuit<C: ConstraintSynthesizer<F>>(circuit: C) -> setup_utils::Result<Self> {
        let cs = ConstraintSystem::new_ref();
        cs.set_optimization_goal(OptimizationGoal::Constraints);
        cs.set_mode(SynthesisMode::Setup);
        circuit
            .generate_constraints(cs.clone())
            .map_err(|e| Error::InvalidParameters(format!("could not synthesize the circuit: {}", e)))?;
        cs.finalize();

        let matrices = cs
            .to_matrices()
            .ok_or_else(|| Error::InvalidParameters("the constraint system has no matrices".to_string()))?;
        debug!(
            "circuit has {} constraints, {} instance and {} witness variables",
            matrices.num_constraints, matrices.num_instance_variables, matrices.num_witness_variables
        );

        Ok(Self {
            num_instance_variables: matrices.num_instance_variables,
            num_witness_variables: matrices.num_witness_variables,
            num_constraints: matrices.num_constraints,
            a: matrices.a,
            b: matrices.b,
            c: matrices.c,
        })
    }

    pub fn num_variables(&self) -> usize {
        self.num_instance_variables + self.num_witness_variables
    }

    /// The size of the evaluation domain, which also fixes the phase 2 degree.
    pub fn domain_size(&self) -> usize {
        (self.num_constraints + self.num_instance_variables).next_power_of_two()
    }

    /// Transposes the matrices into one column per variable, indexed by
    /// Lagrange basis element. Every instance variable additionally gets a
    /// unit coefficient in A at index `num_constraints + i`, which makes the
    /// instance columns linearly independent.
    pub fn columns(&self) -> (Vec<Column<F>>, Vec<Column<F>>, Vec<Column<F>>) {
        let num_variables = self.num_variables();
        let mut at = transpose(&self.a, num_variables);
        let bt = transpose(&self.b, num_variables);
        let ct = transpose(&self.c, num_variables);
        for (i, column) in at.iter_mut().enumerate().take(self.num_instance_variables) {
            column.push((F::one(), self.num_constraints + i));
        }
        (at, bt, ct)
    }

    pub fn write<W: Write>(&self, writer: W) -> setup_utils::Result<()> {
        write_compressed(writer, self, UseCompression::Yes)
    }

    pub fn read<R: Read>(reader: R) -> setup_utils::Result<Self> {
        let qap: Self = read_compressed(reader, UseCompression::Yes, CheckForCorrectness::Full)?;
        qap.check_shape()?;
        Ok(qap)
    }

    /// Every matrix has one row per constraint and only refers to known variables.
    fn check_shape(&self) -> setup_utils::Result<()> {
        let num_variables = self.num_variables();
        for rows in &[&self.a, &self.b, &self.c] {
            if rows.len() != self.num_constraints {
                return Err(FormatError::InvalidLength {
                    expected: self.num_constraints,
                    got: rows.len(),
                }
                .into());
            }
            if let Some(&(_, index)) = rows.iter().flatten().find(|(_, variable)| *variable >= num_variables) {
                return Err(FormatError::IndexOutOfRange {
                    index,
                    bound: num_variables,
                }
                .into());
            }
        }
        Ok(())
    }
}

fn transpose<F: PrimeField>(rows: &[Vec<(F, usize)>], num_variables: usize) -> Vec<Column<F>> {
    let mut columns = vec![vec![]; num_variables];
    for (j, row) in rows.iter().enumerate() {
        for &(coeff, variable) in row {
            columns[variable].push((coeff, j));
        }
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use test_helpers::CubicCircuit;

    #[test]
    fn cubic_circuit_shape() {
        let qap = CircuitQap::<Fr>::from_circuit(CubicCircuit::<Fr>::blank()).unwrap();
        assert_eq!(qap.num_instance_variables, 2);
        assert_eq!(qap.num_witness_variables, 3);
        assert_eq!(qap.num_constraints, 3);
        assert_eq!(qap.domain_size(), 8);
    }

    #[test]
    fn instance_columns_get_an_extra_a_entry() {
        let qap = CircuitQap::<Fr>::from_circuit(CubicCircuit::<Fr>::blank()).unwrap();
        let (at, bt, ct) = qap.columns();
        assert_eq!(at.len(), qap.num_variables());
        assert_eq!(bt.len(), qap.num_variables());
        assert_eq!(ct.len(), qap.num_variables());
        for i in 0..qap.num_instance_variables {
            assert!(at[i].contains(&(Fr::from(1u64), qap.num_constraints + i)));
        }
        // y only appears as the output of the last constraint
        assert_eq!(ct[1], vec![(Fr::from(1u64), 2)]);
    }

    #[test]
    fn file_round_trip() {
        let qap = CircuitQap::<Fr>::from_circuit(CubicCircuit::<Fr>::blank()).unwrap();
        let mut buf = vec![];
        qap.write(&mut buf).unwrap();
        assert_eq!(CircuitQap::<Fr>::read(&buf[..]).unwrap(), qap);
    }

    #[test]
    fn unknown_variable_is_refused() {
        let mut qap = CircuitQap::<Fr>::from_circuit(CubicCircuit::<Fr>::blank()).unwrap();
        qap.a[0].push((Fr::from(1u64), 99));
        let mut buf = vec![];
        qap.write(&mut buf).unwrap();
        assert!(matches!(
            CircuitQap::<Fr>::read(&buf[..]),
            Err(Error::Format(FormatError::IndexOutOfRange { index: 99, bound: 5 }))
        ));
    }

    #[test]
    fn missing_rows_are_refused() {
        let mut qap = CircuitQap::<Fr>::from_circuit(CubicCircuit::<Fr>::blank()).unwrap();
        qap.c.pop();
        let mut buf = vec![];
        qap.write(&mut buf).unwrap();
        assert!(matches!(
            CircuitQap::<Fr>::read(&buf[..]),
            Err(Error::Format(FormatError::InvalidLength { expected: 3, got: 2 }))
        ));

        let mut qap = CircuitQap::<Fr>::from_circuit(CubicCircuit::<Fr>::blank()).unwrap();
        qap.num_constraints = 4;
        let mut buf = vec![];
        qap.write(&mut buf).unwrap();
        assert!(CircuitQap::<Fr>::read(&buf[..]).is_err());
    }
}
