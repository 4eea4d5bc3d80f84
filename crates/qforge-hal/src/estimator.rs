//! Pauli operators and the expectation estimator interface.
//!
//! An observable is a weighted Pauli string c * (P₀ ⊗ P₁ ⊗ ... ⊗ Pₙ) where
//! only non-identity factors are stored.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{HalError, HalResult};
use crate::result::Counts;

/// A single Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pauli {
    /// Identity operator.
    I,
    /// Pauli-X operator.
    X,
    /// Pauli-Y operator.
    Y,
    /// Pauli-Z operator.
    Z,
}

impl Pauli {
    /// Get the name of this Pauli operator.
    pub fn name(&self) -> &'static str {
        match self {
            Pauli::I => "I",
            Pauli::X => "X",
            Pauli::Y => "Y",
            Pauli::Z => "Z",
        }
    }

    /// Check if the operator is diagonal in the computational basis.
    pub fn is_diagonal(&self) -> bool {
        matches!(self, Pauli::I | Pauli::Z)
    }
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A weighted tensor product of Pauli operators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauliString {
    /// The coefficient of this term.
    pub coefficient: f64,
    /// The non-identity operators, as `(qubit, pauli)`.
    pub operators: Vec<(usize, Pauli)>,
}

impl PauliString {
    /// Create a new Pauli string. Identity factors are dropped.
    pub fn new(coefficient: f64, operators: Vec<(usize, Pauli)>) -> Self {
        let operators = operators
            .into_iter()
            .filter(|(_, pauli)| *pauli != Pauli::I)
            .collect();
        Self {
            coefficient,
            operators,
        }
    }

    /// Create an identity term (scalar).
    pub fn identity(coefficient: f64) -> Self {
        Self::new(coefficient, vec![])
    }

    /// Create a single-qubit Z term.
    pub fn z(coefficient: f64, qubit: usize) -> Self {
        Self::new(coefficient, vec![(qubit, Pauli::Z)])
    }

    /// Create a single-qubit X term.
    pub fn x(coefficient: f64, qubit: usize) -> Self {
        Self::new(coefficient, vec![(qubit, Pauli::X)])
    }

    /// Create a ZZ term.
    pub fn zz(coefficient: f64, qubit1: usize, qubit2: usize) -> Self {
        Self::new(coefficient, vec![(qubit1, Pauli::Z), (qubit2, Pauli::Z)])
    }

    /// Check if this is an identity term.
    pub fn is_identity(&self) -> bool {
        self.operators.is_empty()
    }

    /// Check if every factor is diagonal, so the term can be read directly
    /// from a computational-basis histogram.
    pub fn is_diagonal(&self) -> bool {
        self.operators.iter().all(|(_, pauli)| pauli.is_diagonal())
    }

    /// Get the qubits this term acts on.
    pub fn qubits(&self) -> impl Iterator<Item = usize> + '_ {
        self.operators.iter().map(|(q, _)| *q)
    }

    /// Eigenvalue (±1) of a diagonal term on one measured bitstring.
    ///
    /// Qubit 0 is the rightmost character.
    pub fn z_parity(&self, bitstring: &str) -> HalResult<f64> {
        if !self.is_diagonal() {
            return Err(HalError::Estimation(format!(
                "{self} is not diagonal in the measured basis"
            )));
        }
        let bits = bitstring.as_bytes();
        let mut parity = 1.0;
        for qubit in self.qubits() {
            let bit = qubit
                .checked_add(1)
                .and_then(|offset| bits.len().checked_sub(offset))
                .map(|i| bits[i])
                .ok_or_else(|| {
                    HalError::Estimation(format!(
                        "qubit {qubit} is not measured in '{bitstring}'"
                    ))
                })?;
            match bit {
                b'0' => {}
                b'1' => parity = -parity,
                other => {
                    return Err(HalError::Estimation(format!(
                        "invalid bit '{}' in '{bitstring}'",
                        char::from(other)
                    )));
                }
            }
        }
        Ok(parity)
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.coefficient >= 0.0 {
            write!(f, "+{:.4} ", self.coefficient)?;
        } else {
            write!(f, "{:.4} ", self.coefficient)?;
        }

        if self.operators.is_empty() {
            write!(f, "I")?;
        } else {
            for (i, (qubit, pauli)) in self.operators.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{pauli}[{qubit}]")?;
            }
        }
        Ok(())
    }
}

/// Estimates expectation values of observables from measurement histograms.
pub trait Estimator {
    /// Expectation value of `term`, coefficient included.
    fn expectation(&self, term: &PauliString, counts: &Counts) -> HalResult<f64>;

    /// Expectation value of a sum of terms measured in one histogram.
    fn expectation_sum(&self, terms: &[PauliString], counts: &Counts) -> HalResult<f64> {
        terms
            .iter()
            .map(|term| self.expectation(term, counts))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_factors_dropped() {
        let term = PauliString::new(0.5, vec![(0, Pauli::I), (1, Pauli::Z)]);
        assert_eq!(term.operators, vec![(1, Pauli::Z)]);
        assert!(PauliString::identity(1.0).is_identity());
    }

    #[test]
    fn test_display() {
        assert_eq!(PauliString::zz(-0.5, 0, 1).to_string(), "-0.5000 Z[0] Z[1]");
        assert_eq!(PauliString::identity(1.0).to_string(), "+1.0000 I");
    }

    #[test]
    fn test_z_parity_rightmost_is_qubit_zero() {
        let z0 = PauliString::z(1.0, 0);
        assert_eq!(z0.z_parity("10").unwrap(), 1.0);
        assert_eq!(z0.z_parity("01").unwrap(), -1.0);

        let zz = PauliString::zz(1.0, 0, 1);
        assert_eq!(zz.z_parity("11").unwrap(), 1.0);
        assert_eq!(zz.z_parity("10").unwrap(), -1.0);
    }

    #[test]
    fn test_z_parity_errors() {
        assert!(PauliString::x(1.0, 0).z_parity("0").is_err());
        assert!(PauliString::z(1.0, 3).z_parity("01").is_err());
        assert!(PauliString::z(1.0, 0).z_parity("2").is_err());
    }
}
