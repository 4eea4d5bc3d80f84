//! Atomic gate types and their analytic inverses.

use serde::{Deserialize, Serialize};

/// Standard gates with known semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    // Single-qubit Pauli gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z (phase-flip) gate.
    Z,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,
    /// sqrt(X)-dagger gate.
    SXdg,

    // Single-qubit rotation gates
    /// Rotation around X axis.
    Rx(f64),
    /// Rotation around Y axis.
    Ry(f64),
    /// Rotation around Z axis.
    Rz(f64),
    /// Phase gate `u1(λ)`.
    U1(f64),
    /// Universal single-qubit gate `u3(θ, φ, λ)`.
    U3(f64, f64, f64),

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Y gate.
    CY,
    /// Controlled-Z gate.
    CZ,
    /// Controlled-Hadamard gate.
    CH,
    /// SWAP gate.
    Swap,
    /// Controlled rotation around X.
    CRx(f64),
    /// Controlled rotation around Y.
    CRy(f64),
    /// Controlled rotation around Z.
    CRz(f64),
    /// Controlled phase gate.
    CU1(f64),
    /// XX rotation gate.
    RXX(f64),
    /// YY rotation gate.
    RYY(f64),
    /// ZZ rotation gate.
    RZZ(f64),

    // Three-qubit gates
    /// Toffoli gate (CCX).
    CCX,
    /// Fredkin gate (CSWAP).
    CSwap,
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::SX => "sx",
            StandardGate::SXdg => "sxdg",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::U1(_) => "u1",
            StandardGate::U3(_, _, _) => "u3",
            StandardGate::CX => "cx",
            StandardGate::CY => "cy",
            StandardGate::CZ => "cz",
            StandardGate::CH => "ch",
            StandardGate::Swap => "swap",
            StandardGate::CRx(_) => "crx",
            StandardGate::CRy(_) => "cry",
            StandardGate::CRz(_) => "crz",
            StandardGate::CU1(_) => "cu1",
            StandardGate::RXX(_) => "rxx",
            StandardGate::RYY(_) => "ryy",
            StandardGate::RZZ(_) => "rzz",
            StandardGate::CCX => "ccx",
            StandardGate::CSwap => "cswap",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::SX
            | StandardGate::SXdg
            | StandardGate::Rx(_)
            | StandardGate::Ry(_)
            | StandardGate::Rz(_)
            | StandardGate::U1(_)
            | StandardGate::U3(_, _, _) => 1,

            StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::CH
            | StandardGate::Swap
            | StandardGate::CRx(_)
            | StandardGate::CRy(_)
            | StandardGate::CRz(_)
            | StandardGate::CU1(_)
            | StandardGate::RXX(_)
            | StandardGate::RYY(_)
            | StandardGate::RZZ(_) => 2,

            StandardGate::CCX | StandardGate::CSwap => 3,
        }
    }

    /// Get parameters of this gate, in declaration order.
    pub fn parameters(&self) -> Vec<f64> {
        match self {
            StandardGate::Rx(p)
            | StandardGate::Ry(p)
            | StandardGate::Rz(p)
            | StandardGate::U1(p)
            | StandardGate::CRx(p)
            | StandardGate::CRy(p)
            | StandardGate::CRz(p)
            | StandardGate::CU1(p)
            | StandardGate::RXX(p)
            | StandardGate::RYY(p)
            | StandardGate::RZZ(p) => vec![*p],

            StandardGate::U3(theta, phi, lambda) => vec![*theta, *phi, *lambda],

            _ => vec![],
        }
    }

    /// Whether the gate equals its own inverse.
    pub fn is_self_inverse(&self) -> bool {
        matches!(
            self,
            StandardGate::I
                | StandardGate::X
                | StandardGate::Y
                | StandardGate::Z
                | StandardGate::H
                | StandardGate::CX
                | StandardGate::CY
                | StandardGate::CZ
                | StandardGate::CH
                | StandardGate::Swap
                | StandardGate::CCX
                | StandardGate::CSwap
        )
    }

    /// The gate implementing the inverse unitary.
    ///
    /// `g.inverse().inverse() == g` holds exactly for every variant.
    #[must_use]
    pub fn inverse(&self) -> StandardGate {
        match self {
            StandardGate::S => StandardGate::Sdg,
            StandardGate::Sdg => StandardGate::S,
            StandardGate::T => StandardGate::Tdg,
            StandardGate::Tdg => StandardGate::T,
            StandardGate::SX => StandardGate::SXdg,
            StandardGate::SXdg => StandardGate::SX,

            StandardGate::Rx(p) => StandardGate::Rx(negate(*p)),
            StandardGate::Ry(p) => StandardGate::Ry(negate(*p)),
            StandardGate::Rz(p) => StandardGate::Rz(negate(*p)),
            StandardGate::U1(p) => StandardGate::U1(negate(*p)),
            StandardGate::CRx(p) => StandardGate::CRx(negate(*p)),
            StandardGate::CRy(p) => StandardGate::CRy(negate(*p)),
            StandardGate::CRz(p) => StandardGate::CRz(negate(*p)),
            StandardGate::CU1(p) => StandardGate::CU1(negate(*p)),
            StandardGate::RXX(p) => StandardGate::RXX(negate(*p)),
            StandardGate::RYY(p) => StandardGate::RYY(negate(*p)),
            StandardGate::RZZ(p) => StandardGate::RZZ(negate(*p)),

            // U(θ,φ,λ)† = U(-θ,-λ,-φ)
            StandardGate::U3(theta, phi, lambda) => {
                StandardGate::U3(negate(*theta), negate(*lambda), negate(*phi))
            }

            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::CH
            | StandardGate::Swap
            | StandardGate::CCX
            | StandardGate::CSwap => self.clone(),
        }
    }
}

/// Negate an angle without producing `-0`, which would render differently.
fn negate(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { -value }
}

/// Gates defined by `qelib1.inc`.
pub const QELIB1_GATES: &[&str] = &[
    "u3", "u2", "u1", "cx", "id", "u0", "u", "p", "x", "y", "z", "h", "s", "sdg", "t", "tdg",
    "rx", "ry", "rz", "sx", "sxdg", "cz", "cy", "swap", "ch", "ccx", "cswap", "crx", "cry", "crz",
    "cu1", "cp", "cu3", "csx", "cu", "rxx", "rzz", "rccx", "rc3x", "c3x", "c3sqrtx", "c4x",
];

/// Reserved words of the language.
pub const KEYWORDS: &[&str] = &[
    "OPENQASM", "include", "qreg", "creg", "gate", "opaque", "measure", "reset", "barrier", "if",
    "pi", "sin", "cos", "tan", "exp", "ln", "sqrt", "U", "CX",
];

/// Whether `name` is a built-in gate or keyword and so cannot name a new gate.
pub fn is_reserved_name(name: &str) -> bool {
    KEYWORDS.contains(&name) || QELIB1_GATES.contains(&name) || name == "ryy"
}

/// Classical condition guarding an instruction: `if(register==value)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassicalCondition {
    /// The name of the classical register.
    pub register: String,
    /// The value to compare against.
    pub value: u64,
}

impl ClassicalCondition {
    /// Create a new classical condition.
    pub fn new(register: impl Into<String>, value: u64) -> Self {
        Self {
            register: register.into(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_standard_names_are_reserved() {
        let gates = [
            StandardGate::I,
            StandardGate::H,
            StandardGate::SXdg,
            StandardGate::U3(0.0, 0.0, 0.0),
            StandardGate::CU1(0.0),
            StandardGate::RYY(0.0),
            StandardGate::CSwap,
        ];
        for gate in gates {
            assert!(is_reserved_name(gate.name()), "{}", gate.name());
        }
        assert!(is_reserved_name("measure"));
        assert!(is_reserved_name("cu3"));
        assert!(!is_reserved_name("bell"));
    }

    #[test]
    fn test_standard_gate_properties() {
        assert_eq!(StandardGate::H.num_qubits(), 1);
        assert_eq!(StandardGate::CX.num_qubits(), 2);
        assert_eq!(StandardGate::CCX.num_qubits(), 3);
        assert_eq!(StandardGate::U3(1.0, 2.0, 3.0).parameters(), vec![1.0, 2.0, 3.0]);
        assert!(StandardGate::Z.parameters().is_empty());
    }

    #[test]
    fn test_self_inverse() {
        for gate in [StandardGate::Z, StandardGate::H, StandardGate::CX, StandardGate::CCX] {
            assert!(gate.is_self_inverse());
            assert_eq!(gate.inverse(), gate);
        }
        assert!(!StandardGate::S.is_self_inverse());
    }

    #[test]
    fn test_paired_inverse() {
        assert_eq!(StandardGate::S.inverse(), StandardGate::Sdg);
        assert_eq!(StandardGate::Tdg.inverse(), StandardGate::T);
        assert_eq!(StandardGate::SX.inverse(), StandardGate::SXdg);
    }

    #[test]
    fn test_rotation_inverse_negates_angle() {
        assert_eq!(StandardGate::Rz(PI / 4.0).inverse(), StandardGate::Rz(-PI / 4.0));
        assert_eq!(StandardGate::CU1(0.5).inverse(), StandardGate::CU1(-0.5));
    }

    #[test]
    fn test_zero_angle_stays_positive() {
        match StandardGate::Rx(0.0).inverse() {
            StandardGate::Rx(p) => assert!(p.is_sign_positive()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_u3_inverse_is_involution() {
        let u = StandardGate::U3(0.1, 0.2, 0.3);
        assert_eq!(u.inverse(), StandardGate::U3(-0.1, -0.3, -0.2));
        assert_eq!(u.inverse().inverse(), u);
    }
}
