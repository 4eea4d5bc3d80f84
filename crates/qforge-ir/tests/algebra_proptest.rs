//! Property-based tests for the gate algebra and the attachment protocol.

use proptest::prelude::*;
use qforge_ir::{Attach, BitRef, Circuit, IrError, StandardGate};
use std::f64::consts::PI;

/// Gate operations that can be applied to a circuit with register `q`.
#[derive(Debug, Clone)]
enum GateOp {
    Single(StandardGate, u32),
    Two(StandardGate, u32, u32),
}

impl GateOp {
    fn apply(self, circuit: &mut Circuit) {
        match self {
            GateOp::Single(gate, q) => {
                let _ = circuit.apply(gate, &[BitRef::new("q", q)]);
            }
            GateOp::Two(gate, a, b) => {
                let _ = circuit.apply(gate, &[BitRef::new("q", a), BitRef::new("q", b)]);
            }
        }
    }
}

fn arb_single_gate() -> impl Strategy<Value = StandardGate> {
    prop_oneof![
        Just(StandardGate::X),
        Just(StandardGate::H),
        Just(StandardGate::S),
        Just(StandardGate::T),
        Just(StandardGate::SX),
        (-PI..PI).prop_map(StandardGate::Rx),
        (-PI..PI).prop_map(StandardGate::Rz),
        (-PI..PI).prop_map(StandardGate::U1),
        (-PI..PI, -PI..PI, -PI..PI).prop_map(|(t, p, l)| StandardGate::U3(t, p, l)),
    ]
}

fn arb_two_gate() -> impl Strategy<Value = StandardGate> {
    prop_oneof![
        Just(StandardGate::CX),
        Just(StandardGate::CZ),
        Just(StandardGate::Swap),
        (-PI..PI).prop_map(StandardGate::CRz),
        (-PI..PI).prop_map(StandardGate::CU1),
        (-PI..PI).prop_map(StandardGate::RZZ),
    ]
}

/// Generate a random gate operation for a circuit with given number of qubits.
fn arb_gate_op(num_qubits: u32) -> impl Strategy<Value = GateOp> {
    if num_qubits < 2 {
        (arb_single_gate(), 0..num_qubits)
            .prop_map(|(g, q)| GateOp::Single(g, q))
            .boxed()
    } else {
        prop_oneof![
            (arb_single_gate(), 0..num_qubits).prop_map(|(g, q)| GateOp::Single(g, q)),
            (arb_two_gate(), 0..num_qubits, 0..num_qubits)
                .prop_filter("operands must differ", |(_, a, b)| a != b)
                .prop_map(|(g, a, b)| GateOp::Two(g, a, b)),
        ]
        .boxed()
    }
}

/// Generate a random circuit over one quantum register `q`.
fn arb_circuit() -> impl Strategy<Value = Circuit> {
    (1_u32..=5).prop_flat_map(|num_qubits| {
        prop::collection::vec(arb_gate_op(num_qubits), 1..=12).prop_map(move |ops| {
            let mut circuit = Circuit::new("prop");
            circuit.add_qreg("q", num_qubits).unwrap();
            for op in ops {
                op.apply(&mut circuit);
            }
            circuit
        })
    })
}

proptest! {
    /// Inverting a gate twice gives back the same gate.
    #[test]
    fn test_gate_inverse_is_involution(gate in prop_oneof![arb_single_gate(), arb_two_gate()]) {
        prop_assert_eq!(gate.inverse().inverse(), gate);
    }

    /// Inverting a whole circuit twice renders the original text.
    #[test]
    fn test_circuit_inverse_is_involution(circuit in arb_circuit()) {
        let original = circuit.to_string();
        let mut copy = circuit.clone();
        copy.inverse();
        prop_assert_eq!(copy.len(), circuit.len());
        copy.inverse();
        prop_assert_eq!(copy.to_string(), original);
    }

    /// The inverted program lists the inverted gates in reverse order.
    #[test]
    fn test_circuit_inverse_reverses(circuit in arb_circuit()) {
        let mut inverted = circuit.clone();
        inverted.inverse();
        for (a, b) in circuit.instructions().iter().zip(inverted.instructions().iter().rev()) {
            prop_assert_eq!(a.as_gate().map(StandardGate::inverse), b.as_gate().cloned());
            prop_assert_eq!(a.qubits(), b.qubits());
        }
    }

    /// A rejected application leaves the circuit unchanged.
    #[test]
    fn test_out_of_range_is_atomic(circuit in arb_circuit(), extra in 0_u32..10) {
        let mut circuit = circuit;
        let size = u32::try_from(circuit.num_qubits()).unwrap();
        let before = circuit.to_string();
        let len = circuit.len();

        let err = circuit.z(&BitRef::new("q", size + extra)).unwrap_err();
        let is_out_of_range = matches!(err, IrError::IndexOutOfRange { .. });
        prop_assert!(is_out_of_range);
        prop_assert_eq!(circuit.len(), len);
        prop_assert_eq!(circuit.to_string(), before);
    }

    /// Broadcasting over a register yields one instruction per position,
    /// in ascending index order.
    #[test]
    fn test_broadcast_ascending(size in 1_u32..=16) {
        let mut circuit = Circuit::new("broadcast");
        let q = circuit.add_qreg("q", size).unwrap();
        let indices: Vec<u32> = circuit
            .h_reg(&q)
            .unwrap()
            .iter()
            .map(|inst| inst.qubits()[0].index())
            .collect();
        prop_assert_eq!(indices, (0..size).collect::<Vec<_>>());
    }

    /// Broadcasting over registers of different sizes attaches nothing.
    #[test]
    fn test_broadcast_mismatch_is_atomic(a in 1_u32..=8, b in 1_u32..=8) {
        prop_assume!(a != b);
        let mut circuit = Circuit::new("mismatch");
        let ra = circuit.add_qreg("a", a).unwrap();
        let rb = circuit.add_qreg("b", b).unwrap();
        let is_mismatch = matches!(
            circuit.cx_reg(&ra, &rb),
            Err(IrError::RegisterSizeMismatch { .. })
        );
        prop_assert!(is_mismatch);
        prop_assert!(circuit.is_empty());
    }
}
