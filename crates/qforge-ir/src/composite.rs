//! Composite gates: named macros over an ordered body of instructions.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::attach::{Attach, AttachScope, InstructionMut, InstructionSet};
use crate::circuit::CircuitId;
use crate::instruction::Instruction;
use crate::register::{BitRef, RegisterTable};

/// A gate whose effect is the ordered body it was defined with.
///
/// The body is expressed over the formal arguments, which are the
/// [`Instruction::qubits`] of the instruction holding this gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeGate {
    name: String,
    params: Vec<f64>,
    body: Vec<Instruction>,
    inverse_flag: bool,
}

impl CompositeGate {
    /// Name of the macro.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Numeric parameters of the macro.
    pub fn params(&self) -> &[f64] {
        &self.params
    }

    /// The ordered body.
    pub fn body(&self) -> &[Instruction] {
        &self.body
    }

    pub(crate) fn body_mut(&mut self) -> &mut Vec<Instruction> {
        &mut self.body
    }

    /// Whether the body is currently inverted relative to its definition.
    pub fn is_inverted(&self) -> bool {
        self.inverse_flag
    }

    /// Number of body elements.
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the body is empty.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Reverse the body, invert each element and flip the flag.
    pub(crate) fn invert(&mut self) {
        self.body.reverse();
        for inst in &mut self.body {
            inst.invert();
        }
        self.inverse_flag = !self.inverse_flag;
    }
}

/// A composite gate under definition.
///
/// Exposes the same attachment surface as a [`crate::Circuit`], but every
/// operand must be one of the formal arguments given at creation. Obtain one
/// with [`crate::Circuit::composite`] and hand the result of
/// [`CompositeBuilder::finish`] to [`Attach::append`].
///
/// ```rust
/// use qforge_ir::{Attach, Circuit};
///
/// let mut circuit = Circuit::new("demo");
/// let q = circuit.add_qreg("q", 2).unwrap();
/// let (a, b) = (q.bit(0).unwrap(), q.bit(1).unwrap());
///
/// let mut bell = circuit.composite("bell", vec![], &[a.clone(), b.clone()]).unwrap();
/// bell.h(&a).unwrap();
/// bell.cx(&a, &b).unwrap();
/// let bell = bell.finish();
///
/// circuit.append(bell).unwrap();
/// assert_eq!(circuit.to_string(), "h q[0];\ncx q[0],q[1];");
/// ```
#[derive(Debug)]
pub struct CompositeBuilder<'c> {
    registers: &'c RegisterTable,
    circuit: CircuitId,
    formals: Vec<BitRef>,
    gate: CompositeGate,
}

impl<'c> CompositeBuilder<'c> {
    pub(crate) fn new(
        registers: &'c RegisterTable,
        circuit: CircuitId,
        name: String,
        params: Vec<f64>,
        formals: Vec<BitRef>,
    ) -> Self {
        Self {
            registers,
            circuit,
            formals,
            gate: CompositeGate {
                name,
                params,
                body: vec![],
                inverse_flag: false,
            },
        }
    }

    /// Name of the composite being defined.
    pub fn name(&self) -> &str {
        &self.gate.name
    }

    /// Formal arguments.
    pub fn formals(&self) -> &[BitRef] {
        &self.formals
    }

    /// Body built so far.
    pub fn body(&self) -> &[Instruction] {
        &self.gate.body
    }

    /// Close the definition.
    pub fn finish(self) -> Instruction {
        debug!(
            gate = %self.gate.name,
            body = self.gate.body.len(),
            "finished composite definition"
        );
        Instruction::composite(self.gate, self.formals, self.circuit)
    }
}

impl Attach for CompositeBuilder<'_> {
    fn scope(&self) -> AttachScope<'_> {
        AttachScope::composite(self.registers, &self.gate.name, &self.formals)
    }

    fn circuit_id(&self) -> CircuitId {
        self.circuit
    }

    fn attach(&mut self, instruction: Instruction) -> InstructionMut<'_> {
        self.gate.body.push(instruction);
        let scope = AttachScope::composite(self.registers, &self.gate.name, &self.formals);
        let last = self.gate.body.len() - 1;
        InstructionMut::new(scope, &mut self.gate.body[last])
    }

    fn attach_all(&mut self, instructions: Vec<Instruction>) -> InstructionSet<'_> {
        let start = self.gate.body.len();
        self.gate.body.extend(instructions);
        let scope = AttachScope::composite(self.registers, &self.gate.name, &self.formals);
        InstructionSet::new(scope, &mut self.gate.body[start..])
    }
}

#[cfg(test)]
mod tests {
    use crate::attach::Attach;
    use crate::circuit::Circuit;
    use crate::error::IrError;
    use crate::register::{BitRef, Register};

    fn setup() -> (Circuit, Register, Register) {
        let mut circuit = Circuit::new("test");
        let q = circuit.add_qreg("q", 3).unwrap();
        let c = circuit.add_creg("c", 2).unwrap();
        (circuit, q, c)
    }

    #[test]
    fn test_body_rejects_foreign_qubit() {
        let (mut circuit, q, _) = setup();
        let r = circuit.add_qreg("r", 1).unwrap();
        let q0 = q.bit(0).unwrap();
        let mut g = circuit.composite("g", vec![], &[q0.clone()]).unwrap();

        let err = g.z(&r.bit(0).unwrap()).unwrap_err();
        assert!(matches!(err, IrError::NotQubitOfGate { ref gate_name, .. } if gate_name == "g"));
        assert!(g.body().is_empty());

        // q[1] is in the circuit but not a formal argument
        assert!(matches!(
            g.z(&q.bit(1).unwrap()),
            Err(IrError::NotQubitOfGate { .. })
        ));
        g.z(&q0).unwrap();
        assert_eq!(g.body().len(), 1);
    }

    #[test]
    fn test_formals_must_be_in_circuit() {
        let (circuit, _, _) = setup();
        let err = circuit.composite("g", vec![], &[BitRef::new("nope", 0)]);
        assert!(matches!(err, Err(IrError::QubitNotInCircuit { .. })));
    }

    #[test]
    fn test_inverse_reverses_and_flips() {
        let (circuit, q, _) = setup();
        let (a, b) = (q.bit(0).unwrap(), q.bit(1).unwrap());
        let mut g = circuit.composite("g", vec![], &[a.clone(), b.clone()]).unwrap();
        g.s(&a).unwrap();
        g.cx(&a, &b).unwrap();
        g.rz(0.5, &b).unwrap();
        let g = g.finish();

        let inv = g.inverse();
        assert_eq!(inv.to_string(), "rz(-0.5) q[1];\ncx q[0],q[1];\nsdg q[0];");
        assert!(inv.as_composite().unwrap().is_inverted());

        let back = inv.inverse();
        assert_eq!(back.to_string(), g.to_string());
        assert!(!back.as_composite().unwrap().is_inverted());
    }

    #[test]
    fn test_nested_composite_inverse_recurses() {
        let (circuit, q, _) = setup();
        let (a, b) = (q.bit(0).unwrap(), q.bit(1).unwrap());

        let mut inner = circuit.composite("inner", vec![], &[a.clone()]).unwrap();
        inner.t(&a).unwrap();
        inner.h(&a).unwrap();
        let inner = inner.finish();

        let mut outer = circuit.composite("outer", vec![], &[a.clone(), b.clone()]).unwrap();
        outer.append(inner).unwrap();
        outer.x(&b).unwrap();
        let outer = outer.finish();

        assert_eq!(outer.to_string(), "t q[0];\nh q[0];\nx q[1];");
        assert_eq!(outer.inverse().to_string(), "x q[1];\nh q[0];\ntdg q[0];");
        assert_eq!(outer.inverse().inverse(), outer);
    }

    #[test]
    fn test_nested_composite_must_use_outer_formals() {
        let (circuit, q, _) = setup();
        let (a, b) = (q.bit(0).unwrap(), q.bit(1).unwrap());
        let mut inner = circuit.composite("inner", vec![], &[b.clone()]).unwrap();
        inner.h(&b).unwrap();
        let inner = inner.finish();

        let mut outer = circuit.composite("outer", vec![], &[a]).unwrap();
        assert!(matches!(
            outer.append(inner),
            Err(IrError::NotQubitOfGate { .. })
        ));
        assert!(outer.body().is_empty());
    }

    #[test]
    fn test_c_if_distributes_once_per_element() {
        let (mut circuit, q, c) = setup();
        let (a, b) = (q.bit(0).unwrap(), q.bit(1).unwrap());
        let mut g = circuit.composite("g", vec![], &[a.clone(), b.clone()]).unwrap();
        g.h(&a).unwrap();
        g.cx(&a, &b).unwrap();
        g.z(&b).unwrap();
        let g = g.finish();

        let handle = circuit.append(g).unwrap().c_if(&c, 1).unwrap();
        let comp = handle.as_composite().unwrap();
        assert!(comp
            .body()
            .iter()
            .all(|i| i.condition().map(|c| (c.register.as_str(), c.value)) == Some(("c", 1))));
        assert_eq!(handle.condition().unwrap().value, 1);
        assert_eq!(handle.to_string().matches("if(c==1)").count(), 3);
    }

    #[test]
    fn test_q_if_applies_to_body() {
        let (mut circuit, q, _) = setup();
        let ctrl = circuit.add_qreg("k", 1).unwrap();
        let a = q.bit(0).unwrap();
        let mut g = circuit.composite("g", vec![], &[a.clone()]).unwrap();
        g.x(&a).unwrap();
        g.z(&a).unwrap();
        let g = g.finish();

        let handle = circuit.append(g).unwrap().q_if(&[&ctrl]).unwrap();
        assert_eq!(handle.to_string(), "cx k[0],q[0];\ncz k[0],q[0];");
        assert_eq!(handle.controls(), &[BitRef::new("k", 0)]);
    }

    #[test]
    fn test_has_register_delegates_to_circuit() {
        let (circuit, q, c) = setup();
        let g = circuit.composite("g", vec![], &[q.bit(0).unwrap()]).unwrap();
        assert!(g.has_register(&q));
        assert!(g.has_register(&c));
        assert!(!g.has_register(&Register::quantum("other", 1).unwrap()));
    }
}
