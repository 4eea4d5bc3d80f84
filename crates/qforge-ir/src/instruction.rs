//! Circuit instructions combining operations with operands.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::circuit::CircuitId;
use crate::composite::CompositeGate;
use crate::gate::{ClassicalCondition, StandardGate};
use crate::register::BitRef;

/// The kind of instruction in a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// An atomic gate with fixed semantics.
    Gate(StandardGate),
    /// A named macro over an ordered body of instructions.
    Composite(CompositeGate),
    /// Barrier (structural marker, not a unitary).
    Barrier,
}

/// An operation attached to a circuit or to a composite under definition.
///
/// Instructions are created only through the attachment protocol
/// ([`crate::Attach`]), which validates every operand first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub(crate) kind: InstructionKind,
    pub(crate) qubits: Vec<BitRef>,
    pub(crate) condition: Option<ClassicalCondition>,
    pub(crate) controls: Vec<BitRef>,
    pub(crate) circuit: CircuitId,
}

impl Instruction {
    pub(crate) fn gate(gate: StandardGate, qubits: Vec<BitRef>, circuit: CircuitId) -> Self {
        Self::with_kind(InstructionKind::Gate(gate), qubits, circuit)
    }

    pub(crate) fn barrier(qubits: Vec<BitRef>, circuit: CircuitId) -> Self {
        Self::with_kind(InstructionKind::Barrier, qubits, circuit)
    }

    pub(crate) fn composite(gate: CompositeGate, qubits: Vec<BitRef>, circuit: CircuitId) -> Self {
        Self::with_kind(InstructionKind::Composite(gate), qubits, circuit)
    }

    fn with_kind(kind: InstructionKind, qubits: Vec<BitRef>, circuit: CircuitId) -> Self {
        Self {
            kind,
            qubits,
            condition: None,
            controls: vec![],
            circuit,
        }
    }

    /// The kind of instruction.
    pub fn kind(&self) -> &InstructionKind {
        &self.kind
    }

    /// Operation identifier (`"z"`, `"cx"`, the composite's name, `"barrier"`).
    pub fn name(&self) -> &str {
        match &self.kind {
            InstructionKind::Gate(g) => g.name(),
            InstructionKind::Composite(c) => c.name(),
            InstructionKind::Barrier => "barrier",
        }
    }

    /// Numeric parameters.
    pub fn params(&self) -> Vec<f64> {
        match &self.kind {
            InstructionKind::Gate(g) => g.parameters(),
            InstructionKind::Composite(c) => c.params().to_vec(),
            InstructionKind::Barrier => vec![],
        }
    }

    /// Target qubits; for a composite these are its formal arguments.
    pub fn qubits(&self) -> &[BitRef] {
        &self.qubits
    }

    /// Control qubits added with `q_if`.
    pub fn controls(&self) -> &[BitRef] {
        &self.controls
    }

    /// Classical guard added with `c_if`.
    pub fn condition(&self) -> Option<&ClassicalCondition> {
        self.condition.as_ref()
    }

    /// Identity of the owning circuit.
    pub fn circuit(&self) -> CircuitId {
        self.circuit
    }

    /// Check if this is an atomic gate.
    pub fn is_gate(&self) -> bool {
        matches!(self.kind, InstructionKind::Gate(_))
    }

    /// Check if this is a composite gate.
    pub fn is_composite(&self) -> bool {
        matches!(self.kind, InstructionKind::Composite(_))
    }

    /// Check if this is a barrier.
    pub fn is_barrier(&self) -> bool {
        matches!(self.kind, InstructionKind::Barrier)
    }

    /// Get the atomic gate, if any.
    pub fn as_gate(&self) -> Option<&StandardGate> {
        match &self.kind {
            InstructionKind::Gate(g) => Some(g),
            _ => None,
        }
    }

    /// Get the composite, if any.
    pub fn as_composite(&self) -> Option<&CompositeGate> {
        match &self.kind {
            InstructionKind::Composite(c) => Some(c),
            _ => None,
        }
    }

    /// Name as written in text: one `c` per control qubit, then the gate name.
    pub fn qasm_name(&self) -> String {
        format!("{}{}", "c".repeat(self.controls.len()), self.name())
    }

    /// Controls followed by targets, the order they are written in text.
    pub fn operands(&self) -> impl Iterator<Item = &BitRef> {
        self.controls.iter().chain(self.qubits.iter())
    }

    /// An independent inverted copy.
    #[must_use]
    pub fn inverse(&self) -> Instruction {
        let mut inverted = self.clone();
        inverted.invert();
        inverted
    }

    /// Invert in place. Barriers are left unchanged.
    pub(crate) fn invert(&mut self) {
        match &mut self.kind {
            InstructionKind::Gate(g) => *g = g.inverse(),
            InstructionKind::Composite(c) => c.invert(),
            InstructionKind::Barrier => {}
        }
    }

    /// Set the guard here and on every non-barrier body element.
    pub(crate) fn set_condition(&mut self, condition: &ClassicalCondition) {
        self.condition = Some(condition.clone());
        if let InstructionKind::Composite(c) = &mut self.kind {
            for inst in c.body_mut().iter_mut().filter(|i| !i.is_barrier()) {
                inst.set_condition(condition);
            }
        }
    }

    /// Extend the control set here and on every non-barrier body element.
    pub(crate) fn add_controls(&mut self, controls: &[BitRef]) {
        self.controls.extend_from_slice(controls);
        if let InstructionKind::Composite(c) = &mut self.kind {
            for inst in c.body_mut().iter_mut().filter(|i| !i.is_barrier()) {
                inst.add_controls(controls);
            }
        }
    }

    /// Move ownership to another circuit, body included.
    pub(crate) fn rebind(&mut self, circuit: CircuitId) {
        self.circuit = circuit;
        if let InstructionKind::Composite(c) = &mut self.kind {
            for inst in c.body_mut() {
                inst.rebind(circuit);
            }
        }
    }
}

/// Format a parameter list as `(a,b,c)`, or nothing when empty.
pub fn format_params(params: &[f64]) -> String {
    if params.is_empty() {
        return String::new();
    }
    let inner: Vec<String> = params.iter().map(ToString::to_string).collect();
    format!("({})", inner.join(","))
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            InstructionKind::Composite(c) => {
                let mut first = true;
                for inst in c.body() {
                    let text = inst.to_string();
                    if text.is_empty() {
                        continue;
                    }
                    if !first {
                        f.write_str("\n")?;
                    }
                    f.write_str(&text)?;
                    first = false;
                }
                Ok(())
            }
            InstructionKind::Gate(g) => {
                if let Some(cond) = &self.condition {
                    write!(f, "if({}=={}) ", cond.register, cond.value)?;
                }
                let operands: Vec<String> = self.operands().map(ToString::to_string).collect();
                write!(
                    f,
                    "{}{} {};",
                    self.qasm_name(),
                    format_params(&g.parameters()),
                    operands.join(",")
                )
            }
            InstructionKind::Barrier => {
                let operands: Vec<String> = self.qubits.iter().map(ToString::to_string).collect();
                write!(f, "barrier {};", operands.join(","))
            }
        }
    }
}
