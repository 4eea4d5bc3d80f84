//! High-level circuit builder API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

use crate::attach::{
    Attach, AttachScope, InstructionMut, InstructionSet, check_params, condition_fits,
    with_gate_context,
};
use crate::composite::CompositeBuilder;
use crate::error::{IrError, IrResult};
use crate::gate::is_reserved_name;
use crate::instruction::Instruction;
use crate::register::{BitRef, Register, RegisterKind, RegisterTable, is_identifier};

static NEXT_CIRCUIT_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of a circuit; instructions record the circuit they belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CircuitId(u64);

impl CircuitId {
    pub(crate) fn fresh() -> Self {
        CircuitId(NEXT_CIRCUIT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A quantum circuit.
///
/// Owns its registers and the ordered instruction list. Gates are attached
/// through the [`Attach`] trait; the list only grows, except for
/// [`Circuit::inverse`] which replaces it wholesale.
#[derive(Debug)]
pub struct Circuit {
    /// Identity used to check instruction ownership.
    id: CircuitId,
    /// Name of the circuit.
    name: String,
    /// Quantum and classical registers in declaration order.
    registers: RegisterTable,
    /// The program, in order.
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CircuitId::fresh(),
            name: name.into(),
            registers: RegisterTable::new(),
            instructions: vec![],
        }
    }

    /// Add a register.
    pub fn add_register(&mut self, register: Register) -> IrResult<()> {
        debug!(circuit = %self.name, register = %register, "adding register");
        self.registers.insert(register)
    }

    /// Add a quantum register and return a handle to it.
    pub fn add_qreg(&mut self, name: impl Into<String>, size: u32) -> IrResult<Register> {
        let register = Register::new(name, RegisterKind::Quantum, size)?;
        self.add_register(register.clone())?;
        Ok(register)
    }

    /// Add a classical register and return a handle to it.
    pub fn add_creg(&mut self, name: impl Into<String>, size: u32) -> IrResult<Register> {
        let register = Register::new(name, RegisterKind::Classical, size)?;
        self.add_register(register.clone())?;
        Ok(register)
    }

    /// Start defining a composite gate over `formals`.
    ///
    /// The name must be an identifier that is not a built-in gate or keyword,
    /// the parameters finite and the formal arguments distinct qubits of this
    /// circuit.
    pub fn composite(
        &self,
        name: impl Into<String>,
        params: Vec<f64>,
        formals: &[BitRef],
    ) -> IrResult<CompositeBuilder<'_>> {
        let name = name.into();
        if !is_identifier(&name) {
            return Err(IrError::InvalidGateName {
                name,
                reason: "name must match [a-z][A-Za-z0-9_]*".into(),
            });
        }
        if is_reserved_name(&name) {
            return Err(IrError::InvalidGateName {
                name,
                reason: "name is a built-in gate or keyword".into(),
            });
        }
        check_params(&name, &params)?;
        AttachScope::circuit(&self.registers).check_operands(&name, None, formals)?;
        Ok(CompositeBuilder::new(
            &self.registers,
            self.id,
            name,
            params,
            formals.to_vec(),
        ))
    }

    /// Attach a copy of `source`, possibly built on another circuit.
    ///
    /// The copy keeps the source's condition, controls and inversion state.
    /// Every qubit, control and condition register must resolve in this
    /// circuit by name; otherwise nothing is attached.
    pub fn reapply(&mut self, source: &Instruction) -> IrResult<InstructionMut<'_>> {
        check_portable(&self.registers, source)?;
        let mut instruction = source.clone();
        instruction.rebind(self.id);
        debug!(circuit = %self.name, instruction = instruction.name(), "reapplied instruction");
        Ok(self.attach(instruction))
    }

    /// Reapply every instruction of `other`, in order. All or nothing.
    pub fn extend(&mut self, other: &Circuit) -> IrResult<&mut Self> {
        for instruction in &other.instructions {
            check_portable(&self.registers, instruction)?;
        }
        let id = self.id;
        self.instructions.extend(other.instructions.iter().map(|inst| {
            let mut inst = inst.clone();
            inst.rebind(id);
            inst
        }));
        debug!(
            circuit = %self.name,
            from = %other.name,
            added = other.instructions.len(),
            "extended circuit"
        );
        Ok(self)
    }

    /// Replace the program by its inverse: reversed, each element inverted.
    pub fn inverse(&mut self) -> &mut Self {
        self.instructions.reverse();
        for instruction in &mut self.instructions {
            instruction.invert();
        }
        debug!(circuit = %self.name, ops = self.instructions.len(), "inverted circuit");
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit identity.
    pub fn id(&self) -> CircuitId {
        self.id
    }

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers in declaration order.
    pub fn registers(&self) -> &RegisterTable {
        &self.registers
    }

    /// Look up a register by name.
    pub fn register(&self, name: &str) -> Option<&Register> {
        self.registers.get(name)
    }

    /// The program.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of top-level instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Check if no instruction is attached.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.registers.num_qubits()
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.registers.num_clbits()
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Create a Bell state circuit.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::new("bell");
        let q = circuit.add_qreg("q", 2)?;
        circuit.add_creg("c", 2)?;
        let (q0, q1) = (q.bit(0)?, q.bit(1)?);

        circuit.h(&q0)?;
        circuit.cx(&q0, &q1)?;

        Ok(circuit)
    }

    /// Create a GHZ state circuit.
    pub fn ghz(n: u32) -> IrResult<Self> {
        let mut circuit = Self::new("ghz");
        let q = circuit.add_qreg("q", n)?;
        circuit.add_creg("c", n)?;

        circuit.h(&q.bit(0)?)?;
        for i in 0..n - 1 {
            circuit.cx(&q.bit(i)?, &q.bit(i + 1)?)?;
        }

        Ok(circuit)
    }

    /// Create a QFT circuit (without measurements).
    pub fn qft(n: u32) -> IrResult<Self> {
        use std::f64::consts::PI;

        let mut circuit = Self::new("qft");
        let q = circuit.add_qreg("q", n)?;

        for i in 0..n {
            circuit.h(&q.bit(i)?)?;

            // Controlled rotations
            for j in (i + 1)..n {
                let angle = PI / f64::from(j - i).exp2();
                circuit.cu1(angle, &q.bit(j)?, &q.bit(i)?)?;
            }
        }

        // Swap qubits for bit reversal
        for i in 0..n / 2 {
            circuit.swap(&q.bit(i)?, &q.bit(n - 1 - i)?)?;
        }

        Ok(circuit)
    }
}

/// Check that `instruction` can live in a circuit with `registers`.
fn check_portable(registers: &RegisterTable, instruction: &Instruction) -> IrResult<()> {
    for qubit in instruction.operands() {
        registers
            .check_qubit(qubit)
            .map_err(|e| with_gate_context(e, instruction.name()))?;
    }
    if let Some(condition) = instruction.condition() {
        let creg = registers.classical(&condition.register)?;
        if !condition_fits(creg, condition.value) {
            return Err(IrError::ModifierMisuse {
                modifier: "c_if",
                gate_name: instruction.name().to_string(),
                reason: format!("value does not fit register '{}'", creg.name()),
            });
        }
    }
    if let Some(composite) = instruction.as_composite() {
        for inst in composite.body() {
            check_portable(registers, inst)?;
        }
    }
    Ok(())
}

impl Attach for Circuit {
    fn scope(&self) -> AttachScope<'_> {
        AttachScope::circuit(&self.registers)
    }

    fn circuit_id(&self) -> CircuitId {
        self.id
    }

    fn attach(&mut self, instruction: Instruction) -> InstructionMut<'_> {
        trace!(circuit = %self.name, instruction = instruction.name(), "attaching");
        self.instructions.push(instruction);
        let last = self.instructions.len() - 1;
        InstructionMut::new(
            AttachScope::circuit(&self.registers),
            &mut self.instructions[last],
        )
    }

    fn attach_all(&mut self, instructions: Vec<Instruction>) -> InstructionSet<'_> {
        let start = self.instructions.len();
        self.instructions.extend(instructions);
        InstructionSet::new(
            AttachScope::circuit(&self.registers),
            &mut self.instructions[start..],
        )
    }
}

impl Clone for Circuit {
    /// The clone is a new circuit: it gets a fresh identity and its
    /// instructions are rebound to it.
    fn clone(&self) -> Self {
        let id = CircuitId::fresh();
        let instructions = self
            .instructions
            .iter()
            .map(|inst| {
                let mut inst = inst.clone();
                inst.rebind(id);
                inst
            })
            .collect();
        Self {
            id,
            name: self.name.clone(),
            registers: self.registers.clone(),
            instructions,
        }
    }
}

impl fmt::Display for Circuit {
    /// The program body, one statement per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for instruction in &self.instructions {
            let text = instruction.to_string();
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
}
