//! The attachment protocol shared by circuits and composite definitions.
//!
//! Every gate-application call validates all of its operands before touching
//! the container, so a failed call leaves the instruction list unchanged.
//! Successful calls return a handle on which the modifiers `inverse`, `c_if`
//! and `q_if` can be chained.

use rustc_hash::FxHashSet;
use std::ops::Deref;
use std::slice;
use tracing::trace;

use crate::circuit::CircuitId;
use crate::error::{IrError, IrResult};
use crate::gate::{ClassicalCondition, StandardGate};
use crate::instruction::Instruction;
use crate::register::{BitRef, Register, RegisterTable};

/// What operands are allowed to refer to in one container.
#[derive(Debug, Clone, Copy)]
pub struct AttachScope<'a> {
    registers: &'a RegisterTable,
    formals: Option<(&'a str, &'a [BitRef])>,
}

impl<'a> AttachScope<'a> {
    /// Top level of a circuit: any qubit of its quantum registers.
    pub fn circuit(registers: &'a RegisterTable) -> Self {
        Self {
            registers,
            formals: None,
        }
    }

    /// Inside a composite definition: only its formal arguments.
    pub fn composite(registers: &'a RegisterTable, gate_name: &'a str, formals: &'a [BitRef]) -> Self {
        Self {
            registers,
            formals: Some((gate_name, formals)),
        }
    }

    /// Registers of the owning circuit.
    pub fn registers(&self) -> &'a RegisterTable {
        self.registers
    }

    /// Fail unless `qubit` may be used in this scope.
    pub fn check_qubit(&self, qubit: &BitRef) -> IrResult<()> {
        self.registers.check_qubit(qubit)?;
        if let Some((gate_name, formals)) = self.formals {
            if !formals.contains(qubit) {
                return Err(IrError::NotQubitOfGate {
                    qubit: qubit.clone(),
                    gate_name: gate_name.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Check arity, membership and distinctness of an operand list.
    pub fn check_operands(
        &self,
        gate_name: &str,
        expected: Option<u32>,
        qubits: &[BitRef],
    ) -> IrResult<()> {
        if let Some(expected) = expected {
            let got = u32::try_from(qubits.len()).unwrap_or(u32::MAX);
            if got != expected {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate_name.to_string(),
                    expected,
                    got,
                });
            }
        }
        let mut seen = FxHashSet::default();
        for qubit in qubits {
            self.check_qubit(qubit)
                .map_err(|e| with_gate_context(e, gate_name))?;
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit: qubit.clone(),
                    gate_name: Some(gate_name.to_string()),
                });
            }
        }
        Ok(())
    }

    fn check_condition(
        &self,
        instruction: &Instruction,
        creg: &Register,
        value: u64,
    ) -> IrResult<ClassicalCondition> {
        let misuse = |reason: &str| IrError::ModifierMisuse {
            modifier: "c_if",
            gate_name: instruction.name().to_string(),
            reason: reason.to_string(),
        };
        if instruction.is_barrier() {
            return Err(misuse("barriers cannot be conditioned"));
        }
        if creg.is_quantum() {
            return Err(misuse("condition register must be classical"));
        }
        self.registers.check_creg(creg)?;
        if !condition_fits(creg, value) {
            return Err(misuse("value does not fit register"));
        }
        Ok(ClassicalCondition::new(creg.name(), value))
    }

    fn check_controls(&self, instruction: &Instruction, qregs: &[&Register]) -> IrResult<Vec<BitRef>> {
        if instruction.is_barrier() {
            return Err(IrError::ModifierMisuse {
                modifier: "q_if",
                gate_name: instruction.name().to_string(),
                reason: "barriers cannot be controlled".into(),
            });
        }
        let taken: FxHashSet<&BitRef> = instruction.operands().collect();
        let mut controls = vec![];
        for register in qregs {
            self.registers.check_qreg(register)?;
            for bit in register.bits() {
                self.check_qubit(&bit)
                    .map_err(|e| with_gate_context(e, instruction.name()))?;
                if taken.contains(&bit) || controls.contains(&bit) {
                    return Err(IrError::DuplicateQubit {
                        qubit: bit,
                        gate_name: Some(instruction.name().to_string()),
                    });
                }
                controls.push(bit);
            }
        }
        Ok(controls)
    }
}

/// Fail if any parameter of `gate_name` is NaN or infinite.
pub(crate) fn check_params(gate_name: &str, params: &[f64]) -> IrResult<()> {
    match params.iter().find(|p| !p.is_finite()) {
        Some(&value) => Err(IrError::InvalidParameter {
            gate_name: gate_name.to_string(),
            value,
        }),
        None => Ok(()),
    }
}

/// Whether `value` is representable in `creg.size()` bits.
pub(crate) fn condition_fits(creg: &Register, value: u64) -> bool {
    creg.size() >= 64 || value >> creg.size() == 0
}

/// Attach the gate name to a context-free qubit error.
pub(crate) fn with_gate_context(err: IrError, name: &str) -> IrError {
    match err {
        IrError::QubitNotInCircuit {
            qubit,
            gate_name: None,
        } => IrError::QubitNotInCircuit {
            qubit,
            gate_name: Some(name.to_string()),
        },
        other => other,
    }
}

/// One operand of a broadcast application.
#[derive(Debug, Clone, Copy)]
pub enum QubitArg<'a> {
    /// A single position.
    Bit(&'a BitRef),
    /// Every position of a register, one application each.
    Register(&'a Register),
}

impl<'a> From<&'a BitRef> for QubitArg<'a> {
    fn from(bit: &'a BitRef) -> Self {
        QubitArg::Bit(bit)
    }
}

impl<'a> From<&'a Register> for QubitArg<'a> {
    fn from(register: &'a Register) -> Self {
        QubitArg::Register(register)
    }
}

/// Handle to a freshly attached instruction.
#[derive(Debug)]
pub struct InstructionMut<'a> {
    scope: AttachScope<'a>,
    instruction: &'a mut Instruction,
}

impl<'a> InstructionMut<'a> {
    /// Wrap an instruction owned by the container that `scope` describes.
    pub fn new(scope: AttachScope<'a>, instruction: &'a mut Instruction) -> Self {
        Self { scope, instruction }
    }

    /// Invert the instruction in place.
    pub fn inverse(self) -> Self {
        self.instruction.invert();
        self
    }

    /// Execute only if `creg` holds `value`.
    ///
    /// On a composite the guard is copied onto every body element.
    pub fn c_if(self, creg: &Register, value: u64) -> IrResult<Self> {
        let condition = self.scope.check_condition(self.instruction, creg, value)?;
        self.instruction.set_condition(&condition);
        Ok(self)
    }

    /// Add every qubit of `qregs` as a control.
    ///
    /// On a composite the controls are added to every body element.
    pub fn q_if(self, qregs: &[&Register]) -> IrResult<Self> {
        let controls = self.scope.check_controls(self.instruction, qregs)?;
        self.instruction.add_controls(&controls);
        Ok(self)
    }

    /// Borrow the instruction.
    pub fn get(&self) -> &Instruction {
        self.instruction
    }
}

impl Deref for InstructionMut<'_> {
    type Target = Instruction;

    fn deref(&self) -> &Instruction {
        self.instruction
    }
}

/// Handle to the instructions produced by one broadcast application.
#[derive(Debug)]
pub struct InstructionSet<'a> {
    scope: AttachScope<'a>,
    instructions: &'a mut [Instruction],
}

impl<'a> InstructionSet<'a> {
    /// Wrap a run of instructions owned by the container that `scope` describes.
    pub fn new(scope: AttachScope<'a>, instructions: &'a mut [Instruction]) -> Self {
        Self {
            scope,
            instructions,
        }
    }

    /// Invert every member in place; the order of the set is kept.
    pub fn inverse(self) -> Self {
        for inst in self.instructions.iter_mut() {
            inst.invert();
        }
        self
    }

    /// Guard every member. Either all members are guarded or none.
    pub fn c_if(self, creg: &Register, value: u64) -> IrResult<Self> {
        let mut conditions = Vec::with_capacity(self.instructions.len());
        for inst in self.instructions.iter() {
            conditions.push(self.scope.check_condition(inst, creg, value)?);
        }
        for (inst, condition) in self.instructions.iter_mut().zip(&conditions) {
            inst.set_condition(condition);
        }
        Ok(self)
    }

    /// Control every member. Either all members are controlled or none.
    pub fn q_if(self, qregs: &[&Register]) -> IrResult<Self> {
        let mut controls = Vec::with_capacity(self.instructions.len());
        for inst in self.instructions.iter() {
            controls.push(self.scope.check_controls(inst, qregs)?);
        }
        for (inst, bits) in self.instructions.iter_mut().zip(&controls) {
            inst.add_controls(bits);
        }
        Ok(self)
    }

    /// Number of instructions in the set.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Iterate in application order.
    pub fn iter(&self) -> slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }
}

/// A container gates can be attached to: a [`crate::Circuit`] or a
/// [`crate::CompositeBuilder`].
pub trait Attach {
    /// Validation scope of this container.
    fn scope(&self) -> AttachScope<'_>;

    /// Identity of the owning circuit.
    fn circuit_id(&self) -> CircuitId;

    /// Push an already validated instruction.
    fn attach(&mut self, instruction: Instruction) -> InstructionMut<'_>;

    /// Push already validated instructions in order.
    fn attach_all(&mut self, instructions: Vec<Instruction>) -> InstructionSet<'_>;

    /// Whether the owning circuit has this register.
    fn has_register(&self, register: &Register) -> bool {
        self.scope().registers().contains(register)
    }

    /// Apply `gate` to `qubits`.
    fn apply(&mut self, gate: StandardGate, qubits: &[BitRef]) -> IrResult<InstructionMut<'_>> {
        check_params(gate.name(), &gate.parameters())?;
        self.scope()
            .check_operands(gate.name(), Some(gate.num_qubits()), qubits)?;
        let instruction = Instruction::gate(gate, qubits.to_vec(), self.circuit_id());
        Ok(self.attach(instruction))
    }

    /// Apply `gate` once per register position.
    ///
    /// Register arguments must all have the same size `n`; the result holds
    /// `n` instructions in ascending index order. Bit arguments are repeated
    /// in every application.
    fn apply_broadcast(
        &mut self,
        gate: StandardGate,
        args: &[QubitArg<'_>],
    ) -> IrResult<InstructionSet<'_>> {
        let name = gate.name();
        check_params(name, &gate.parameters())?;
        let arity = gate.num_qubits();
        let got = u32::try_from(args.len()).unwrap_or(u32::MAX);
        if got != arity {
            return Err(IrError::QubitCountMismatch {
                gate_name: name.to_string(),
                expected: arity,
                got,
            });
        }

        let scope = self.scope();
        let mut width = None;
        for arg in args {
            if let QubitArg::Register(register) = arg {
                scope.registers().check_qreg(register)?;
                match width {
                    None => width = Some(register.size()),
                    Some(w) if w != register.size() => {
                        return Err(IrError::RegisterSizeMismatch {
                            gate_name: name.to_string(),
                            expected: w,
                            got: register.size(),
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        let circuit = self.circuit_id();
        let mut expanded = vec![];
        for index in 0..width.unwrap_or(1) {
            let qubits: Vec<BitRef> = args
                .iter()
                .map(|arg| match arg {
                    QubitArg::Bit(bit) => (*bit).clone(),
                    QubitArg::Register(register) => BitRef::new(register.name(), index),
                })
                .collect();
            scope.check_operands(name, Some(arity), &qubits)?;
            trace!(gate = name, index, "expanded broadcast application");
            expanded.push(Instruction::gate(gate.clone(), qubits, circuit));
        }
        Ok(self.attach_all(expanded))
    }

    /// Attach a composite built with [`crate::Circuit::composite`].
    fn append(&mut self, instruction: Instruction) -> IrResult<InstructionMut<'_>> {
        if instruction.circuit() != self.circuit_id() {
            return Err(IrError::ForeignInstruction(instruction.name().to_string()));
        }
        let operands: Vec<BitRef> = instruction.operands().cloned().collect();
        self.scope()
            .check_operands(instruction.name(), None, &operands)?;
        Ok(self.attach(instruction))
    }

    /// Barrier over the given qubits.
    fn barrier(&mut self, qubits: &[BitRef]) -> IrResult<InstructionMut<'_>> {
        self.scope().check_operands("barrier", None, qubits)?;
        let instruction = Instruction::barrier(qubits.to_vec(), self.circuit_id());
        Ok(self.attach(instruction))
    }

    /// Barrier over every qubit of the given registers.
    fn barrier_reg(&mut self, registers: &[&Register]) -> IrResult<InstructionMut<'_>> {
        let mut qubits = vec![];
        for register in registers {
            self.scope().registers().check_qreg(register)?;
            qubits.extend(register.bits());
        }
        self.barrier(&qubits)
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply identity gate.
    fn id(&mut self, q: &BitRef) -> IrResult<InstructionMut<'_>> {
        self.apply(StandardGate::I, slice::from_ref(q))
    }

    /// Apply Pauli-X gate.
    fn x(&mut self, q: &BitRef) -> IrResult<InstructionMut<'_>> {
        self.apply(StandardGate::X, slice::from_ref(q))
    }

    /// Apply Pauli-Y gate.
    fn y(&mut self, q: &BitRef) -> IrResult<InstructionMut<'_>> {
        self.apply(StandardGate::Y, slice::from_ref(q))
    }

    /// Apply Pauli-Z (phase-flip) gate.
    fn z(&mut self, q: &BitRef) -> IrResult<InstructionMut<'_>> {
        self.apply(StandardGate::Z, slice::from_ref(q))
    }

    /// Apply Hadamard gate.
    fn h(&mut self, q: &BitRef) -> IrResult<InstructionMut<'_>> {
        self.apply(StandardGate::H, slice::from_ref(q))
    }

    /// Apply S gate.
    fn s(&mut self, q: &BitRef) -> IrResult<InstructionMut<'_>> {
        self.apply(StandardGate::S, slice::from_ref(q))
    }

    /// Apply S-dagger gate.
    fn sdg(&mut self, q: &BitRef) -> IrResult<InstructionMut<'_>> {
        self.apply(StandardGate::Sdg, slice::from_ref(q))
    }

    /// Apply T gate.
    fn t(&mut self, q: &BitRef) -> IrResult<InstructionMut<'_>> {
        self.apply(StandardGate::T, slice::from_ref(q))
    }

    /// Apply T-dagger gate.
    fn tdg(&mut self, q: &BitRef) -> IrResult<InstructionMut<'_>> {
        self.apply(StandardGate::Tdg, slice::from_ref(q))
    }

    /// Apply sqrt(X) gate.
    fn sx(&mut self, q: &BitRef) -> IrResult<InstructionMut<'_>> {
        self.apply(StandardGate::SX, slice::from_ref(q))
    }

    /// Apply sqrt(X)-dagger gate.
    fn sxdg(&mut self, q: &BitRef) -> IrResult<InstructionMut<'_>> {
        self.apply(StandardGate::SXdg, slice::from_ref(q))
    }

    /// Apply Rx rotation gate.
    fn rx(&mut self, theta: f64, q: &BitRef) -> IrResult<InstructionMut<'_>> {
        self.apply(StandardGate::Rx(theta), slice::from_ref(q))
    }

    /// Apply Ry rotation gate.
    fn ry(&mut self, theta: f64, q: &BitRef) -> IrResult<InstructionMut<'_>> {
        self.apply(StandardGate::Ry(theta), slice::from_ref(q))
    }

    /// Apply Rz rotation gate.
    fn rz(&mut self, theta: f64, q: &BitRef) -> IrResult<InstructionMut<'_>> {
        self.apply(StandardGate::Rz(theta), slice::from_ref(q))
    }

    /// Apply phase gate.
    fn u1(&mut self, lambda: f64, q: &BitRef) -> IrResult<InstructionMut<'_>> {
        self.apply(StandardGate::U1(lambda), slice::from_ref(q))
    }

    /// Apply universal single-qubit gate.
    fn u3(&mut self, theta: f64, phi: f64, lambda: f64, q: &BitRef) -> IrResult<InstructionMut<'_>> {
        self.apply(StandardGate::U3(theta, phi, lambda), slice::from_ref(q))
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    fn cx(&mut self, control: &BitRef, target: &BitRef) -> IrResult<InstructionMut<'_>> {
        self.apply(StandardGate::CX, &[control.clone(), target.clone()])
    }

    /// Apply CY gate.
    fn cy(&mut self, control: &BitRef, target: &BitRef) -> IrResult<InstructionMut<'_>> {
        self.apply(StandardGate::CY, &[control.clone(), target.clone()])
    }

    /// Apply CZ gate.
    fn cz(&mut self, control: &BitRef, target: &BitRef) -> IrResult<InstructionMut<'_>> {
        self.apply(StandardGate::CZ, &[control.clone(), target.clone()])
    }

    /// Apply controlled-Hadamard gate.
    fn ch(&mut self, control: &BitRef, target: &BitRef) -> IrResult<InstructionMut<'_>> {
        self.apply(StandardGate::CH, &[control.clone(), target.clone()])
    }

    /// Apply SWAP gate.
    fn swap(&mut self, q1: &BitRef, q2: &BitRef) -> IrResult<InstructionMut<'_>> {
        self.apply(StandardGate::Swap, &[q1.clone(), q2.clone()])
    }

    /// Apply controlled-Rx gate.
    fn crx(&mut self, theta: f64, control: &BitRef, target: &BitRef) -> IrResult<InstructionMut<'_>> {
        self.apply(StandardGate::CRx(theta), &[control.clone(), target.clone()])
    }

    /// Apply controlled-Ry gate.
    fn cry(&mut self, theta: f64, control: &BitRef, target: &BitRef) -> IrResult<InstructionMut<'_>> {
        self.apply(StandardGate::CRy(theta), &[control.clone(), target.clone()])
    }

    /// Apply controlled-Rz gate.
    fn crz(&mut self, theta: f64, control: &BitRef, target: &BitRef) -> IrResult<InstructionMut<'_>> {
        self.apply(StandardGate::CRz(theta), &[control.clone(), target.clone()])
    }

    /// Apply controlled-phase gate.
    fn cu1(&mut self, lambda: f64, control: &BitRef, target: &BitRef) -> IrResult<InstructionMut<'_>> {
        self.apply(StandardGate::CU1(lambda), &[control.clone(), target.clone()])
    }

    /// Apply RXX (XX rotation) gate.
    fn rxx(&mut self, theta: f64, q1: &BitRef, q2: &BitRef) -> IrResult<InstructionMut<'_>> {
        self.apply(StandardGate::RXX(theta), &[q1.clone(), q2.clone()])
    }

    /// Apply RYY (YY rotation) gate.
    fn ryy(&mut self, theta: f64, q1: &BitRef, q2: &BitRef) -> IrResult<InstructionMut<'_>> {
        self.apply(StandardGate::RYY(theta), &[q1.clone(), q2.clone()])
    }

    /// Apply RZZ (ZZ rotation) gate.
    fn rzz(&mut self, theta: f64, q1: &BitRef, q2: &BitRef) -> IrResult<InstructionMut<'_>> {
        self.apply(StandardGate::RZZ(theta), &[q1.clone(), q2.clone()])
    }

    // =========================================================================
    // Three-qubit gates
    // =========================================================================

    /// Apply Toffoli (CCX) gate.
    fn ccx(&mut self, c1: &BitRef, c2: &BitRef, target: &BitRef) -> IrResult<InstructionMut<'_>> {
        self.apply(StandardGate::CCX, &[c1.clone(), c2.clone(), target.clone()])
    }

    /// Apply Fredkin (CSWAP) gate.
    fn cswap(&mut self, control: &BitRef, t1: &BitRef, t2: &BitRef) -> IrResult<InstructionMut<'_>> {
        self.apply(StandardGate::CSwap, &[control.clone(), t1.clone(), t2.clone()])
    }

    // =========================================================================
    // Register broadcasts
    // =========================================================================

    /// Apply Pauli-X to every qubit of `q`.
    fn x_reg(&mut self, q: &Register) -> IrResult<InstructionSet<'_>> {
        self.apply_broadcast(StandardGate::X, &[q.into()])
    }

    /// Apply Pauli-Z to every qubit of `q`.
    fn z_reg(&mut self, q: &Register) -> IrResult<InstructionSet<'_>> {
        self.apply_broadcast(StandardGate::Z, &[q.into()])
    }

    /// Apply Hadamard to every qubit of `q`.
    fn h_reg(&mut self, q: &Register) -> IrResult<InstructionSet<'_>> {
        self.apply_broadcast(StandardGate::H, &[q.into()])
    }

    /// Apply CX pairwise between two registers of equal size.
    fn cx_reg(&mut self, control: &Register, target: &Register) -> IrResult<InstructionSet<'_>> {
        self.apply_broadcast(StandardGate::CX, &[control.into(), target.into()])
    }
}
