//! Error types for the IR crate.

use crate::register::BitRef;
use thiserror::Error;

/// Errors that can occur while building or transforming circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// A register with this name already exists in the circuit.
    #[error("Register '{0}' already exists in circuit")]
    DuplicateRegister(String),

    /// Register size or name is not acceptable.
    #[error("Invalid register '{name}': {reason}")]
    InvalidRegister {
        /// Name of the offending register.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Composite gate name is not a usable gate identifier.
    #[error("Invalid gate name '{name}': {reason}")]
    InvalidGateName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Gate parameter is NaN or infinite.
    #[error("Gate '{gate_name}' has non-finite parameter {value}")]
    InvalidParameter {
        /// Name of the gate.
        gate_name: String,
        /// The offending value.
        value: f64,
    },

    /// Bit index outside `[0, size)`.
    #[error("Index {index} out of range for register '{register}' of size {size}")]
    IndexOutOfRange {
        /// Register name.
        register: String,
        /// Requested index.
        index: u32,
        /// Register size.
        size: u32,
    },

    /// Qubit does not resolve to a quantum register of the circuit.
    #[error("Qubit {qubit} not found in circuit{}", format_gate_context(.gate_name))]
    QubitNotInCircuit {
        /// The qubit that was not found.
        qubit: BitRef,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Register is not owned by the circuit.
    #[error("Register '{0}' not found in circuit")]
    RegisterNotInCircuit(String),

    /// Qubit used inside a composite definition is not one of its formal arguments.
    #[error("Qubit {qubit} is not an argument of gate '{gate_name}'")]
    NotQubitOfGate {
        /// The offending qubit.
        qubit: BitRef,
        /// Name of the composite under definition.
        gate_name: String,
    },

    /// Gate requires a different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },

    /// Duplicate qubit in operation.
    #[error("Duplicate qubit {qubit} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: BitRef,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Registers broadcast together have different sizes.
    #[error("Gate '{gate_name}' broadcast over registers of sizes {expected} and {got}")]
    RegisterSizeMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Size of the first register argument.
        expected: u32,
        /// Size of the mismatching register argument.
        got: u32,
    },

    /// Modifier applied where it has no meaning.
    #[error("Cannot apply {modifier} to '{gate_name}': {reason}")]
    ModifierMisuse {
        /// `c_if` or `q_if`.
        modifier: &'static str,
        /// Name of the instruction.
        gate_name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Instruction was built against another circuit.
    #[error("Instruction '{0}' belongs to another circuit; use reapply")]
    ForeignInstruction(String),
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
