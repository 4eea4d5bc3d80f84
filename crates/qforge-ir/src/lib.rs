//! Qforge Circuit Intermediate Representation
//!
//! This crate provides the circuit model of Qforge: registers, gates, the
//! instructions that apply them, and the attachment protocol every gate goes
//! through. It is the foundation the QASM emitter and the backend
//! interfaces build on.
//!
//! # Overview
//!
//! A [`Circuit`] owns named quantum and classical registers and an ordered
//! list of instructions. Gates are attached through the [`Attach`] trait,
//! which validates every operand before anything is stored: a failed call
//! leaves the circuit exactly as it was. Each successful call returns a
//! handle that accepts the modifiers `inverse`, `c_if` and `q_if`.
//!
//! # Core Components
//!
//! - **Registers**: [`Register`] and [`BitRef`] for addressing positions
//! - **Gates**: [`StandardGate`] for built-in gates and their inverses
//! - **Composites**: [`CompositeGate`] for named macros built with a [`CompositeBuilder`]
//! - **Instructions**: [`Instruction`] combining a gate with its operands and modifiers
//! - **Circuit**: [`Circuit`] high-level builder API
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qforge_ir::{Attach, Circuit};
//!
//! let mut circuit = Circuit::new("bell_state");
//! let q = circuit.add_qreg("q", 2).unwrap();
//! let c = circuit.add_creg("c", 2).unwrap();
//!
//! circuit.h(&q.bit(0).unwrap()).unwrap();
//! circuit.cx(&q.bit(0).unwrap(), &q.bit(1).unwrap()).unwrap();
//! circuit.x(&q.bit(1).unwrap()).unwrap().c_if(&c, 1).unwrap();
//!
//! assert_eq!(circuit.to_string(), "h q[0];\ncx q[0],q[1];\nif(c==1) x q[1];");
//! ```
//!
//! # Example: Broadcast and Inversion
//!
//! ```rust
//! use qforge_ir::{Attach, Circuit};
//!
//! let mut circuit = Circuit::new("layer");
//! let q = circuit.add_qreg("q", 3).unwrap();
//!
//! circuit.h_reg(&q).unwrap();
//! circuit.t(&q.bit(0).unwrap()).unwrap().inverse();
//!
//! assert_eq!(circuit.len(), 4);
//! assert!(circuit.to_string().ends_with("tdg q[0];"));
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `id`, `x`, `y`, `z` | 1 | Identity and Pauli gates |
//! | `h` | 1 | Hadamard gate |
//! | `s`, `sdg`, `t`, `tdg` | 1 | Phase gates and their inverses |
//! | `sx`, `sxdg` | 1 | sqrt(X) and its inverse |
//! | `rx`, `ry`, `rz`, `u1` | 1 | Rotation and phase gates |
//! | `u3` | 1 | Universal single-qubit gate U(θ,φ,λ) |
//! | `cx`, `cy`, `cz`, `ch` | 2 | Controlled gates |
//! | `crx`, `cry`, `crz`, `cu1` | 2 | Controlled rotations |
//! | `rxx`, `ryy`, `rzz` | 2 | Two-qubit rotations |
//! | `swap` | 2 | SWAP gate |
//! | `ccx`, `cswap` | 3 | Toffoli and Fredkin gates |

pub mod attach;
pub mod circuit;
pub mod composite;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod register;

pub use attach::{Attach, AttachScope, InstructionMut, InstructionSet, QubitArg};
pub use circuit::{Circuit, CircuitId};
pub use composite::{CompositeBuilder, CompositeGate};
pub use error::{IrError, IrResult};
pub use gate::{ClassicalCondition, KEYWORDS, QELIB1_GATES, StandardGate, is_reserved_name};
pub use instruction::{Instruction, InstructionKind, format_params};
pub use register::{BitRef, Register, RegisterKind, RegisterTable};
