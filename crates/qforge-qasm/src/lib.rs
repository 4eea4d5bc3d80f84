//! `OpenQASM` 2 Syntax Tree and Emitter for Qforge
//!
//! This crate models the textual language circuits are written in and lowers
//! [`qforge_ir::Circuit`] values into it.
//!
//! # Supported Features
//!
//! | Feature | Example |
//! |---------|---------|
//! | Version header | `OPENQASM 2.0;` |
//! | Includes | `include "qelib1.inc";` |
//! | Register declarations | `qreg q[2];`, `creg c[2];` |
//! | Gate calls | `h q[0];`, `rz(0.5) q[1];` |
//! | Built-in primitives | `U(0.5,0,1) q[0];`, `CX q[0],q[1];` |
//! | Conditionals | `if(c==1) x q[0];` |
//! | Gate declarations | `gate bell a0,a1 { h a0; cx a0,a1; }` |
//! | Barriers | `barrier q[0],q[1];` |
//! | Comments | `// comment` |
//!
//! # Example: Emitting QASM
//!
//! ```rust
//! use qforge_ir::Circuit;
//! use qforge_qasm::emit;
//!
//! let circuit = Circuit::bell().unwrap();
//!
//! let qasm = emit(&circuit).unwrap();
//! assert!(qasm.starts_with("OPENQASM 2.0;\ninclude \"qelib1.inc\";\n"));
//! assert!(qasm.contains("h q[0];"));
//! assert!(qasm.contains("cx q[0],q[1];"));
//! ```
//!
//! # Example: Declaring Composite Gates
//!
//! ```rust
//! use qforge_ir::{Attach, Circuit};
//! use qforge_qasm::{CompositeStyle, EmitOptions, emit_with};
//!
//! let mut circuit = Circuit::new("demo");
//! let q = circuit.add_qreg("q", 2).unwrap();
//! let (a, b) = (q.bit(0).unwrap(), q.bit(1).unwrap());
//!
//! let mut bell = circuit.composite("bell", vec![], &[a.clone(), b.clone()]).unwrap();
//! bell.h(&a).unwrap();
//! bell.cx(&a, &b).unwrap();
//! let bell = bell.finish();
//! circuit.append(bell).unwrap();
//!
//! let options = EmitOptions::default().with_composites(CompositeStyle::Declare);
//! let qasm = emit_with(&circuit, &options).unwrap();
//! assert!(qasm.contains("gate bell a0,a1\n{\n  h a0;\n  cx a0,a1;\n}"));
//! assert!(qasm.contains("bell q[0],q[1];"));
//! ```
//!
//! # Example: Building a Declaration
//!
//! ```rust
//! use qforge_qasm::syntax::{Argument, GateCall, GateDecl, Statement};
//!
//! let mut decl = GateDecl::new("flip", vec![], vec!["a".into()]);
//! decl += Statement::GateCall(GateCall {
//!     name: "x".into(),
//!     params: vec![],
//!     args: vec![Argument::Id("a".into())],
//! });
//! assert_eq!(decl.to_string(), "gate flip a\n{\n  x a;\n}");
//! ```

mod ast;
mod emitter;
mod error;
mod options;

pub use emitter::{declare, emit, emit_with, to_program};
pub use error::{EmitError, EmitResult};
pub use options::{CompositeStyle, EmitOptions};

// Re-export AST types for advanced users
pub mod syntax {
    pub use crate::ast::*;
}
