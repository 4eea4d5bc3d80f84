//! Qforge Hardware Abstraction Layer
//!
//! This crate describes the collaborators that consume finished circuits:
//! execution backends, classical optimizers and expectation estimators.
//! It defines their interfaces and data types only; concrete simulators,
//! devices and numerical methods live elsewhere.
//!
//! # Overview
//!
//! - A common [`Backend`] trait for batch execution, configured by [`RunConfig`]
//! - Unified result handling via [`ExecutionResult`] and [`Counts`]
//! - An [`Optimizer`] trait for variational loops
//! - An [`Estimator`] trait reading [`PauliString`] expectations from histograms
//!
//! # Example: Implementing a Backend
//!
//! ```rust
//! use async_trait::async_trait;
//! use qforge_hal::{Backend, Counts, ExecutionResult, HalResult, RunConfig};
//! use qforge_ir::Circuit;
//!
//! struct AllZeros;
//!
//! #[async_trait]
//! impl Backend for AllZeros {
//!     fn name(&self) -> &str {
//!         "all_zeros"
//!     }
//!
//!     async fn run(
//!         &self,
//!         circuits: &[Circuit],
//!         config: &RunConfig,
//!     ) -> HalResult<Vec<ExecutionResult>> {
//!         self.validate(circuits, config)?;
//!         Ok(circuits
//!             .iter()
//!             .map(|circuit| {
//!                 let zeros = "0".repeat(circuit.num_clbits());
//!                 let counts = Counts::from_pairs([(zeros, u64::from(config.shots))]);
//!                 ExecutionResult::from_counts(circuit.name(), config.shots, counts)
//!             })
//!             .collect())
//!     }
//! }
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let circuit = Circuit::bell().unwrap();
//! let result = AllZeros.run_one(&circuit, &RunConfig::default()).await.unwrap();
//! assert_eq!(result.counts().unwrap().total_shots(), 1024);
//! # });
//! ```

pub mod backend;
pub mod error;
pub mod estimator;
pub mod optimizer;
pub mod result;

pub use backend::{Backend, RunConfig};
pub use error::{HalError, HalResult};
pub use estimator::{Estimator, Pauli, PauliString};
pub use optimizer::{Objective, OptimizationResult, Optimizer};
pub use result::{Counts, ExecutionData, ExecutionResult};
