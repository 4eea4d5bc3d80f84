//! Error types for the HAL crate.

use qforge_qasm::EmitError;
use thiserror::Error;

/// Errors that can occur in HAL operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// Invalid number of shots.
    #[error("Invalid shots: {0}")]
    InvalidShots(String),

    /// Invalid circuit.
    #[error("Invalid circuit: {0}")]
    InvalidCircuit(String),

    /// The circuit could not be written as program text.
    #[error("Emit error: {0}")]
    Emit(#[from] EmitError),

    /// Timeout waiting for a batch.
    #[error("Timeout after {0} ms")]
    Timeout(u64),

    /// The objective or optimizer failed.
    #[error("Optimization failed: {0}")]
    Optimization(String),

    /// An expectation value could not be estimated.
    #[error("Estimation failed: {0}")]
    Estimation(String),

    /// Generic backend error.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;
