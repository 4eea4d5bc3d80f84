//! Error types for the QASM emitter.

use thiserror::Error;

/// Errors that can occur while lowering or rendering a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EmitError {
    /// The instruction has no textual form in the requested style.
    #[error("Cannot render '{name}': {reason}")]
    UnsupportedRendering {
        /// Name of the offending instruction or declaration.
        name: String,
        /// Why it cannot be rendered.
        reason: String,
    },

    /// The emitter options are not usable.
    #[error("Invalid emit options: {0}")]
    InvalidOptions(String),
}

impl EmitError {
    pub(crate) fn unsupported(name: impl Into<String>, reason: impl Into<String>) -> Self {
        EmitError::UnsupportedRendering {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for emitter operations.
pub type EmitResult<T> = Result<T, EmitError>;
