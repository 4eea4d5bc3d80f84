//! Backend trait and run configuration.

use async_trait::async_trait;
use qforge_ir::Circuit;
use qforge_qasm::emit;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{HalError, HalResult};
use crate::result::ExecutionResult;

/// Configuration for one batch execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of shots per circuit.
    pub shots: u32,
    /// Target device identifier.
    pub device: String,
    /// Backend-specific options.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            shots: 1024,
            device: "local_qasm_simulator".into(),
            extra: serde_json::Map::new(),
        }
    }
}

impl RunConfig {
    /// Create a configuration targeting `device` with default shots.
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            ..Self::default()
        }
    }

    /// Set the shot count.
    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = shots;
        self
    }

    /// Add extra configuration.
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Trait for execution backends.
///
/// A backend receives finished circuits and returns one
/// [`ExecutionResult`] per circuit, in batch order.
///
/// # Contract
///
/// - `run()` MUST return exactly one result per input circuit.
/// - `validate()` has a default implementation that checks the shot count,
///   circuit names and renderability, and returns the program text of each
///   circuit.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Execute a batch of circuits.
    async fn run(&self, circuits: &[Circuit], config: &RunConfig)
    -> HalResult<Vec<ExecutionResult>>;

    /// Execute a single circuit.
    async fn run_one(&self, circuit: &Circuit, config: &RunConfig) -> HalResult<ExecutionResult> {
        let mut results = self.run(std::slice::from_ref(circuit), config).await?;
        match (results.pop(), results.is_empty()) {
            (Some(result), true) => Ok(result),
            _ => Err(HalError::Backend(format!(
                "'{}' did not return exactly one result",
                self.name()
            ))),
        }
    }

    /// Execute a batch, failing with [`HalError::Timeout`] after `timeout`.
    async fn run_with_timeout(
        &self,
        circuits: &[Circuit],
        config: &RunConfig,
        timeout: Duration,
    ) -> HalResult<Vec<ExecutionResult>> {
        let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        match tokio::time::timeout(timeout, self.run(circuits, config)).await {
            Ok(results) => results,
            Err(_) => Err(HalError::Timeout(millis)),
        }
    }

    /// Check a batch before execution and render each circuit.
    fn validate(&self, circuits: &[Circuit], config: &RunConfig) -> HalResult<Vec<String>> {
        if config.shots == 0 {
            return Err(HalError::InvalidShots("shots must be positive".into()));
        }
        if circuits.is_empty() {
            return Err(HalError::InvalidCircuit("empty batch".into()));
        }

        let mut names = FxHashSet::default();
        let mut programs = Vec::with_capacity(circuits.len());
        for circuit in circuits {
            if circuit.is_empty() {
                return Err(HalError::InvalidCircuit(format!(
                    "circuit '{}' has no instructions",
                    circuit.name()
                )));
            }
            if !names.insert(circuit.name()) {
                return Err(HalError::InvalidCircuit(format!(
                    "circuit name '{}' appears twice in the batch",
                    circuit.name()
                )));
            }
            programs.push(emit(circuit)?);
            debug!(backend = self.name(), circuit = circuit.name(), "validated circuit");
        }

        info!(
            backend = self.name(),
            device = %config.device,
            circuits = circuits.len(),
            shots = config.shots,
            "batch ready"
        );
        Ok(programs)
    }
}
