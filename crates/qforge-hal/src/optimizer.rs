//! Numeric optimizer interface for variational loops.

use serde::{Deserialize, Serialize};

use crate::error::{HalError, HalResult};

/// Outcome of one minimization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Best parameters found.
    pub params: Vec<f64>,
    /// Objective value at `params`.
    pub cost: f64,
    /// Objective value after each iteration.
    pub trace: Vec<f64>,
    /// Number of objective evaluations.
    pub evaluations: usize,
}

impl OptimizationResult {
    /// Check that the result is usable: finite cost and a parameter vector of
    /// the expected length.
    pub fn check(&self, num_params: usize) -> HalResult<()> {
        if self.params.len() != num_params {
            return Err(HalError::Optimization(format!(
                "expected {num_params} parameters, got {}",
                self.params.len()
            )));
        }
        if !self.cost.is_finite() {
            return Err(HalError::Optimization(format!(
                "non-finite cost {}",
                self.cost
            )));
        }
        Ok(())
    }
}

/// Objective function over a real parameter vector.
///
/// Objectives usually build and execute circuits internally, so evaluation
/// can fail.
pub type Objective<'a> = dyn FnMut(&[f64]) -> HalResult<f64> + 'a;

/// A classical minimizer.
pub trait Optimizer {
    /// Name of the method, for logs.
    fn name(&self) -> &str;

    /// Minimize `objective` starting from `initial`.
    fn minimize(
        &mut self,
        objective: &mut Objective<'_>,
        initial: &[f64],
    ) -> HalResult<OptimizationResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result() {
        let result = OptimizationResult {
            params: vec![0.1, 0.2],
            cost: -1.0,
            trace: vec![0.0, -1.0],
            evaluations: 4,
        };
        assert!(result.check(2).is_ok());
        assert!(matches!(result.check(3), Err(HalError::Optimization(_))));

        let nan = OptimizationResult {
            cost: f64::NAN,
            ..result
        };
        assert!(nan.check(2).is_err());
    }
}
