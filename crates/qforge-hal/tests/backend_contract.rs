//! Contract tests for the collaborator interfaces, using in-memory doubles.

use std::time::Duration;

use async_trait::async_trait;
use qforge_hal::{
    Backend, Counts, Estimator, ExecutionResult, HalError, HalResult, Objective,
    OptimizationResult, Optimizer, PauliString, RunConfig,
};
use qforge_ir::{Attach, Circuit};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("qforge_hal=debug")
        .with_test_writer()
        .try_init();
}

/// Reports a perfectly correlated histogram for every circuit.
struct CorrelatedBackend;

#[async_trait]
impl Backend for CorrelatedBackend {
    fn name(&self) -> &str {
        "correlated"
    }

    async fn run(&self, circuits: &[Circuit], config: &RunConfig) -> HalResult<Vec<ExecutionResult>> {
        self.validate(circuits, config)?;
        let half = u64::from(config.shots / 2);
        let rest = u64::from(config.shots) - half;
        Ok(circuits
            .iter()
            .map(|circuit| {
                let width = circuit.num_clbits().max(1);
                let counts = Counts::from_pairs([("0".repeat(width), half), ("1".repeat(width), rest)]);
                ExecutionResult::from_counts(circuit.name(), config.shots, counts)
            })
            .collect())
    }
}

/// Never finishes within the test's time budget.
struct StalledBackend;

#[async_trait]
impl Backend for StalledBackend {
    fn name(&self) -> &str {
        "stalled"
    }

    async fn run(&self, _circuits: &[Circuit], _config: &RunConfig) -> HalResult<Vec<ExecutionResult>> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(vec![])
    }
}

/// Drops every result.
struct LossyBackend;

#[async_trait]
impl Backend for LossyBackend {
    fn name(&self) -> &str {
        "lossy"
    }

    async fn run(&self, _circuits: &[Circuit], _config: &RunConfig) -> HalResult<Vec<ExecutionResult>> {
        Ok(vec![])
    }
}

/// Reads diagonal terms straight off the histogram.
struct ParityEstimator;

#[allow(clippy::cast_precision_loss)]
impl Estimator for ParityEstimator {
    fn expectation(&self, term: &PauliString, counts: &Counts) -> HalResult<f64> {
        let total = counts.total_shots();
        if total == 0 {
            return Err(HalError::Estimation("empty histogram".into()));
        }
        let mut sum = 0.0;
        for (bitstring, count) in counts.iter() {
            sum += term.z_parity(bitstring)? * count as f64;
        }
        Ok(term.coefficient * sum / total as f64)
    }
}

/// Coordinate descent with a fixed step, enough to exercise the interface.
struct CoordinateDescent {
    step: f64,
    iterations: usize,
}

impl Optimizer for CoordinateDescent {
    fn name(&self) -> &str {
        "coordinate_descent"
    }

    fn minimize(&mut self, objective: &mut Objective<'_>, initial: &[f64]) -> HalResult<OptimizationResult> {
        let mut params = initial.to_vec();
        let mut cost = objective(&params)?;
        let mut evaluations = 1;
        let mut trace = vec![cost];
        for _ in 0..self.iterations {
            for i in 0..params.len() {
                for delta in [self.step, -self.step] {
                    let mut trial = params.clone();
                    trial[i] += delta;
                    let value = objective(&trial)?;
                    evaluations += 1;
                    if value < cost {
                        cost = value;
                        params = trial;
                    }
                }
            }
            trace.push(cost);
        }
        Ok(OptimizationResult {
            params,
            cost,
            trace,
            evaluations,
        })
    }
}

#[tokio::test]
async fn test_run_returns_one_result_per_circuit() {
    init_tracing();
    let bell = Circuit::bell().unwrap();
    let ghz = Circuit::ghz(3).unwrap();
    let config = RunConfig::new("local_qasm_simulator").with_shots(100);

    let results = CorrelatedBackend
        .run(&[bell, ghz], &config)
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].circuit, "bell");
    assert_eq!(results[1].circuit, "ghz");
    let counts = results[1].counts().unwrap();
    assert_eq!(counts.total_shots(), 100);
    assert_eq!(counts.get("111"), 50);
}

#[tokio::test]
async fn test_run_one() {
    let result = CorrelatedBackend
        .run_one(&Circuit::bell().unwrap(), &RunConfig::default())
        .await
        .unwrap();
    assert_eq!(result.shots, 1024);
    assert_eq!(result.counts().unwrap().most_frequent(), Some(("00", 512)));
}

#[tokio::test]
async fn test_run_one_rejects_missing_result() {
    let err = LossyBackend
        .run_one(&Circuit::bell().unwrap(), &RunConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, HalError::Backend(_)));
}

#[tokio::test]
async fn test_validate_rejects_bad_batches() {
    let bell = Circuit::bell().unwrap();

    let zero_shots = RunConfig::default().with_shots(0);
    let err = CorrelatedBackend
        .run(std::slice::from_ref(&bell), &zero_shots)
        .await
        .unwrap_err();
    assert!(matches!(err, HalError::InvalidShots(_)));

    let err = CorrelatedBackend
        .run(&[], &RunConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, HalError::InvalidCircuit(_)));

    let err = CorrelatedBackend
        .run(&[bell.clone(), bell], &RunConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, HalError::InvalidCircuit(_)));

    let mut empty = Circuit::new("empty");
    empty.add_qreg("q", 1).unwrap();
    let err = CorrelatedBackend
        .run(&[empty], &RunConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, HalError::InvalidCircuit(_)));
}

#[test]
fn test_validate_returns_program_text() {
    let mut circuit = Circuit::new("flip");
    let q = circuit.add_qreg("q", 1).unwrap();
    circuit.z(&q.bit(0).unwrap()).unwrap();

    let programs = CorrelatedBackend
        .validate(&[circuit], &RunConfig::default())
        .unwrap();
    assert_eq!(programs.len(), 1);
    assert!(programs[0].ends_with("z q[0];\n"));
}

#[test]
fn test_validate_reports_unrenderable_circuit() {
    let mut circuit = Circuit::new("phase");
    let q = circuit.add_qreg("q", 1).unwrap();
    let k = circuit.add_qreg("k", 1).unwrap();
    circuit.t(&q.bit(0).unwrap()).unwrap().q_if(&[&k]).unwrap();

    let err = CorrelatedBackend
        .validate(&[circuit], &RunConfig::default())
        .unwrap_err();
    assert!(matches!(err, HalError::Emit(_)));
}

#[tokio::test(start_paused = true)]
async fn test_run_with_timeout() {
    let err = StalledBackend
        .run_with_timeout(
            &[Circuit::bell().unwrap()],
            &RunConfig::default(),
            Duration::from_millis(250),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, HalError::Timeout(250)));

    let results = CorrelatedBackend
        .run_with_timeout(
            &[Circuit::bell().unwrap()],
            &RunConfig::default(),
            Duration::from_secs(1),
        )
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
}

#[test]
fn test_estimator_on_correlated_counts() {
    let counts = Counts::from_pairs([("00", 500), ("11", 500)]);
    let estimator = ParityEstimator;

    let zz = PauliString::zz(1.0, 0, 1);
    assert!((estimator.expectation(&zz, &counts).unwrap() - 1.0).abs() < 1e-12);

    let z0 = PauliString::z(1.0, 0);
    assert!(estimator.expectation(&z0, &counts).unwrap().abs() < 1e-12);

    let energy = estimator
        .expectation_sum(&[PauliString::identity(-0.5), PauliString::zz(2.0, 0, 1)], &counts)
        .unwrap();
    assert!((energy - 1.5).abs() < 1e-12);

    let x0 = PauliString::x(1.0, 0);
    assert!(matches!(
        estimator.expectation(&x0, &counts),
        Err(HalError::Estimation(_))
    ));
}

#[test]
fn test_optimizer_minimizes_quadratic() {
    let mut optimizer = CoordinateDescent {
        step: 0.25,
        iterations: 20,
    };
    let mut objective = |p: &[f64]| -> HalResult<f64> { Ok((p[0] - 1.0).powi(2) + (p[1] + 0.5).powi(2)) };

    let result = optimizer.minimize(&mut objective, &[0.0, 0.0]).unwrap();
    result.check(2).unwrap();
    assert_eq!(optimizer.name(), "coordinate_descent");
    assert!(result.cost < 1e-12);
    assert!((result.params[0] - 1.0).abs() < 1e-12);
    assert!((result.params[1] + 0.5).abs() < 1e-12);
    assert_eq!(result.trace.len(), 21);
    assert!(result.trace.windows(2).all(|w| w[1] <= w[0]));
}

#[test]
fn test_optimizer_propagates_objective_errors() {
    let mut optimizer = CoordinateDescent {
        step: 0.1,
        iterations: 3,
    };
    let mut objective =
        |_: &[f64]| -> HalResult<f64> { Err(HalError::Backend("device offline".into())) };
    let err = optimizer.minimize(&mut objective, &[0.0]).unwrap_err();
    assert!(matches!(err, HalError::Backend(_)));
}
