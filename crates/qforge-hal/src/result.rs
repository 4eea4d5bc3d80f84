//! Execution results returned by backends.

use num_complex::Complex64;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Measurement histogram: bitstring → number of occurrences.
///
/// Bitstrings are written with qubit 0 rightmost.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts {
    counts: FxHashMap<String, u64>,
}

impl Counts {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a histogram from `(bitstring, count)` pairs; repeated keys add up.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut counts = Self::new();
        for (bitstring, count) in pairs {
            counts.insert(bitstring, count);
        }
        counts
    }

    /// Add `count` occurrences of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.counts.entry(bitstring.into()).or_insert(0) += count;
    }

    /// Occurrences of `bitstring`.
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Total number of shots.
    pub fn total_shots(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Relative frequency of `bitstring`; zero for an empty histogram.
    #[allow(clippy::cast_precision_loss)]
    pub fn probability(&self, bitstring: &str) -> f64 {
        let total = self.total_shots();
        if total == 0 {
            return 0.0;
        }
        self.get(bitstring) as f64 / total as f64
    }

    /// Most frequent outcome; ties go to the smallest bitstring.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.counts
            .iter()
            .max_by(|(ka, va), (kb, vb)| va.cmp(vb).then_with(|| kb.cmp(ka)))
            .map(|(k, &v)| (k.as_str(), v))
    }

    /// Iterate over `(bitstring, count)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Outcomes sorted by bitstring.
    pub fn sorted(&self) -> Vec<(&str, u64)> {
        let mut pairs: Vec<_> = self.iter().collect();
        pairs.sort_unstable_by(|a, b| a.0.cmp(b.0));
        pairs
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Check if no outcome was recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// What a backend measured or computed for one circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ExecutionData {
    /// Sampled measurement histogram.
    Counts(Counts),
    /// Final state amplitudes, basis index order.
    StateVector(Vec<Complex64>),
}

/// Result of executing one circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Name of the executed circuit.
    pub circuit: String,
    /// Number of shots requested.
    pub shots: u32,
    /// Measured or computed data.
    pub data: ExecutionData,
    /// Execution time in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
}

impl ExecutionResult {
    /// Create a histogram result.
    pub fn from_counts(circuit: impl Into<String>, shots: u32, counts: Counts) -> Self {
        Self {
            circuit: circuit.into(),
            shots,
            data: ExecutionData::Counts(counts),
            execution_time_ms: None,
        }
    }

    /// Create a state-vector result.
    pub fn from_state_vector(
        circuit: impl Into<String>,
        shots: u32,
        amplitudes: Vec<Complex64>,
    ) -> Self {
        Self {
            circuit: circuit.into(),
            shots,
            data: ExecutionData::StateVector(amplitudes),
            execution_time_ms: None,
        }
    }

    /// Set execution time.
    pub fn with_execution_time(mut self, ms: u64) -> Self {
        self.execution_time_ms = Some(ms);
        self
    }

    /// The histogram, if this is a sampled result.
    pub fn counts(&self) -> Option<&Counts> {
        match &self.data {
            ExecutionData::Counts(counts) => Some(counts),
            ExecutionData::StateVector(_) => None,
        }
    }

    /// The amplitudes, if this is a state-vector result.
    pub fn state_vector(&self) -> Option<&[Complex64]> {
        match &self.data {
            ExecutionData::StateVector(amplitudes) => Some(amplitudes),
            ExecutionData::Counts(_) => None,
        }
    }

    /// Basis-state probabilities of a state-vector result.
    pub fn probabilities(&self) -> Option<Vec<f64>> {
        self.state_vector()
            .map(|amplitudes| amplitudes.iter().map(Complex64::norm_sqr).collect())
    }
}
