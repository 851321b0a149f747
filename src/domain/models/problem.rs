//! Per-session problem configuration.

use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};

/// Iteration budget used when neither the problem nor the engine sets one.
pub const DEFAULT_MAX_ITERATIONS: u32 = 5;

/// Constraints, strategies and budget derived once from the problem statement.
///
/// Produced by an analysis step outside the controller and treated as an
/// opaque input; immutable once a session has been created from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemConfig {
    /// Ordered requirement strings.
    #[serde(default)]
    pub constraints: Vec<String>,

    /// Ordered strategy identifiers, cycled round-robin. Must be non-empty.
    pub algorithms: Vec<String>,

    /// Maximum number of cycles a session may run. `None` defers to the
    /// engine's configured default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<u32>,
}

impl ProblemConfig {
    pub fn new(constraints: Vec<String>, algorithms: Vec<String>, max_iterations: u32) -> Self {
        Self {
            constraints,
            algorithms,
            max_iterations: Some(max_iterations),
        }
    }

    /// A configuration that leaves the budget to the engine default.
    pub fn without_budget(constraints: Vec<String>, algorithms: Vec<String>) -> Self {
        Self {
            constraints,
            algorithms,
            max_iterations: None,
        }
    }

    /// Fill a missing budget with `default_max_iterations`.
    #[must_use]
    pub fn with_default_budget(mut self, default_max_iterations: u32) -> Self {
        self.max_iterations.get_or_insert(default_max_iterations);
        self
    }

    /// Effective budget, falling back to `default_max_iterations`.
    pub fn budget_or(&self, default_max_iterations: u32) -> u32 {
        self.max_iterations.unwrap_or(default_max_iterations)
    }

    /// Reject configurations the loop cannot run with.
    ///
    /// An empty strategy list is never defaulted: it would make round-robin
    /// selection undefined.
    pub fn validate(&self) -> DomainResult<()> {
        if self.algorithms.is_empty() {
            return Err(DomainError::InvalidProblemConfig(
                "algorithm list cannot be empty".to_string(),
            ));
        }
        if let Some(pos) = self.algorithms.iter().position(|a| a.trim().is_empty()) {
            return Err(DomainError::InvalidProblemConfig(format!(
                "algorithm at index {pos} is blank"
            )));
        }
        if self.max_iterations == Some(0) {
            return Err(DomainError::InvalidProblemConfig(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Strategy for the given iteration, round-robin over `algorithms`.
    ///
    /// Returns `None` only for an unvalidated config with no strategies.
    pub fn strategy_for(&self, iteration: u32) -> Option<&str> {
        if self.algorithms.is_empty() {
            return None;
        }
        let index = iteration as usize % self.algorithms.len();
        Some(self.algorithms[index].as_str())
    }

    /// Constraint complexity factor used by the threshold calculator.
    pub fn complexity(&self) -> f64 {
        self.constraints.len() as f64 / 10.0
    }
}
