//! Dynamic acceptance threshold.
//!
//! Couples defect severity, constraint complexity and score momentum into one
//! acceptance bar. More critical defects, more constraints, or a rising trend
//! all raise the bar; the result is always clamped to
//! [`MIN_THRESHOLD`]..=[`MAX_THRESHOLD`].

use crate::domain::models::{Defect, IterationSession};

use super::trend::trend;

/// Lowest threshold ever produced.
pub const MIN_THRESHOLD: f64 = 0.4;
/// Highest threshold ever produced.
pub const MAX_THRESHOLD: f64 = 0.9;
/// Base threshold before adjustment.
pub const DEFAULT_BASE_THRESHOLD: f64 = 0.7;

const CRITICAL_FACTOR: f64 = 0.1;
const COMPLEXITY_FACTOR: f64 = 0.05;
const TREND_FACTOR: f64 = 0.2;

/// Computes the acceptance threshold for the current cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdCalculator {
    base: f64,
}

impl Default for ThresholdCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_THRESHOLD)
    }
}

impl ThresholdCalculator {
    /// Create a calculator around `base`.
    pub const fn new(base: f64) -> Self {
        Self { base }
    }

    /// The unadjusted base threshold.
    pub const fn base(&self) -> f64 {
        self.base
    }

    /// Threshold from the raw adjustment factors.
    ///
    /// `complexity` is unbounded above; only the final clamp limits its
    /// effect.
    pub fn from_factors(&self, critical_count: usize, complexity: f64, trend: f64) -> f64 {
        let adjustment = (critical_count as f64).mul_add(
            CRITICAL_FACTOR,
            complexity.mul_add(COMPLEXITY_FACTOR, trend * TREND_FACTOR),
        );
        let threshold = self.base + adjustment;
        if threshold.is_nan() {
            return self.base.clamp(MIN_THRESHOLD, MAX_THRESHOLD);
        }
        threshold.clamp(MIN_THRESHOLD, MAX_THRESHOLD)
    }

    /// Threshold for a cycle with `defects`, `constraints` and the score
    /// history accumulated before this cycle.
    pub fn dynamic_threshold(
        &self,
        defects: &[Defect],
        constraints: &[String],
        score_history: &[f64],
    ) -> f64 {
        let critical_count = defects.iter().filter(|d| d.is_critical()).count();
        let complexity = constraints.len() as f64 / 10.0;
        self.from_factors(critical_count, complexity, trend(score_history))
    }

    /// Threshold for the session's current defects and history.
    pub fn threshold_for(&self, session: &IterationSession) -> f64 {
        self.from_factors(
            session.critical_count(),
            session.config.complexity(),
            trend(&session.score_history),
        )
    }
}
