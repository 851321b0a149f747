//! Defect-list scoring.
//!
//! Converts the defects of one cycle into a quality score in `[0, 1]`:
//! every distinct defect type deducts `weight * domain multiplier * repeat
//! penalty` from a starting score of `1.0`, and the result is dampened by the
//! verifier's confidence.

use std::sync::Arc;

use crate::domain::models::{Defect, Severity, SeverityResolution, SeverityWeightTable};

/// Extra deduction fraction for each repeat of a defect type in one cycle.
pub const REPEAT_PENALTY_STEP: f64 = 0.15;

/// Stateless scorer over a shared, read-only weight table.
#[derive(Debug, Clone)]
pub struct ErrorScorer {
    weights: Arc<SeverityWeightTable>,
    resolution: SeverityResolution,
}

/// Per-type aggregate within a single defect list.
struct TypeTally<'a> {
    defect_type: &'a str,
    severity: Severity,
    count: u32,
}

impl ErrorScorer {
    /// Create a scorer resolving mixed severities by first occurrence.
    pub fn new(weights: Arc<SeverityWeightTable>) -> Self {
        Self {
            weights,
            resolution: SeverityResolution::default(),
        }
    }

    /// Use `resolution` when one defect type appears with several severities.
    #[must_use]
    pub fn with_resolution(mut self, resolution: SeverityResolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// The shared weight table.
    pub fn weights(&self) -> &SeverityWeightTable {
        &self.weights
    }

    /// Score `defects` for a problem of `problem_type`.
    ///
    /// Total over its inputs: a confidence above one cannot lift the score
    /// above `1.0`, deductions past zero clamp to `0.0`, and a NaN confidence
    /// scores `0.0`.
    pub fn score(&self, defects: &[Defect], problem_type: &str, confidence: f64) -> f64 {
        let mut running = 1.0;

        for tally in self.tally(defects) {
            let weight = self.weights.weight(tally.severity, tally.defect_type);
            let domain_weight = self
                .weights
                .domain_multiplier(problem_type, tally.defect_type);
            let repeat_penalty = f64::from(tally.count - 1).mul_add(REPEAT_PENALTY_STEP, 1.0);

            running -= weight * domain_weight * repeat_penalty;
        }

        let dampened = running * confidence;
        if dampened.is_nan() {
            0.0
        } else {
            dampened.clamp(0.0, 1.0)
        }
    }

    /// Group defects by type in first-appearance order.
    fn tally<'a>(&self, defects: &'a [Defect]) -> Vec<TypeTally<'a>> {
        let mut tallies: Vec<TypeTally<'a>> = Vec::new();

        for defect in defects {
            if let Some(existing) = tallies
                .iter_mut()
                .find(|t| t.defect_type == defect.defect_type)
            {
                existing.count += 1;
                if self.resolution == SeverityResolution::Worst {
                    existing.severity = existing.severity.max(defect.severity);
                }
            } else {
                tallies.push(TypeTally {
                    defect_type: &defect.defect_type,
                    severity: defect.severity,
                    count: 1,
                });
            }
        }

        tallies
    }
}
