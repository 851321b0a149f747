//! Severity weight table shared by every session.
//!
//! The table maps a severity name to per-defect-type deduction weights, plus a
//! `domain_adj` section mapping a problem type to per-defect-type multipliers:
//!
//! ```json
//! {
//!   "critical": { "time_conflict": 0.4 },
//!   "high":     { "resource_conflict": 0.25 },
//!   "domain_adj": { "scheduling": { "time_conflict": 1.2 } }
//! }
//! ```
//!
//! Lookups never fail; unlisted entries fall back to [`DEFAULT_WEIGHT`] and
//! [`DEFAULT_DOMAIN_MULTIPLIER`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::defect::Severity;

/// Deduction weight for a defect type not listed under its severity.
pub const DEFAULT_WEIGHT: f64 = 0.3;

/// Multiplier for a defect type not listed under the problem type.
pub const DEFAULT_DOMAIN_MULTIPLIER: f64 = 1.0;

type TypeWeights = BTreeMap<String, f64>;

/// Static scoring configuration, loaded once and read-only thereafter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeverityWeightTable {
    /// Problem type -> defect type -> multiplier.
    #[serde(default)]
    pub domain_adj: BTreeMap<String, TypeWeights>,

    /// Severity name -> defect type -> weight.
    #[serde(flatten)]
    pub severities: BTreeMap<String, TypeWeights>,
}

impl SeverityWeightTable {
    /// Set the weight for one severity/type pair.
    #[must_use]
    pub fn with_weight(mut self, severity: Severity, defect_type: &str, weight: f64) -> Self {
        self.severities
            .entry(severity.as_str().to_string())
            .or_default()
            .insert(defect_type.to_string(), weight);
        self
    }

    /// Set the domain multiplier for one problem-type/defect-type pair.
    #[must_use]
    pub fn with_domain_multiplier(
        mut self,
        problem_type: &str,
        defect_type: &str,
        multiplier: f64,
    ) -> Self {
        self.domain_adj
            .entry(problem_type.to_string())
            .or_default()
            .insert(defect_type.to_string(), multiplier);
        self
    }

    pub fn weight(&self, severity: Severity, defect_type: &str) -> f64 {
        self.severities
            .get(severity.as_str())
            .and_then(|types| types.get(defect_type))
            .copied()
            .unwrap_or(DEFAULT_WEIGHT)
    }

    pub fn domain_multiplier(&self, problem_type: &str, defect_type: &str) -> f64 {
        self.domain_adj
            .get(problem_type)
            .and_then(|types| types.get(defect_type))
            .copied()
            .unwrap_or(DEFAULT_DOMAIN_MULTIPLIER)
    }

    /// Check the table is usable: known severity keys only, and every weight
    /// and multiplier finite and non-negative.
    ///
    /// Returns a human-readable description of the first problem found.
    pub fn check(&self) -> Result<(), String> {
        for (severity, types) in &self.severities {
            if Severity::parse_strict(severity).is_none() {
                return Err(format!("unknown severity key '{severity}'"));
            }
            for (defect_type, weight) in types {
                if !weight.is_finite() || *weight < 0.0 {
                    return Err(format!(
                        "weight for {severity}/{defect_type} must be a non-negative number, got {weight}"
                    ));
                }
            }
        }
        for (problem_type, types) in &self.domain_adj {
            for (defect_type, multiplier) in types {
                if !multiplier.is_finite() || *multiplier < 0.0 {
                    return Err(format!(
                        "domain_adj for {problem_type}/{defect_type} must be a non-negative number, got {multiplier}"
                    ));
                }
            }
        }
        Ok(())
    }
}
