use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::errors::VerifierError;
use crate::domain::models::Defect;

/// Outcome of verifying one candidate solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Every defect found, in the order the verifier reported them.
    pub defects: Vec<Defect>,

    /// Verifier confidence in its own assessment, nominally in `[0, 1]`.
    pub confidence: f64,

    /// Domain classification of the problem (e.g. `"scheduling"`).
    pub domain: String,
}

impl VerificationReport {
    pub fn new(defects: Vec<Defect>, confidence: f64, domain: impl Into<String>) -> Self {
        Self {
            defects,
            confidence,
            domain: domain.into(),
        }
    }
}

/// Evaluates candidate solutions for defects.
#[async_trait]
pub trait SolutionVerifier: Send + Sync {
    async fn verify(
        &self,
        problem: &str,
        solution: &str,
        constraints: &[String],
    ) -> Result<VerificationReport, VerifierError>;
}
