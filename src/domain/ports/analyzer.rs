use async_trait::async_trait;

use super::errors::AnalyzerError;
use crate::domain::models::ProblemConfig;

/// Derives constraints, candidate strategies and an iteration budget from a
/// raw problem statement.
///
/// Optional: callers that already know the configuration can create sessions
/// directly.
#[async_trait]
pub trait ProblemAnalyzer: Send + Sync {
    async fn analyze(&self, problem: &str) -> Result<ProblemConfig, AnalyzerError>;
}
