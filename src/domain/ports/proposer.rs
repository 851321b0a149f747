use async_trait::async_trait;

use super::errors::ProposerError;

/// Produces candidate solutions.
///
/// The controller treats the returned solution as an opaque blob; it is only
/// stored and handed back to the verifier.
#[async_trait]
pub trait SolutionProposer: Send + Sync {
    /// Propose a solution to `problem` using the named `strategy`.
    ///
    /// Implementations should not apply their own long retries: the engine
    /// bounds every call with a timeout and falls back conservatively on
    /// failure.
    async fn propose(
        &self,
        problem: &str,
        strategy: &str,
        constraints: &[String],
    ) -> Result<String, ProposerError>;
}
