/// Session management service coordinating the decision engine with the
/// session repository.
///
/// This is the transport-facing surface of the controller: create a session,
/// step it one cycle at a time, or run it to a terminal action. A missing
/// session is always reported as `SessionNotFound`, never as a stepping
/// failure.
use std::sync::Arc;

use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{IterationSession, ProblemConfig, SessionAction};
use crate::domain::ports::{
    AnalyzerError, ProblemAnalyzer, SessionRepository, SolutionProposer, SolutionVerifier,
};

use super::decision_engine::DecisionEngine;

/// Service for creating and driving refinement sessions.
///
/// Sessions are read as snapshots, advanced without holding any lock, and
/// committed with an optimistic revision check, so a collaborator call never
/// runs under a session lock.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use refiner::adapters::InMemorySessionRepository;
/// use refiner::domain::models::ProblemConfig;
/// use refiner::domain::ports::{SolutionProposer, SolutionVerifier};
/// use refiner::services::{DecisionEngine, SessionService};
///
/// async fn example<P: SolutionProposer, V: SolutionVerifier>(
///     engine: DecisionEngine<P, V>,
/// ) -> refiner::domain::DomainResult<()> {
///     let service = SessionService::new(
///         Arc::new(InMemorySessionRepository::new()),
///         Arc::new(engine),
///     );
///     let config = ProblemConfig::new(vec![], vec!["ToT".to_string()], 5);
///     let session = service.create("Schedule the offsite", config).await?;
///     let stepped = service.step(session.id).await?;
///     println!("{}", stepped.action);
///     Ok(())
/// }
/// ```
pub struct SessionService<P: SolutionProposer, V: SolutionVerifier> {
    repo: Arc<dyn SessionRepository>,
    engine: Arc<DecisionEngine<P, V>>,
    analyzer: Option<Arc<dyn ProblemAnalyzer>>,
}

impl<P: SolutionProposer, V: SolutionVerifier> SessionService<P, V> {
    /// Creates a new SessionService
    ///
    /// # Arguments
    /// - `repo`: Session repository implementation (injected dependency)
    /// - `engine`: Shared decision engine
    pub fn new(repo: Arc<dyn SessionRepository>, engine: Arc<DecisionEngine<P, V>>) -> Self {
        Self {
            repo,
            engine,
            analyzer: None,
        }
    }

    /// Attach the analysis step used by [`Self::create_analyzed`].
    #[must_use]
    pub fn with_analyzer(mut self, analyzer: Arc<dyn ProblemAnalyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    pub fn engine(&self) -> &DecisionEngine<P, V> {
        &self.engine
    }

    /// Creates a pending session for `problem`
    ///
    /// A config without a budget takes the engine's `default_max_iterations`.
    ///
    /// # Errors
    /// Returns `InvalidProblemConfig` if `config` cannot drive the loop
    #[instrument(skip(self, problem, config), err)]
    pub async fn create(
        &self,
        problem: &str,
        config: ProblemConfig,
    ) -> DomainResult<IterationSession> {
        let config = config.with_default_budget(self.engine.config().default_max_iterations);
        config.validate()?;

        let session = IterationSession::new(problem, config);
        self.repo.create(&session).await?;

        info!(
            session_id = %session.id,
            algorithms = ?session.config.algorithms,
            max_iterations = ?session.config.max_iterations,
            "session created"
        );
        Ok(session)
    }

    /// Derives the problem configuration with the analyzer, then creates the
    /// session
    ///
    /// # Errors
    /// - `Analysis` if no analyzer is attached or the analyzer fails
    /// - `InvalidProblemConfig` if the derived configuration is unusable
    #[instrument(skip(self, problem), err)]
    pub async fn create_analyzed(&self, problem: &str) -> DomainResult<IterationSession> {
        let analyzer = self.analyzer.as_ref().ok_or_else(|| {
            AnalyzerError::Unavailable("no problem analyzer configured".to_string())
        })?;
        let config = analyzer.analyze(problem).await?;
        self.create(problem, config).await
    }

    /// Retrieves a session by ID
    ///
    /// # Errors
    /// Returns `SessionNotFound` if no session has this ID
    pub async fn get(&self, id: Uuid) -> DomainResult<IterationSession> {
        self.repo
            .get(id)
            .await?
            .ok_or(DomainError::SessionNotFound(id))
    }

    /// Lists stored sessions, optionally filtered by action
    pub async fn list(&self, action: Option<SessionAction>) -> DomainResult<Vec<IterationSession>> {
        self.repo.list(action).await
    }

    /// Removes a session
    ///
    /// # Errors
    /// Returns `SessionNotFound` if no session has this ID
    #[instrument(skip(self), err)]
    pub async fn delete(&self, id: Uuid) -> DomainResult<()> {
        if self.repo.delete(id).await? {
            info!(session_id = %id, "session deleted");
            Ok(())
        } else {
            Err(DomainError::SessionNotFound(id))
        }
    }

    /// Runs one cycle and commits the result
    ///
    /// # Errors
    /// - `SessionNotFound` if no session has this ID
    /// - `SessionTerminal` if the session already escalated or completed
    /// - `ConcurrencyConflict` if another writer committed first
    #[instrument(skip(self), err)]
    pub async fn step(&self, id: Uuid) -> DomainResult<IterationSession> {
        let current = self.get(id).await?;
        let next = self.engine.step(&current).await?;
        self.repo.update(&next, current.revision).await?;
        Ok(next)
    }

    /// Steps a session until it escalates or completes
    ///
    /// Each cycle is committed before the next begins. If `cancel` fires, the
    /// cycle in flight is discarded and the last committed state remains.
    ///
    /// # Errors
    /// - `SessionNotFound` if no session has this ID
    /// - `Cancelled` if `cancel` fired first
    #[instrument(skip(self, cancel), err)]
    pub async fn run(&self, id: Uuid, cancel: &CancellationToken) -> DomainResult<IterationSession> {
        let mut current = self.get(id).await?;

        while !current.is_terminal() {
            if cancel.is_cancelled() {
                return Err(DomainError::Cancelled(id));
            }
            let next = tokio::select! {
                () = cancel.cancelled() => return Err(DomainError::Cancelled(id)),
                next = self.engine.step(&current) => next?,
            };
            self.repo.update(&next, current.revision).await?;
            current = next;
        }

        info!(
            session_id = %id,
            action = %current.action,
            cycles = current.solutions.len(),
            final_score = ?current.final_score,
            "session reached terminal state"
        );
        Ok(current)
    }

    /// Runs several independent sessions concurrently
    ///
    /// Results are returned in the order of `ids`; one session failing does
    /// not affect the others.
    pub async fn run_many(
        &self,
        ids: &[Uuid],
        cancel: &CancellationToken,
    ) -> Vec<DomainResult<IterationSession>> {
        join_all(ids.iter().map(|id| self.run(*id, cancel))).await
    }
}
