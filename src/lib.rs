//! Refiner - iterative solution refinement controller
//!
//! Refiner drives a propose → verify → score → decide loop over a problem
//! statement. Each cycle asks a proposer for a candidate under a round-robin
//! strategy, asks a verifier for defects, scores the candidate against a
//! severity weight table, compares the score to a dynamic acceptance
//! threshold, and decides whether to continue, escalate to human review, or
//! complete.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Session, defect and configuration models plus the port traits
//! - **Service Layer** (`services`): Scoring, thresholding and the decision engine
//! - **Adapters** (`adapters`): In-memory session storage
//! - **Infrastructure Layer** (`infrastructure`): Configuration, logging and reply parsing
//!
//! # Example
//!
//! ```ignore
//! use refiner::{ConfigLoader, DecisionEngine, InMemorySessionRepository, SessionService};
//! use refiner::infrastructure::config::WeightTableLoader;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     let weights = WeightTableLoader::load(&config.weights.path)?;
//!     let engine = DecisionEngine::new(proposer, verifier, weights, config.engine);
//!     let service = SessionService::new(
//!         Arc::new(InMemorySessionRepository::new()),
//!         Arc::new(engine),
//!     );
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::InMemorySessionRepository;
pub use domain::models::{
    Config, Defect, EngineConfig, Escalation, EscalationReason, IterationSession, LoggingConfig,
    ProblemConfig, SessionAction, Severity, SeverityWeightTable,
};
pub use domain::ports::{
    ProblemAnalyzer, SessionRepository, SolutionProposer, SolutionVerifier, VerificationReport,
};
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{DecisionEngine, ErrorScorer, SessionService, ThresholdCalculator};
