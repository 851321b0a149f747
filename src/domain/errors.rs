//! Domain errors for the refinement controller.

use thiserror::Error;
use uuid::Uuid;

use super::models::session::SessionAction;
use super::ports::errors::AnalyzerError;

/// Domain-level errors that can occur while managing refinement sessions.
///
/// Collaborator failures during a cycle are *not* represented here: the
/// decision engine recovers from them locally with a conservative fallback.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("Session {id} is terminal ({action}) and cannot be stepped")]
    SessionTerminal { id: Uuid, action: SessionAction },

    #[error("Invalid problem configuration: {0}")]
    InvalidProblemConfig(String),

    #[error("Concurrency conflict: {entity} {id} was modified")]
    ConcurrencyConflict { entity: String, id: String },

    #[error("Session {0} was cancelled")]
    Cancelled(Uuid),

    #[error("Problem analysis failed: {0}")]
    Analysis(#[from] AnalyzerError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
