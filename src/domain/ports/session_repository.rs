/// Session repository port (trait) for dependency injection.
///
/// Defines the contract for session storage operations that adapters must
/// implement. Services depend on this trait, not concrete implementations.
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{IterationSession, SessionAction};

/// Repository trait for iteration session persistence
///
/// Implementations should handle:
/// - Concurrent access with appropriate locking
/// - Atomic replacement of a whole session on update
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Stores a new session
    ///
    /// # Errors
    /// Returns `ConcurrencyConflict` if the session ID already exists
    async fn create(&self, session: &IterationSession) -> DomainResult<()>;

    /// Retrieves session by ID
    ///
    /// # Returns
    /// - `Some(IterationSession)` if found
    /// - `None` if not found
    async fn get(&self, id: Uuid) -> DomainResult<Option<IterationSession>>;

    /// Replaces a stored session if its revision still matches
    ///
    /// `expected_revision` is the revision the caller read before computing
    /// `session`. The write is applied whole or not at all.
    ///
    /// # Errors
    /// - `SessionNotFound` if no session has this ID
    /// - `ConcurrencyConflict` if the stored revision differs
    async fn update(&self, session: &IterationSession, expected_revision: u64)
        -> DomainResult<()>;

    /// Lists sessions, optionally filtered by action
    async fn list(&self, action: Option<SessionAction>) -> DomainResult<Vec<IterationSession>>;

    /// Deletes a session, returning whether it existed
    async fn delete(&self, id: Uuid) -> DomainResult<bool>;
}
