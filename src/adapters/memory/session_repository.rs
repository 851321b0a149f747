//! In-memory `SessionRepository` backed by a `tokio::sync::RwLock`.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{IterationSession, SessionAction};
use crate::domain::ports::SessionRepository;

const ENTITY: &str = "session";

/// Session store for a single process.
///
/// Writes are whole-value replacements guarded by a revision check, so
/// readers only ever see committed cycles.
#[derive(Debug, Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<Uuid, IterationSession>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, session: &IterationSession) -> DomainResult<()> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.id) {
            return Err(DomainError::ConcurrencyConflict {
                entity: ENTITY.to_string(),
                id: session.id.to_string(),
            });
        }
        sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<IterationSession>> {
        Ok(self.sessions.read().await.get(&id).cloned())
    }

    async fn update(
        &self,
        session: &IterationSession,
        expected_revision: u64,
    ) -> DomainResult<()> {
        let mut sessions = self.sessions.write().await;
        let stored = sessions
            .get_mut(&session.id)
            .ok_or(DomainError::SessionNotFound(session.id))?;

        if stored.revision != expected_revision {
            return Err(DomainError::ConcurrencyConflict {
                entity: ENTITY.to_string(),
                id: session.id.to_string(),
            });
        }

        *stored = session.clone();
        Ok(())
    }

    async fn list(&self, action: Option<SessionAction>) -> DomainResult<Vec<IterationSession>> {
        let sessions = self.sessions.read().await;
        let mut matching: Vec<IterationSession> = sessions
            .values()
            .filter(|s| action.is_none_or(|a| s.action == a))
            .cloned()
            .collect();
        matching.sort_by_key(|s| s.created_at);
        Ok(matching)
    }

    async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        Ok(self.sessions.write().await.remove(&id).is_some())
    }
}
