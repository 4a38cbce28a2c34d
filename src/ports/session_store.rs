//! Session store port.
//!
//! Durable keyed storage for intake sessions. Implementations share the
//! merge semantics of [`IntakeSession::apply`]: messages replaced, fields
//! unioned with override, completion monotonic, `updated_at` bumped.
//!
//! # Concurrency
//!
//! Stores give last-write-wins per session id. Serializing turns within a
//! session is the controller's job.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::domain::intake::{DocumentType, IntakeSession, SessionPatch};

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Creates and persists a fresh session seeded with its greeting turn.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn create(&self, document_type: DocumentType) -> Result<IntakeSession, DomainError>;

    /// Finds a session by id; `None` when it does not exist.
    async fn find(&self, id: &SessionId) -> Result<Option<IntakeSession>, DomainError>;

    /// Applies `patch` to the stored session and returns the result.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the session doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn merge(&self, id: &SessionId, patch: SessionPatch)
        -> Result<IntakeSession, DomainError>;

    /// Loads a session, failing with `SessionNotFound` when absent.
    async fn get(&self, id: &SessionId) -> Result<IntakeSession, DomainError> {
        self.find(id).await?.ok_or_else(|| session_not_found(id))
    }
}

/// Standard not-found error for a session id.
pub fn session_not_found(id: &SessionId) -> DomainError {
    DomainError::new(ErrorCode::SessionNotFound, "Chat session not found")
        .with_detail("session_id", id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn SessionStore) {}
    }

    #[test]
    fn not_found_error_carries_id() {
        let id = SessionId::new();
        let err = session_not_found(&id);
        assert_eq!(err.code, ErrorCode::SessionNotFound);
        assert_eq!(err.details.get("session_id"), Some(&id.to_string()));
    }
}
