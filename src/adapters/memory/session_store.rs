//! In-Memory Session Store
//!
//! Keeps intake sessions in a process-local map. Used by tests and by the
//! `memory` storage backend.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::intake::{DocumentType, IntakeSession, SessionPatch};
use crate::ports::{session_not_found, SessionStore};

/// In-memory storage for intake sessions.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, IntakeSession>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a session as-is (useful for tests).
    pub async fn insert(&self, session: IntakeSession) {
        self.sessions.write().await.insert(session.id, session);
    }

    /// Get the number of stored sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, document_type: DocumentType) -> Result<IntakeSession, DomainError> {
        let session = IntakeSession::start(document_type);
        self.sessions
            .write()
            .await
            .insert(session.id, session.clone());
        Ok(session)
    }

    async fn find(&self, id: &SessionId) -> Result<Option<IntakeSession>, DomainError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn merge(
        &self,
        id: &SessionId,
        patch: SessionPatch,
    ) -> Result<IntakeSession, DomainError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(id).ok_or_else(|| session_not_found(id))?;
        session.apply(patch);
        Ok(session.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::intake::{StructuredFields, Turn};
    use serde_json::json;

    #[tokio::test]
    async fn create_seeds_greeting_and_persists() {
        let store = InMemorySessionStore::new();
        let session = store.create(DocumentType::PrivacyPolicy).await.unwrap();

        assert_eq!(session.messages.len(), 1);
        assert_eq!(store.len().await, 1);
        assert_eq!(store.get(&session.id).await.unwrap(), session);
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let store = InMemorySessionStore::new();
        let err = store.get(&SessionId::new()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionNotFound);
        assert!(store.find(&SessionId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn merge_replaces_messages_and_unions_fields() {
        let store = InMemorySessionStore::new();
        let session = store.create(DocumentType::CookieConsent).await.unwrap();
        store
            .merge(
                &session.id,
                SessionPatch::new()
                    .with_structured_fields(StructuredFields::from_value(json!({"a": 1, "b": 2}))),
            )
            .await
            .unwrap();

        let mut messages = session.messages.clone();
        messages.push(Turn::user("hi"));
        let merged = store
            .merge(
                &session.id,
                SessionPatch::new()
                    .with_messages(messages)
                    .with_structured_fields(StructuredFields::from_value(json!({"b": 3, "c": 4}))),
            )
            .await
            .unwrap();

        assert_eq!(merged.messages.len(), 2);
        assert_eq!(
            merged.structured_fields,
            StructuredFields::from_value(json!({"a": 1, "b": 3, "c": 4}))
        );
        assert!(!merged.updated_at.is_before(&session.updated_at));
        assert_eq!(store.get(&session.id).await.unwrap(), merged);
    }

    #[tokio::test]
    async fn merge_unknown_id_is_not_found() {
        let store = InMemorySessionStore::new();
        let err = store
            .merge(&SessionId::new(), SessionPatch::new())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionNotFound);
    }

    #[tokio::test]
    async fn completion_flag_stays_set() {
        let store = InMemorySessionStore::new();
        let session = store.create(DocumentType::TermsOfService).await.unwrap();

        store
            .merge(&session.id, SessionPatch::new().with_completed(true))
            .await
            .unwrap();
        let after = store
            .merge(&session.id, SessionPatch::new().with_completed(false))
            .await
            .unwrap();

        assert!(after.is_completed);
    }
}
