//! GetSessionHandler - Query handler for reading an intake session.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::intake::IntakeSession;
use crate::ports::SessionStore;

#[derive(Debug, Clone)]
pub struct GetSessionQuery {
    pub session_id: SessionId,
}

#[derive(Debug, Clone, Error)]
pub enum GetSessionError {
    #[error("Chat session not found: {0}")]
    NotFound(SessionId),

    #[error("Failed to load session: {0}")]
    Store(#[from] DomainError),
}

pub struct GetSessionHandler {
    store: Arc<dyn SessionStore>,
}

impl GetSessionHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetSessionQuery) -> Result<IntakeSession, GetSessionError> {
        self.store
            .find(&query.session_id)
            .await?
            .ok_or(GetSessionError::NotFound(query.session_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySessionStore;
    use crate::domain::intake::DocumentType;

    #[tokio::test]
    async fn returns_stored_session() {
        let store = InMemorySessionStore::new();
        let created = store.create(DocumentType::CookieConsent).await.unwrap();
        let handler = GetSessionHandler::new(Arc::new(store));

        let session = handler
            .handle(GetSessionQuery { session_id: created.id })
            .await
            .unwrap();

        assert_eq!(session.id, created.id);
        assert_eq!(session.document_type, DocumentType::CookieConsent);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let handler = GetSessionHandler::new(Arc::new(InMemorySessionStore::new()));
        let id = SessionId::new();

        let err = handler
            .handle(GetSessionQuery { session_id: id })
            .await
            .unwrap_err();

        assert!(matches!(err, GetSessionError::NotFound(missing) if missing == id));
    }
}
