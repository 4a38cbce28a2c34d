//! StartSessionHandler - Command handler for opening an intake conversation.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::foundation::DomainError;
use crate::domain::intake::{DocumentType, IntakeSession};
use crate::ports::SessionStore;

/// Command to open a new intake session.
#[derive(Debug, Clone)]
pub struct StartSessionCommand {
    /// Raw document type tag as supplied by the client.
    pub document_type: String,
}

impl StartSessionCommand {
    pub fn new(document_type: impl Into<String>) -> Self {
        Self {
            document_type: document_type.into(),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum StartSessionError {
    #[error("Document type is required")]
    MissingDocumentType,

    #[error("Unknown document type: {0}")]
    UnknownDocumentType(String),

    #[error("Failed to create session: {0}")]
    Store(#[from] DomainError),
}

/// Handler for opening sessions.
pub struct StartSessionHandler {
    store: Arc<dyn SessionStore>,
}

impl StartSessionHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, cmd: StartSessionCommand) -> Result<IntakeSession, StartSessionError> {
        let tag = cmd.document_type.trim();
        if tag.is_empty() {
            return Err(StartSessionError::MissingDocumentType);
        }
        let document_type: DocumentType = tag
            .parse()
            .map_err(|_| StartSessionError::UnknownDocumentType(tag.to_string()))?;

        let session = self.store.create(document_type).await?;

        tracing::info!(
            session_id = %session.id,
            document_type = document_type.as_str(),
            "intake session created"
        );

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySessionStore;
    use crate::domain::intake::TurnRole;

    fn handler() -> (StartSessionHandler, InMemorySessionStore) {
        let store = InMemorySessionStore::new();
        (StartSessionHandler::new(Arc::new(store.clone())), store)
    }

    #[tokio::test]
    async fn creates_session_with_greeting() {
        let (handler, store) = handler();

        let session = handler
            .handle(StartSessionCommand::new("privacy-policy"))
            .await
            .unwrap();

        assert_eq!(session.document_type, DocumentType::PrivacyPolicy);
        assert_eq!(session.messages.len(), 1);
        assert_eq!(session.messages[0].role, TurnRole::Assistant);
        assert!(session.messages[0].content.contains("privacy policy"));
        assert!(session.structured_fields.is_empty());
        assert!(!session.is_completed);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn blank_document_type_is_missing() {
        let (handler, store) = handler();

        let err = handler.handle(StartSessionCommand::new("  ")).await.unwrap_err();

        assert!(matches!(err, StartSessionError::MissingDocumentType));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn unknown_document_type_is_rejected() {
        let (handler, _) = handler();

        let err = handler
            .handle(StartSessionCommand::new("employment-contract"))
            .await
            .unwrap_err();

        assert!(matches!(err, StartSessionError::UnknownDocumentType(t) if t == "employment-contract"));
    }
}
