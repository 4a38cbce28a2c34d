//! GenerateDocumentHandler - renders a session into a persisted document.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::document::Document;
use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::ports::{DocumentRepository, DocumentSynthesizer, SessionStore, SynthesisError};

#[derive(Debug, Clone)]
pub struct GenerateDocumentCommand {
    pub session_id: SessionId,
}

#[derive(Debug, Clone, Error)]
pub enum GenerateDocumentError {
    #[error("Chat session not found: {0}")]
    SessionNotFound(SessionId),

    /// The synthesizer produced nothing; no document was stored.
    #[error("Failed to generate document: {0}")]
    GenerationFailed(String),

    #[error("Failed to store document: {0}")]
    Store(DomainError),
}

impl From<DomainError> for GenerateDocumentError {
    fn from(err: DomainError) -> Self {
        Self::Store(err)
    }
}

impl From<SynthesisError> for GenerateDocumentError {
    fn from(err: SynthesisError) -> Self {
        match err {
            SynthesisError::GenerationFailed(cause) => Self::GenerationFailed(cause),
        }
    }
}

/// Handler for document generation.
///
/// Completion is not re-checked here: an incomplete session still yields a
/// document with placeholder values.
pub struct GenerateDocumentHandler {
    sessions: Arc<dyn SessionStore>,
    documents: Arc<dyn DocumentRepository>,
    synthesizer: Arc<dyn DocumentSynthesizer>,
}

impl GenerateDocumentHandler {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        documents: Arc<dyn DocumentRepository>,
        synthesizer: Arc<dyn DocumentSynthesizer>,
    ) -> Self {
        Self {
            sessions,
            documents,
            synthesizer,
        }
    }

    pub async fn handle(
        &self,
        cmd: GenerateDocumentCommand,
    ) -> Result<Document, GenerateDocumentError> {
        let id = cmd.session_id;
        let session = self
            .sessions
            .find(&id)
            .await?
            .ok_or(GenerateDocumentError::SessionNotFound(id))?;

        if !session.is_completed {
            tracing::debug!(session_id = %id, "generating from an incomplete session");
        }

        let synthesized = self.synthesizer.synthesize(&session).await.map_err(|e| {
            tracing::error!(session_id = %id, error = %e, "document synthesis failed");
            GenerateDocumentError::from(e)
        })?;

        let document = Document::generated(&session, synthesized.title, synthesized.content);
        self.documents.save(&document).await.map_err(|e| {
            tracing::error!(session_id = %id, error = %e, "failed to store document");
            match e.code() {
                ErrorCode::SessionNotFound => GenerateDocumentError::SessionNotFound(id),
                _ => GenerateDocumentError::Store(e),
            }
        })?;

        tracing::info!(
            session_id = %id,
            document_id = %document.id,
            document_type = document.document_type.as_str(),
            content_len = document.content.len(),
            "document generated"
        );

        Ok(document)
    }
}
