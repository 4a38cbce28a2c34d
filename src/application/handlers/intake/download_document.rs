//! DownloadDocumentHandler - hands out a document and records the download.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::document::Document;
use crate::domain::foundation::{DocumentId, DomainError, ErrorCode};
use crate::ports::DocumentRepository;

#[derive(Debug, Clone)]
pub struct DownloadDocumentCommand {
    pub document_id: DocumentId,
}

#[derive(Debug, Clone, Error)]
pub enum DownloadDocumentError {
    #[error("Document not found: {0}")]
    NotFound(DocumentId),

    #[error("Document cannot be downloaded: {0}")]
    InvalidState(DomainError),

    #[error("Failed to update document: {0}")]
    Store(DomainError),
}

impl DownloadDocumentError {
    fn from_store(id: DocumentId, err: DomainError) -> Self {
        match err.code() {
            ErrorCode::DocumentNotFound => Self::NotFound(id),
            _ => Self::Store(err),
        }
    }
}

/// Handler for downloads.
///
/// Status only moves forward: a purchased document stays purchased and a
/// repeat download writes nothing.
pub struct DownloadDocumentHandler {
    documents: Arc<dyn DocumentRepository>,
}

impl DownloadDocumentHandler {
    pub fn new(documents: Arc<dyn DocumentRepository>) -> Self {
        Self { documents }
    }

    pub async fn handle(
        &self,
        cmd: DownloadDocumentCommand,
    ) -> Result<Document, DownloadDocumentError> {
        let id = cmd.document_id;
        let mut document = self
            .documents
            .find_by_id(&id)
            .await
            .map_err(|e| DownloadDocumentError::from_store(id, e))?
            .ok_or(DownloadDocumentError::NotFound(id))?;

        let changed = document
            .mark_downloaded()
            .map_err(DownloadDocumentError::InvalidState)?;

        if changed {
            self.documents
                .update(&document)
                .await
                .map_err(|e| DownloadDocumentError::from_store(id, e))?;
            tracing::info!(document_id = %id, "document downloaded");
        }

        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryDocumentRepository;
    use crate::domain::document::DocumentStatus;
    use crate::domain::intake::{DocumentType, IntakeSession};

    async fn stored(documents: &InMemoryDocumentRepository) -> Document {
        let session = IntakeSession::start(DocumentType::TermsOfService);
        let document = Document::generated(&session, "Terms of Service - Acme", "body");
        documents.save(&document).await.unwrap();
        document
    }

    #[tokio::test]
    async fn download_marks_document_downloaded() {
        let documents = InMemoryDocumentRepository::new();
        let document = stored(&documents).await;
        let handler = DownloadDocumentHandler::new(Arc::new(documents.clone()));

        let downloaded = handler
            .handle(DownloadDocumentCommand { document_id: document.id })
            .await
            .unwrap();

        assert_eq!(downloaded.status, DocumentStatus::Downloaded);
        let persisted = documents.find_by_id(&document.id).await.unwrap().unwrap();
        assert_eq!(persisted.status, DocumentStatus::Downloaded);
    }

    #[tokio::test]
    async fn repeat_download_is_idempotent() {
        let documents = InMemoryDocumentRepository::new();
        let document = stored(&documents).await;
        let handler = DownloadDocumentHandler::new(Arc::new(documents));

        let first = handler
            .handle(DownloadDocumentCommand { document_id: document.id })
            .await
            .unwrap();
        let second = handler
            .handle(DownloadDocumentCommand { document_id: document.id })
            .await
            .unwrap();

        assert_eq!(first.status, DocumentStatus::Downloaded);
        assert_eq!(second.status, DocumentStatus::Downloaded);
        assert_eq!(first.updated_at, second.updated_at);
    }

    #[tokio::test]
    async fn purchased_document_never_regresses() {
        let documents = InMemoryDocumentRepository::new();
        let mut document = stored(&documents).await;
        document.mark_purchased().unwrap();
        documents.update(&document).await.unwrap();
        let handler = DownloadDocumentHandler::new(Arc::new(documents));

        let downloaded = handler
            .handle(DownloadDocumentCommand { document_id: document.id })
            .await
            .unwrap();

        assert_eq!(downloaded.status, DocumentStatus::Purchased);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let handler = DownloadDocumentHandler::new(Arc::new(InMemoryDocumentRepository::new()));

        let err = handler
            .handle(DownloadDocumentCommand { document_id: DocumentId::new() })
            .await
            .unwrap_err();

        assert!(matches!(err, DownloadDocumentError::NotFound(_)));
    }
}
