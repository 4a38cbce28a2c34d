//! GetDocumentHandler - Query handler for a generated document.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::document::Document;
use crate::domain::foundation::{DocumentId, DomainError};
use crate::ports::DocumentRepository;

#[derive(Debug, Clone)]
pub struct GetDocumentQuery {
    pub document_id: DocumentId,
}

#[derive(Debug, Clone, Error)]
pub enum GetDocumentError {
    #[error("Document not found: {0}")]
    NotFound(DocumentId),

    #[error("Failed to load document: {0}")]
    Store(#[from] DomainError),
}

pub struct GetDocumentHandler {
    documents: Arc<dyn DocumentRepository>,
}

impl GetDocumentHandler {
    pub fn new(documents: Arc<dyn DocumentRepository>) -> Self {
        Self { documents }
    }

    pub async fn handle(&self, query: GetDocumentQuery) -> Result<Document, GetDocumentError> {
        self.documents
            .find_by_id(&query.document_id)
            .await?
            .ok_or(GetDocumentError::NotFound(query.document_id))
    }
}
