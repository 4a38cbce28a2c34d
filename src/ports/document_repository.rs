//! Document repository port.
//!
//! Documents are written once by synthesis and afterwards only change
//! status.

use async_trait::async_trait;

use crate::domain::document::Document;
use crate::domain::foundation::{DocumentId, DomainError, ErrorCode};

/// Repository port for generated documents.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Save a new document.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, document: &Document) -> Result<(), DomainError>;

    /// Find a document by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, DomainError>;

    /// Update an existing document (status and `updated_at`).
    ///
    /// # Errors
    ///
    /// - `DocumentNotFound` if the document doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, document: &Document) -> Result<(), DomainError>;
}

/// Standard not-found error for a document id.
pub fn document_not_found(id: &DocumentId) -> DomainError {
    DomainError::new(ErrorCode::DocumentNotFound, "Document not found")
        .with_detail("document_id", id.to_string())
}
