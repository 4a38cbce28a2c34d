//! In-Memory Document Repository

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::document::Document;
use crate::domain::foundation::{DocumentId, DomainError};
use crate::ports::{document_not_found, DocumentRepository};

/// In-memory storage for generated documents.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentRepository {
    documents: Arc<RwLock<HashMap<DocumentId, Document>>>,
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored documents
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn save(&self, document: &Document) -> Result<(), DomainError> {
        self.documents
            .write()
            .await
            .insert(document.id, document.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, DomainError> {
        Ok(self.documents.read().await.get(id).cloned())
    }

    async fn update(&self, document: &Document) -> Result<(), DomainError> {
        let mut documents = self.documents.write().await;
        let stored = documents
            .get_mut(&document.id)
            .ok_or_else(|| document_not_found(&document.id))?;
        *stored = document.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::DocumentStatus;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::intake::{DocumentType, IntakeSession};

    fn document() -> Document {
        let session = IntakeSession::start(DocumentType::PrivacyPolicy);
        Document::generated(&session, "Privacy Policy - Your Business", "body")
    }

    #[tokio::test]
    async fn save_then_find() {
        let repo = InMemoryDocumentRepository::new();
        let doc = document();
        repo.save(&doc).await.unwrap();

        assert_eq!(repo.find_by_id(&doc.id).await.unwrap(), Some(doc));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn update_persists_status() {
        let repo = InMemoryDocumentRepository::new();
        let mut doc = document();
        repo.save(&doc).await.unwrap();

        doc.mark_downloaded().unwrap();
        repo.update(&doc).await.unwrap();

        let stored = repo.find_by_id(&doc.id).await.unwrap().unwrap();
        assert_eq!(stored.status, DocumentStatus::Downloaded);
    }

    #[tokio::test]
    async fn update_unknown_is_not_found() {
        let repo = InMemoryDocumentRepository::new();
        let err = repo.update(&document()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DocumentNotFound);
    }
}
