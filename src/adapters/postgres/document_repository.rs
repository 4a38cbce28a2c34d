//! PostgreSQL implementation of DocumentRepository.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use crate::domain::document::{Document, DocumentStatus};
use crate::domain::foundation::{DocumentId, DomainError, SessionId, Timestamp};
use crate::domain::intake::{DocumentType, StructuredFields};
use crate::ports::{document_not_found, DocumentRepository};

use super::db_error;

/// PostgreSQL implementation of DocumentRepository.
#[derive(Clone)]
pub struct PostgresDocumentRepository {
    pool: PgPool,
}

impl PostgresDocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentRepository for PostgresDocumentRepository {
    async fn save(&self, document: &Document) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO documents (
                id, session_id, type, title, content, status, metadata, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(document.id.as_uuid())
        .bind(document.session_id.as_uuid())
        .bind(document.document_type.as_str())
        .bind(&document.title)
        .bind(&document.content)
        .bind(document.status.as_str())
        .bind(Json(&document.metadata))
        .bind(document.created_at.as_datetime())
        .bind(document.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to insert document"))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, session_id, type, title, content, status, metadata, created_at, updated_at
            FROM documents
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to fetch document"))?;

        row.map(row_to_document).transpose()
    }

    async fn update(&self, document: &Document) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE documents SET
                status = $2,
                updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(document.id.as_uuid())
        .bind(document.status.as_str())
        .bind(document.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to update document"))?;

        if result.rows_affected() == 0 {
            return Err(document_not_found(&document.id));
        }

        Ok(())
    }
}

fn row_to_document(row: sqlx::postgres::PgRow) -> Result<Document, DomainError> {
    let id: uuid::Uuid = row.try_get("id").map_err(db_error("Failed to get id"))?;
    let session_id: uuid::Uuid = row
        .try_get("session_id")
        .map_err(db_error("Failed to get session_id"))?;

    let document_type: String = row.try_get("type").map_err(db_error("Failed to get type"))?;
    let document_type: DocumentType = document_type
        .parse()
        .map_err(|e| DomainError::database(format!("Invalid document type: {}", e)))?;

    let title: String = row.try_get("title").map_err(db_error("Failed to get title"))?;
    let content: String = row
        .try_get("content")
        .map_err(db_error("Failed to get content"))?;

    let status: String = row.try_get("status").map_err(db_error("Failed to get status"))?;
    let status = DocumentStatus::from_tag(&status)
        .ok_or_else(|| DomainError::database(format!("Invalid document status: {}", status)))?;

    let Json(metadata): Json<StructuredFields> = row
        .try_get("metadata")
        .map_err(db_error("Failed to get metadata"))?;

    let created_at: chrono::DateTime<chrono::Utc> = row
        .try_get("created_at")
        .map_err(db_error("Failed to get created_at"))?;
    let updated_at: chrono::DateTime<chrono::Utc> = row
        .try_get("updated_at")
        .map_err(db_error("Failed to get updated_at"))?;

    Ok(Document::reconstitute(
        DocumentId::from_uuid(id),
        SessionId::from_uuid(session_id),
        document_type,
        title,
        content,
        status,
        metadata,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}
