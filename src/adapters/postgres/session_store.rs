//! PostgreSQL implementation of SessionStore.
//!
//! Messages and fields are JSONB columns. `merge` runs inside a transaction
//! with a row lock so the read-apply-write cycle is atomic per session.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, SessionId, Timestamp};
use crate::domain::intake::{DocumentType, IntakeSession, SessionPatch, StructuredFields, Turn};
use crate::ports::{session_not_found, SessionStore};

use super::db_error;

const SELECT_SESSION: &str = r#"
    SELECT id, document_type, messages, business_info, is_completed, created_at, updated_at
    FROM chat_sessions
    WHERE id = $1
"#;

const SELECT_SESSION_FOR_UPDATE: &str = r#"
    SELECT id, document_type, messages, business_info, is_completed, created_at, updated_at
    FROM chat_sessions
    WHERE id = $1
    FOR UPDATE
"#;

/// PostgreSQL implementation of SessionStore.
#[derive(Clone)]
pub struct PostgresSessionStore {
    pool: PgPool,
}

impl PostgresSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PostgresSessionStore {
    async fn create(&self, document_type: DocumentType) -> Result<IntakeSession, DomainError> {
        let session = IntakeSession::start(document_type);

        sqlx::query(
            r#"
            INSERT INTO chat_sessions (
                id, document_type, messages, business_info, is_completed, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(session.id.as_uuid())
        .bind(session.document_type.as_str())
        .bind(Json(&session.messages))
        .bind(Json(&session.structured_fields))
        .bind(session.is_completed)
        .bind(session.created_at.as_datetime())
        .bind(session.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to insert chat session"))?;

        Ok(session)
    }

    async fn find(&self, id: &SessionId) -> Result<Option<IntakeSession>, DomainError> {
        let row = sqlx::query(SELECT_SESSION)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch chat session"))?;

        row.map(row_to_session).transpose()
    }

    async fn merge(
        &self,
        id: &SessionId,
        patch: SessionPatch,
    ) -> Result<IntakeSession, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let row = sqlx::query(SELECT_SESSION_FOR_UPDATE)
            .bind(id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error("Failed to lock chat session"))?
            .ok_or_else(|| session_not_found(id))?;

        let mut session = row_to_session(row)?;
        session.apply(patch);

        sqlx::query(
            r#"
            UPDATE chat_sessions SET
                messages = $2,
                business_info = $3,
                is_completed = $4,
                updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(session.id.as_uuid())
        .bind(Json(&session.messages))
        .bind(Json(&session.structured_fields))
        .bind(session.is_completed)
        .bind(session.updated_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to update chat session"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit chat session"))?;

        Ok(session)
    }
}

fn row_to_session(row: sqlx::postgres::PgRow) -> Result<IntakeSession, DomainError> {
    let id: uuid::Uuid = row.try_get("id").map_err(db_error("Failed to get id"))?;

    let document_type: String = row
        .try_get("document_type")
        .map_err(db_error("Failed to get document_type"))?;
    let document_type: DocumentType = document_type
        .parse()
        .map_err(|e| DomainError::database(format!("Invalid document_type: {}", e)))?;

    let Json(messages): Json<Vec<Turn>> = row
        .try_get("messages")
        .map_err(db_error("Failed to get messages"))?;

    let Json(structured_fields): Json<StructuredFields> = row
        .try_get("business_info")
        .map_err(db_error("Failed to get business_info"))?;

    let is_completed: bool = row
        .try_get("is_completed")
        .map_err(db_error("Failed to get is_completed"))?;

    let created_at: chrono::DateTime<chrono::Utc> = row
        .try_get("created_at")
        .map_err(db_error("Failed to get created_at"))?;

    let updated_at: chrono::DateTime<chrono::Utc> = row
        .try_get("updated_at")
        .map_err(db_error("Failed to get updated_at"))?;

    Ok(IntakeSession::reconstitute(
        SessionId::from_uuid(id),
        document_type,
        messages,
        structured_fields,
        is_completed,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}
