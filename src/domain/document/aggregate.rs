//! Document aggregate.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DocumentId, DomainError, ErrorCode, SessionId, StateMachine, Timestamp,
};
use crate::domain::intake::{DocumentType, IntakeSession, StructuredFields};

use super::DocumentStatus;

/// A generated legal document.
///
/// `metadata` is a snapshot of the session's fields taken at synthesis
/// time; later session edits never reach it. Only `status` (and
/// `updated_at`) change after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub session_id: SessionId,
    pub document_type: DocumentType,
    pub title: String,
    pub content: String,
    pub status: DocumentStatus,
    pub metadata: StructuredFields,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Document {
    /// Creates a `Generated` document from a session and the synthesized text.
    pub fn generated(
        session: &IntakeSession,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id: DocumentId::new(),
            session_id: session.id,
            document_type: session.document_type,
            title: title.into(),
            content: content.into(),
            status: DocumentStatus::Generated,
            metadata: session.structured_fields.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuilds a document from persisted parts.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: DocumentId,
        session_id: SessionId,
        document_type: DocumentType,
        title: String,
        content: String,
        status: DocumentStatus,
        metadata: StructuredFields,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            session_id,
            document_type,
            title,
            content,
            status,
            metadata,
            created_at,
            updated_at,
        }
    }

    /// Records a download.
    ///
    /// Idempotent: a document already downloaded or purchased is left as is.
    /// Returns true when the status actually changed.
    pub fn mark_downloaded(&mut self) -> Result<bool, DomainError> {
        if self.status.is_delivered() {
            return Ok(false);
        }
        self.advance(DocumentStatus::Downloaded)?;
        Ok(true)
    }

    /// Records a captured payment. Idempotent once purchased.
    ///
    /// No route calls this; it is the entry point for the external checkout
    /// flow, which owns payment capture.
    pub fn mark_purchased(&mut self) -> Result<bool, DomainError> {
        if self.status == DocumentStatus::Purchased {
            return Ok(false);
        }
        self.advance(DocumentStatus::Purchased)?;
        Ok(true)
    }

    fn advance(&mut self, target: DocumentStatus) -> Result<(), DomainError> {
        self.status = self.status.transition_to(target).map_err(|e| {
            DomainError::new(ErrorCode::InvalidStateTransition, e.to_string())
                .with_detail("document_id", self.id.to_string())
        })?;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}
