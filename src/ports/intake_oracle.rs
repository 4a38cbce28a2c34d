//! Oracle ports - the two language-model calls the intake flow depends on.
//!
//! [`ExtractionOracle`] absorbs every failure into a usable reply;
//! [`DocumentSynthesizer`] surfaces failure so callers can tell "no document"
//! apart from "a document".

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::SessionId;
use crate::domain::intake::{DocumentType, IntakeSession, ReplySource, StructuredFields, Turn};

/// Input for one conversational turn.
#[derive(Debug, Clone)]
pub struct ConverseRequest {
    pub session_id: SessionId,
    pub document_type: DocumentType,
    /// Conversation before the latest user message.
    pub history: Vec<Turn>,
    pub latest_user_message: String,
    pub current_fields: StructuredFields,
}

impl ConverseRequest {
    /// Builds a request from the session state before the user turn is appended.
    pub fn for_session(session: &IntakeSession, latest_user_message: impl Into<String>) -> Self {
        Self {
            session_id: session.id,
            document_type: session.document_type,
            history: session.messages.clone(),
            latest_user_message: latest_user_message.into(),
            current_fields: session.structured_fields.clone(),
        }
    }
}

/// Outcome of one conversational turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ConverseResult {
    pub reply_text: String,
    pub extracted_fields: StructuredFields,
    pub is_completed: bool,
    pub source: ReplySource,
}

/// Produces the next assistant turn and any newly extracted fields.
#[async_trait]
pub trait ExtractionOracle: Send + Sync {
    /// Runs one turn. Infallible: provider failures and malformed output are
    /// folded into the result, tagged by `source`.
    async fn converse(&self, request: ConverseRequest) -> ConverseResult;
}

/// Title and body of a synthesized document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedDocument {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    #[error("document generation failed: {0}")]
    GenerationFailed(String),
}

/// Renders a session's fields into a finished document.
#[async_trait]
pub trait DocumentSynthesizer: Send + Sync {
    /// Does not re-check completion; missing fields get placeholder values.
    async fn synthesize(&self, session: &IntakeSession)
        -> Result<SynthesizedDocument, SynthesisError>;
}
