//! SubmitMessageHandler - drives one conversational turn.
//!
//! A turn loads the session, refuses it once collection is complete, asks the
//! extraction oracle for a reply, then persists the user turn, the assistant
//! turn and the merged fields in a single store merge. Turns against the same
//! session are serialized through [`SessionLocks`].

use std::sync::Arc;

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::domain::intake::{IntakeSession, ReplySource};
use crate::ports::{ConverseRequest, ExtractionOracle, SessionStore};

use super::SessionLocks;

/// Command to submit a user message to a session.
#[derive(Debug, Clone)]
pub struct SubmitMessageCommand {
    pub session_id: SessionId,
    pub message: String,
}

impl SubmitMessageCommand {
    pub fn new(session_id: SessionId, message: impl Into<String>) -> Self {
        Self {
            session_id,
            message: message.into(),
        }
    }
}

/// Errors that can occur when submitting a message.
#[derive(Debug, Clone, Error)]
pub enum SubmitMessageError {
    /// Message is empty or whitespace only.
    #[error("Message is required")]
    EmptyMessage,

    #[error("Chat session not found: {0}")]
    SessionNotFound(SessionId),

    /// The oracle already declared the intake complete.
    #[error("Conversation is already complete; generate the document instead")]
    AlreadyCompleted(SessionId),

    #[error("Failed to persist turn: {0}")]
    Store(DomainError),
}

impl SubmitMessageError {
    fn from_store(id: SessionId, err: DomainError) -> Self {
        match err.code() {
            ErrorCode::SessionNotFound => Self::SessionNotFound(id),
            ErrorCode::AlreadyCompleted => Self::AlreadyCompleted(id),
            _ => Self::Store(err),
        }
    }
}

/// Result of one turn.
#[derive(Debug, Clone)]
pub struct SubmitMessageResult {
    /// Session after the turn was persisted.
    pub session: IntakeSession,
    /// How the assistant reply was obtained.
    pub reply_source: ReplySource,
}

/// Handler for conversational turns.
pub struct SubmitMessageHandler {
    store: Arc<dyn SessionStore>,
    oracle: Arc<dyn ExtractionOracle>,
    locks: SessionLocks,
}

impl SubmitMessageHandler {
    pub fn new(store: Arc<dyn SessionStore>, oracle: Arc<dyn ExtractionOracle>) -> Self {
        Self {
            store,
            oracle,
            locks: SessionLocks::new(),
        }
    }

    /// Shares a lock table with other handler instances.
    pub fn with_locks(mut self, locks: SessionLocks) -> Self {
        self.locks = locks;
        self
    }

    pub async fn handle(
        &self,
        cmd: SubmitMessageCommand,
    ) -> Result<SubmitMessageResult, SubmitMessageError> {
        if cmd.message.trim().is_empty() {
            return Err(SubmitMessageError::EmptyMessage);
        }

        let id = cmd.session_id;
        let _turn = self.locks.acquire(id).await;

        let session = self
            .store
            .find(&id)
            .await
            .map_err(|e| SubmitMessageError::from_store(id, e))?
            .ok_or(SubmitMessageError::SessionNotFound(id))?;

        session
            .ensure_collecting()
            .map_err(|e| SubmitMessageError::from_store(id, e))?;

        let result = self
            .oracle
            .converse(ConverseRequest::for_session(&session, cmd.message.as_str()))
            .await;

        if result.is_completed {
            let missing = session
                .structured_fields
                .merged_with(&result.extracted_fields)
                .missing_required(session.document_type);
            if !missing.is_empty() {
                tracing::warn!(
                    session_id = %id,
                    missing = ?missing,
                    "oracle declared completion with checklist fields still missing"
                );
            }
        }

        let extracted_keys: Vec<String> = result.extracted_fields.keys().cloned().collect();
        let patch = session.exchange(
            &cmd.message,
            &result.reply_text,
            result.extracted_fields,
            result.is_completed,
        );

        let session = self.store.merge(&id, patch).await.map_err(|e| {
            tracing::error!(session_id = %id, error = %e, "failed to persist turn");
            SubmitMessageError::from_store(id, e)
        })?;

        tracing::info!(
            session_id = %id,
            reply_source = result.source.as_str(),
            extracted_keys = ?extracted_keys,
            is_completed = session.is_completed,
            turns = session.messages.len(),
            "turn processed"
        );

        Ok(SubmitMessageResult {
            session,
            reply_source: result.source,
        })
    }
}
