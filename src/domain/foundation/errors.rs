use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Rejected input while building a value object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    EmptyField { field: String },

    #[error("{field} is invalid: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Machine-readable reason. Handlers branch on it to choose their own error
/// variants and the HTTP layer sends it as `code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ValidationFailed,
    SessionNotFound,
    DocumentNotFound,
    AlreadyCompleted,
    InvalidStateTransition,
    GenerationFailed,
    DatabaseError,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::SessionNotFound => "SESSION_NOT_FOUND",
            ErrorCode::DocumentNotFound => "DOCUMENT_NOT_FOUND",
            ErrorCode::AlreadyCompleted => "ALREADY_COMPLETED",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::GenerationFailed => "GENERATION_FAILED",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised by aggregates and storage ports.
#[derive(Debug, Clone, Error)]
#[error("[{code}] {message}")]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    /// Identifiers and other context for logs.
    pub details: HashMap<String, String>,
}

impl DomainError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_name_the_field() {
        assert_eq!(
            ValidationError::empty_field("documentType").to_string(),
            "documentType is required"
        );
        assert_eq!(
            ValidationError::invalid_format("documentType", "unknown tag").to_string(),
            "documentType is invalid: unknown tag"
        );
    }

    #[test]
    fn domain_error_renders_code_then_message() {
        let err = DomainError::new(ErrorCode::SessionNotFound, "Chat session not found");
        assert_eq!(err.to_string(), "[SESSION_NOT_FOUND] Chat session not found");
    }

    #[test]
    fn details_accumulate() {
        let err = DomainError::database("pool timed out")
            .with_detail("session_id", "abc")
            .with_detail("op", "merge");

        assert_eq!(err.code(), ErrorCode::DatabaseError);
        assert_eq!(err.details.len(), 2);
        assert_eq!(err.details["op"], "merge");
    }
}
