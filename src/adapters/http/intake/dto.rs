//! HTTP DTOs for the intake endpoints.
//!
//! Wire format is camelCase. Turn timestamps are epoch milliseconds; record
//! timestamps are RFC 3339.

use serde::{Deserialize, Serialize};

use crate::domain::document::{Document, DocumentStatus};
use crate::domain::intake::{DocumentType, IntakeSession, StructuredFields, Turn, TurnRole};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// POST /chat-session body. Fields are optional so absence is a 400, not a
/// deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChatSessionRequest {
    #[serde(default)]
    pub document_type: Option<String>,
}

/// POST /chat-message body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// POST /document-generate body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDocumentRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChatSessionResponse {
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnResponse {
    pub role: TurnRole,
    pub content: String,
    pub timestamp: i64,
}

impl From<Turn> for TurnResponse {
    fn from(turn: Turn) -> Self {
        Self {
            role: turn.role,
            content: turn.content,
            timestamp: turn.timestamp,
        }
    }
}

/// Full session view. Extracted fields are exposed as `businessInfo`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: String,
    pub document_type: DocumentType,
    pub messages: Vec<TurnResponse>,
    pub business_info: StructuredFields,
    pub is_completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<IntakeSession> for SessionResponse {
    fn from(session: IntakeSession) -> Self {
        Self {
            id: session.id.to_string(),
            document_type: session.document_type,
            messages: session.messages.into_iter().map(Into::into).collect(),
            business_info: session.structured_fields,
            is_completed: session.is_completed,
            created_at: session.created_at.to_rfc3339(),
            updated_at: session.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub id: String,
    pub session_id: String,
    #[serde(rename = "type")]
    pub document_type: DocumentType,
    pub title: String,
    pub content: String,
    pub status: DocumentStatus,
    pub metadata: StructuredFields,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Document> for DocumentResponse {
    fn from(document: Document) -> Self {
        Self {
            id: document.id.to_string(),
            session_id: document.session_id.to_string(),
            document_type: document.document_type,
            title: document.title,
            content: document.content,
            status: document.status,
            metadata: document.metadata,
            created_at: document.created_at.to_rfc3339(),
            updated_at: document.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateDocumentResponse {
    pub document: DocumentResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadDocumentResponse {
    pub success: bool,
    pub document: DocumentResponse,
    pub message: String,
}

impl DownloadDocumentResponse {
    pub fn ready(document: Document) -> Self {
        Self {
            success: true,
            document: document.into(),
            message: "Document ready for download".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn session_response_uses_wire_names() {
        let mut session = IntakeSession::start(DocumentType::PrivacyPolicy);
        session.structured_fields.insert("businessName", "Acme Corp");

        let value = serde_json::to_value(SessionResponse::from(session)).unwrap();

        assert_eq!(value["documentType"], json!("privacy-policy"));
        assert_eq!(value["businessInfo"], json!({"businessName": "Acme Corp"}));
        assert_eq!(value["isCompleted"], json!(false));
        assert_eq!(value["messages"][0]["role"], json!("assistant"));
        assert!(value["messages"][0]["timestamp"].is_i64());
        assert!(value["createdAt"].is_string());
    }

    #[test]
    fn document_response_exposes_type_key() {
        let session = IntakeSession::start(DocumentType::CookieConsent);
        let document = Document::generated(&session, "Cookie Policy - Your Business", "text");

        let value = serde_json::to_value(DocumentResponse::from(document)).unwrap();

        assert_eq!(value["type"], json!("cookie-consent"));
        assert_eq!(value["status"], json!("generated"));
        assert!(value["sessionId"].is_string());
    }

    #[test]
    fn request_fields_may_be_absent() {
        let req: ChatMessageRequest = serde_json::from_value(json!({})).unwrap();
        assert!(req.session_id.is_none());
        assert!(req.message.is_none());
    }
}
