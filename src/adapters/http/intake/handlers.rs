//! HTTP handlers for the intake endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::application::handlers::intake::{
    DownloadDocumentCommand, DownloadDocumentError, DownloadDocumentHandler,
    GenerateDocumentCommand, GenerateDocumentError, GenerateDocumentHandler, GetDocumentError,
    GetDocumentHandler, GetDocumentQuery, GetSessionError, GetSessionHandler, GetSessionQuery,
    SessionLocks, StartSessionCommand, StartSessionError, StartSessionHandler,
    SubmitMessageCommand, SubmitMessageError, SubmitMessageHandler,
};
use crate::domain::foundation::{DocumentId, ErrorCode, SessionId};
use crate::ports::{DocumentRepository, DocumentSynthesizer, ExtractionOracle, SessionStore};

use super::dto::{
    ChatMessageRequest, CreateChatSessionRequest, CreateChatSessionResponse, DocumentResponse,
    DownloadDocumentResponse, ErrorResponse, GenerateDocumentRequest, GenerateDocumentResponse,
    HealthResponse, SessionResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Application state
// ════════════════════════════════════════════════════════════════════════════

/// Shared state for the intake router.
#[derive(Clone)]
pub struct IntakeAppState {
    pub sessions: Arc<dyn SessionStore>,
    pub documents: Arc<dyn DocumentRepository>,
    pub extraction_oracle: Arc<dyn ExtractionOracle>,
    pub synthesizer: Arc<dyn DocumentSynthesizer>,
    pub locks: SessionLocks,
}

impl IntakeAppState {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        documents: Arc<dyn DocumentRepository>,
        extraction_oracle: Arc<dyn ExtractionOracle>,
        synthesizer: Arc<dyn DocumentSynthesizer>,
    ) -> Self {
        Self {
            sessions,
            documents,
            extraction_oracle,
            synthesizer,
            locks: SessionLocks::new(),
        }
    }

    pub fn start_session_handler(&self) -> StartSessionHandler {
        StartSessionHandler::new(self.sessions.clone())
    }

    pub fn get_session_handler(&self) -> GetSessionHandler {
        GetSessionHandler::new(self.sessions.clone())
    }

    /// All submit handlers share one lock table.
    pub fn submit_message_handler(&self) -> SubmitMessageHandler {
        SubmitMessageHandler::new(self.sessions.clone(), self.extraction_oracle.clone())
            .with_locks(self.locks.clone())
    }

    pub fn generate_document_handler(&self) -> GenerateDocumentHandler {
        GenerateDocumentHandler::new(
            self.sessions.clone(),
            self.documents.clone(),
            self.synthesizer.clone(),
        )
    }

    pub fn get_document_handler(&self) -> GetDocumentHandler {
        GetDocumentHandler::new(self.documents.clone())
    }

    pub fn download_document_handler(&self) -> DownloadDocumentHandler {
        DownloadDocumentHandler::new(self.documents.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Session endpoints
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/chat-session - Open a session for a document type
pub async fn create_chat_session(
    State(state): State<IntakeAppState>,
    payload: Result<Json<CreateChatSessionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, IntakeApiError> {
    let request = body(payload)?;
    let document_type = request
        .document_type
        .ok_or_else(|| IntakeApiError::bad_request("Document type is required"))?;

    let session = state
        .start_session_handler()
        .handle(StartSessionCommand::new(document_type))
        .await?;

    Ok(Json(CreateChatSessionResponse {
        session_id: session.id.to_string(),
    }))
}

/// GET /api/chat-session/:id - Full session view
pub async fn get_chat_session(
    State(state): State<IntakeAppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, IntakeApiError> {
    let session_id = parse_session_id(&id)?;

    let session = state
        .get_session_handler()
        .handle(GetSessionQuery { session_id })
        .await?;

    Ok(Json(SessionResponse::from(session)))
}

/// POST /api/chat-message - Submit one user message
pub async fn post_chat_message(
    State(state): State<IntakeAppState>,
    payload: Result<Json<ChatMessageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, IntakeApiError> {
    let request = body(payload)?;
    let (Some(session_id), Some(message)) = (request.session_id, request.message) else {
        return Err(IntakeApiError::bad_request(
            "Session ID and message are required",
        ));
    };
    if session_id.trim().is_empty() || message.trim().is_empty() {
        return Err(IntakeApiError::bad_request(
            "Session ID and message are required",
        ));
    }
    let session_id = parse_session_id(&session_id)?;

    let result = state
        .submit_message_handler()
        .handle(SubmitMessageCommand::new(session_id, message))
        .await?;

    Ok(Json(SessionResponse::from(result.session)))
}

// ════════════════════════════════════════════════════════════════════════════
// Document endpoints
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/document-generate - Synthesize and store a document
pub async fn generate_document(
    State(state): State<IntakeAppState>,
    payload: Result<Json<GenerateDocumentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, IntakeApiError> {
    let request = body(payload)?;
    let session_id = request
        .session_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| IntakeApiError::bad_request("Session ID is required"))?;
    let session_id = parse_session_id(&session_id)?;

    let document = state
        .generate_document_handler()
        .handle(GenerateDocumentCommand { session_id })
        .await?;

    Ok(Json(GenerateDocumentResponse {
        document: document.into(),
    }))
}

/// GET /api/document/:id - Fetch a generated document
pub async fn get_document(
    State(state): State<IntakeAppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, IntakeApiError> {
    let document_id = parse_document_id(&id)?;

    let document = state
        .get_document_handler()
        .handle(GetDocumentQuery { document_id })
        .await?;

    Ok(Json(DocumentResponse::from(document)))
}

/// GET /api/document/:id/download - Fetch and mark downloaded
pub async fn download_document(
    State(state): State<IntakeAppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, IntakeApiError> {
    let document_id = parse_document_id(&id)?;

    let document = state
        .download_document_handler()
        .handle(DownloadDocumentCommand { document_id })
        .await?;

    Ok(Json(DownloadDocumentResponse::ready(document)))
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ════════════════════════════════════════════════════════════════════════════
// Request helpers
// ════════════════════════════════════════════════════════════════════════════

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, IntakeApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| IntakeApiError::bad_request(rejection.body_text()))
}

/// Ids are opaque to clients, so a malformed one is simply unknown.
fn parse_session_id(raw: &str) -> Result<SessionId, IntakeApiError> {
    raw.trim()
        .parse()
        .map_err(|_| IntakeApiError::session_not_found())
}

fn parse_document_id(raw: &str) -> Result<DocumentId, IntakeApiError> {
    raw.trim()
        .parse()
        .map_err(|_| IntakeApiError::document_not_found())
}

// ════════════════════════════════════════════════════════════════════════════
// Error mapping
// ════════════════════════════════════════════════════════════════════════════

/// API error rendered as `{ code, message }`.
#[derive(Debug)]
pub struct IntakeApiError {
    status: StatusCode,
    code: ErrorCode,
    message: String,
}

impl IntakeApiError {
    fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ErrorCode::ValidationFailed, message)
    }

    pub fn session_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, ErrorCode::SessionNotFound, "Chat session not found")
    }

    pub fn document_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, ErrorCode::DocumentNotFound, "Document not found")
    }

    /// 500 with the underlying cause in the message.
    pub fn internal(context: &str, cause: impl std::fmt::Display) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalError,
            format!("{}: {}", context, cause),
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<StartSessionError> for IntakeApiError {
    fn from(err: StartSessionError) -> Self {
        match err {
            StartSessionError::MissingDocumentType | StartSessionError::UnknownDocumentType(_) => {
                Self::bad_request(err.to_string())
            }
            StartSessionError::Store(e) => Self::internal("Failed to create chat session", e),
        }
    }
}

impl From<GetSessionError> for IntakeApiError {
    fn from(err: GetSessionError) -> Self {
        match err {
            GetSessionError::NotFound(_) => Self::session_not_found(),
            GetSessionError::Store(e) => Self::internal("Failed to fetch chat session", e),
        }
    }
}

impl From<SubmitMessageError> for IntakeApiError {
    fn from(err: SubmitMessageError) -> Self {
        match err {
            SubmitMessageError::EmptyMessage => {
                Self::bad_request("Session ID and message are required")
            }
            SubmitMessageError::SessionNotFound(_) => Self::session_not_found(),
            SubmitMessageError::AlreadyCompleted(_) => {
                Self::new(StatusCode::CONFLICT, ErrorCode::AlreadyCompleted, err.to_string())
            }
            SubmitMessageError::Store(e) => Self::internal("Failed to process message", e),
        }
    }
}

impl From<GenerateDocumentError> for IntakeApiError {
    fn from(err: GenerateDocumentError) -> Self {
        match err {
            GenerateDocumentError::SessionNotFound(_) => Self::session_not_found(),
            GenerateDocumentError::GenerationFailed(_) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::GenerationFailed,
                err.to_string(),
            ),
            GenerateDocumentError::Store(e) => Self::internal("Failed to generate document", e),
        }
    }
}

impl From<GetDocumentError> for IntakeApiError {
    fn from(err: GetDocumentError) -> Self {
        match err {
            GetDocumentError::NotFound(_) => Self::document_not_found(),
            GetDocumentError::Store(e) => Self::internal("Failed to fetch document", e),
        }
    }
}

impl From<DownloadDocumentError> for IntakeApiError {
    fn from(err: DownloadDocumentError) -> Self {
        match err {
            DownloadDocumentError::NotFound(_) => Self::document_not_found(),
            DownloadDocumentError::InvalidState(_) => {
                Self::new(StatusCode::CONFLICT, ErrorCode::InvalidStateTransition, err.to_string())
            }
            DownloadDocumentError::Store(e) => Self::internal("Failed to download document", e),
        }
    }
}

impl IntoResponse for IntakeApiError {
    fn into_response(self) -> axum::response::Response {
        if self.status.is_server_error() {
            tracing::error!(code = %self.code, message = %self.message, "request failed");
        }
        let body = ErrorResponse::new(self.code.as_str(), self.message);
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::DomainError;

    #[test]
    fn already_completed_maps_to_409() {
        let err: IntakeApiError = SubmitMessageError::AlreadyCompleted(SessionId::new()).into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.code, ErrorCode::AlreadyCompleted);
    }

    #[test]
    fn not_found_variants_map_to_404() {
        let session: IntakeApiError = GetSessionError::NotFound(SessionId::new()).into();
        let document: IntakeApiError = GetDocumentError::NotFound(DocumentId::new()).into();
        assert_eq!(session.status(), StatusCode::NOT_FOUND);
        assert_eq!(document.status(), StatusCode::NOT_FOUND);
        assert_eq!(session.message, "Chat session not found");
    }

    #[test]
    fn generation_failure_is_500_with_cause() {
        let err: IntakeApiError =
            GenerateDocumentError::GenerationFailed("provider unavailable: overloaded".into())
                .into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code, ErrorCode::GenerationFailed);
        assert!(err.message.contains("overloaded"));
    }

    #[test]
    fn store_failure_is_500_with_cause() {
        let cause = DomainError::new(ErrorCode::DatabaseError, "connection refused");
        let err: IntakeApiError = SubmitMessageError::Store(cause).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.message.starts_with("Failed to process message"));
        assert!(err.message.contains("connection refused"));
    }

    #[test]
    fn unknown_document_type_is_400() {
        let err: IntakeApiError = StartSessionError::UnknownDocumentType("lease".into()).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn malformed_ids_read_as_not_found() {
        assert_eq!(
            parse_session_id("not-a-uuid").unwrap_err().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            parse_document_id("").unwrap_err().status(),
            StatusCode::NOT_FOUND
        );
    }
}
