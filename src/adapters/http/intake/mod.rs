//! HTTP adapter for the intake endpoints.
//!
//! - `POST /api/chat-session` - Open a session for a document type
//! - `GET /api/chat-session/:id` - Session with messages and `businessInfo`
//! - `POST /api/chat-message` - Drive one conversational turn
//! - `POST /api/document-generate` - Synthesize and store a document
//! - `GET /api/document/:id` - Fetch a document
//! - `GET /api/document/:id/download` - Fetch and mark downloaded

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ChatMessageRequest, CreateChatSessionRequest, CreateChatSessionResponse, DocumentResponse,
    DownloadDocumentResponse, ErrorResponse, GenerateDocumentRequest, GenerateDocumentResponse,
    HealthResponse, SessionResponse, TurnResponse,
};
pub use handlers::{IntakeApiError, IntakeAppState};
pub use routes::{intake_router, intake_routes};
