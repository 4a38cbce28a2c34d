//! Axum router configuration for the intake endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    create_chat_session, download_document, generate_document, get_chat_session, get_document,
    health, post_chat_message, IntakeAppState,
};

/// Create the intake API routes, un-nested.
///
/// # Routes
/// - `POST /chat-session` - Open a session
/// - `GET /chat-session/:id` - Session view
/// - `POST /chat-message` - Submit a user message
/// - `POST /document-generate` - Synthesize a document
/// - `GET /document/:id` - Document view
/// - `GET /document/:id/download` - Download and mark downloaded
pub fn intake_routes() -> Router<IntakeAppState> {
    Router::new()
        .route("/chat-session", post(create_chat_session))
        .route("/chat-session/:id", get(get_chat_session))
        .route("/chat-message", post(post_chat_message))
        .route("/document-generate", post(generate_document))
        .route("/document/:id", get(get_document))
        .route("/document/:id/download", get(download_document))
}

/// Create the complete intake router with `/api` nesting and `/health`.
///
/// ```ignore
/// let app = intake_router(state).layer(TraceLayer::new_for_http());
/// axum::serve(listener, app).await?;
/// ```
pub fn intake_router(state: IntakeAppState) -> Router {
    Router::new()
        .nest("/api", intake_routes())
        .route("/health", get(health))
        .with_state(state)
}
