//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `SessionStore` - create/get/merge for intake sessions
//! - `DocumentRepository` - generated document persistence
//!
//! ## Oracle Ports
//!
//! - `AIProvider` - raw text completion against a hosted model
//! - `ExtractionOracle` - one conversational turn with field extraction
//! - `DocumentSynthesizer` - document rendering from collected fields

mod ai_provider;
mod document_repository;
mod intake_oracle;
mod session_store;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, RequestPurpose, TokenUsage,
};
pub use document_repository::{document_not_found, DocumentRepository};
pub use intake_oracle::{
    ConverseRequest, ConverseResult, DocumentSynthesizer, ExtractionOracle, SynthesisError,
    SynthesizedDocument,
};
pub use session_store::{session_not_found, SessionStore};
