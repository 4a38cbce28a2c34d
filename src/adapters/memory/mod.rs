//! In-memory storage adapters.

mod document_repository;
mod session_store;

pub use document_repository::InMemoryDocumentRepository;
pub use session_store::InMemorySessionStore;
