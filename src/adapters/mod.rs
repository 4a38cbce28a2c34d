//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Language-model providers (Gemini, OpenAI, mock)
//! - `oracle` - Extraction and synthesis on top of an `AIProvider`
//! - `memory` - Process-local stores
//! - `postgres` - Durable stores
//! - `http` - REST API

pub mod ai;
pub mod http;
pub mod memory;
pub mod oracle;
pub mod postgres;

pub use ai::{GeminiConfig, GeminiProvider, MockAIProvider, OpenAIConfig, OpenAIProvider};
pub use http::{intake_router, IntakeAppState};
pub use memory::{InMemoryDocumentRepository, InMemorySessionStore};
pub use oracle::{LlmDocumentSynthesizer, LlmExtractionOracle};
pub use postgres::{PostgresDocumentRepository, PostgresSessionStore};
