//! Oracle adapters - the intake oracle ports implemented over an AIProvider.

mod document_synthesizer;
mod extraction_oracle;

pub use document_synthesizer::LlmDocumentSynthesizer;
pub use extraction_oracle::{LlmExtractionOracle, UNAVAILABLE_REPLY};
