//! Language model backends behind the `AIProvider` port.
//!
//! Gemini is the default in production; the mock scripts replies for tests.

mod gemini_provider;
mod mock_provider;
mod openai_provider;
mod transport;

pub use gemini_provider::{GeminiConfig, GeminiProvider};
pub use mock_provider::{MockAIProvider, MockError};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
