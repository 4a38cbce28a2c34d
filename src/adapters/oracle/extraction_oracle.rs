//! LLM-backed ExtractionOracle.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::intake::{prompts, OracleReply, ReplySource, StructuredFields};
use crate::ports::{
    AIProvider, CompletionRequest, ConverseRequest, ConverseResult, ExtractionOracle,
    MessageRole, RequestMetadata,
};

/// Reply used whenever the provider call fails or returns nothing.
pub const UNAVAILABLE_REPLY: &str = "I'm having trouble processing your message. Could you please \
tell me about your business? I'll need details like your business name, website, and what type of \
services you provide.";

/// Runs one extraction turn against an [`AIProvider`].
pub struct LlmExtractionOracle {
    ai_provider: Arc<dyn AIProvider>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl LlmExtractionOracle {
    pub fn new(ai_provider: Arc<dyn AIProvider>) -> Self {
        Self {
            ai_provider,
            max_tokens: None,
            temperature: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    fn build_request(&self, request: &ConverseRequest) -> CompletionRequest {
        let prompt = prompts::extraction_prompt(
            request.document_type,
            &request.history,
            &request.latest_user_message,
            &request.current_fields,
        );

        let mut completion = CompletionRequest::new(RequestMetadata::extraction(request.session_id))
            .with_message(MessageRole::User, prompt)
            .with_json_output();
        if let Some(max) = self.max_tokens {
            completion = completion.with_max_tokens(max);
        }
        if let Some(temp) = self.temperature {
            completion = completion.with_temperature(temp);
        }
        completion
    }

    fn unavailable() -> ConverseResult {
        ConverseResult {
            reply_text: UNAVAILABLE_REPLY.to_string(),
            extracted_fields: StructuredFields::new(),
            is_completed: false,
            source: ReplySource::Unavailable,
        }
    }
}

#[async_trait]
impl ExtractionOracle for LlmExtractionOracle {
    async fn converse(&self, request: ConverseRequest) -> ConverseResult {
        let completion = self.build_request(&request);
        let trace_id = completion.metadata.trace_id.clone();

        let response = match self.ai_provider.complete(completion).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(
                    session_id = %request.session_id,
                    trace_id = %trace_id,
                    error = %err,
                    "extraction oracle unavailable, using fallback reply"
                );
                return Self::unavailable();
            }
        };

        if response.content.trim().is_empty() {
            tracing::warn!(
                session_id = %request.session_id,
                trace_id = %trace_id,
                "extraction oracle returned empty content, using fallback reply"
            );
            return Self::unavailable();
        }

        let reply = OracleReply::parse(&response.content);
        let source = reply.source();
        if source == ReplySource::Malformed {
            tracing::warn!(
                session_id = %request.session_id,
                trace_id = %trace_id,
                "extraction oracle answered in prose; completion forced false"
            );
        }

        let (reply_text, extracted_fields, is_completed) = reply.into_parts();
        ConverseResult {
            reply_text,
            extracted_fields,
            is_completed,
            source,
        }
    }
}
