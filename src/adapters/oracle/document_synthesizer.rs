//! LLM-backed DocumentSynthesizer.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::intake::{prompts, IntakeSession};
use crate::ports::{
    AIProvider, CompletionRequest, DocumentSynthesizer, FinishReason, MessageRole,
    RequestMetadata, SynthesisError, SynthesizedDocument,
};

/// Renders a session into a legal document with one provider call.
pub struct LlmDocumentSynthesizer {
    ai_provider: Arc<dyn AIProvider>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl LlmDocumentSynthesizer {
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
}

#[async_trait]
impl DocumentSynthesizer for LlmDocumentSynthesizer {
    async fn synthesize(
        &self,
        session: &IntakeSession,
    ) -> Result<SynthesizedDocument, SynthesisError> {
        let prompt = prompts::synthesis_prompt(session.document_type, &session.structured_fields);

        let mut request = CompletionRequest::new(RequestMetadata::synthesis(session.id))
            .with_message(MessageRole::User, prompt);
        if let Some(max) = self.max_tokens {
            request = request.with_max_tokens(max);
        }
        if let Some(temp) = self.temperature {
            request = request.with_temperature(temp);
        }

        let response = self
            .ai_provider
            .complete(request)
            .await
            .map_err(|e| SynthesisError::GenerationFailed(e.to_string()))?;

        if response.finish_reason == FinishReason::Length {
            tracing::warn!(
                session_id = %session.id,
                completion_tokens = response.usage.completion_tokens,
                "document cut off at token limit"
            );
            return Err(SynthesisError::GenerationFailed(
                "document truncated at max_tokens".to_string(),
            ));
        }

        if response.content.trim().is_empty() {
            return Err(SynthesisError::GenerationFailed(
                "model returned empty document content".to_string(),
            ));
        }

        Ok(SynthesizedDocument {
            title: prompts::document_title(session.document_type, &session.structured_fields),
            content: response.content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::domain::intake::{DocumentType, StructuredFields};
    use serde_json::json;

    #[tokio::test]
    async fn empty_profile_still_produces_a_document() {
        let provider = Arc::new(MockAIProvider::new().with_response("# Privacy Policy\n..."));
        let synthesizer = LlmDocumentSynthesizer::new(provider.clone());
        let session = IntakeSession::start(DocumentType::PrivacyPolicy);

        let doc = synthesizer.synthesize(&session).await.unwrap();

        assert_eq!(doc.title, "Privacy Policy - Your Business");
        assert!(!doc.content.is_empty());
        let prompt = provider.last_prompt().unwrap();
        assert!(prompt.contains("Your Business"));
        assert!(prompt.contains("your-website.com"));
        assert!(prompt.contains("United States"));
    }

    #[tokio::test]
    async fn title_and_prompt_use_collected_fields() {
        let provider = Arc::new(MockAIProvider::new().with_response("terms body"));
        let synthesizer = LlmDocumentSynthesizer::new(provider.clone()).with_max_tokens(8000);
        let mut session = IntakeSession::start(DocumentType::TermsOfService);
        session.structured_fields =
            StructuredFields::from_value(json!({"businessName": "Acme Corp"}));

        let doc = synthesizer.synthesize(&session).await.unwrap();

        assert_eq!(doc.title, "Terms of Service - Acme Corp");
        assert_eq!(doc.content, "terms body");
        let calls = provider.get_calls();
        assert_eq!(calls.len(), 1);
        assert!(!calls[0].json_output);
        assert_eq!(calls[0].max_tokens, Some(8000));
    }

    #[tokio::test]
    async fn provider_failure_is_generation_failed() {
        let provider = Arc::new(MockAIProvider::new().with_error(MockError::Unavailable {
            message: "overloaded".to_string(),
        }));
        let synthesizer = LlmDocumentSynthesizer::new(provider);
        let session = IntakeSession::start(DocumentType::CookieConsent);

        let err = synthesizer.synthesize(&session).await.unwrap_err();
        assert!(matches!(err, SynthesisError::GenerationFailed(ref m) if m.contains("overloaded")));
    }

    #[tokio::test]
    async fn empty_output_is_generation_failed() {
        let provider = Arc::new(MockAIProvider::new().with_response(""));
        let synthesizer = LlmDocumentSynthesizer::new(provider);
        let session = IntakeSession::start(DocumentType::CookieConsent);

        assert!(synthesizer.synthesize(&session).await.is_err());
    }

    #[tokio::test]
    async fn output_cut_off_at_token_limit_is_generation_failed() {
        let provider = Arc::new(
            MockAIProvider::new().with_truncated_response("# Privacy Policy\n\n1. Data We Colle"),
        );
        let synthesizer = LlmDocumentSynthesizer::new(provider).with_max_tokens(8192);
        let session = IntakeSession::start(DocumentType::PrivacyPolicy);

        let err = synthesizer.synthesize(&session).await.unwrap_err();
        assert!(matches!(err, SynthesisError::GenerationFailed(ref m) if m.contains("truncated")));
    }
}
