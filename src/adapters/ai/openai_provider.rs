//! OpenAI chat completions backend (`POST {base}/chat/completions`).
//!
//! ```ignore
//! let provider = OpenAIProvider::new(OpenAIConfig::new(api_key).with_model("gpt-4o"))?;
//! ```

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::transport;
use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, MessageRole,
    ProviderInfo, TokenUsage,
};

#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    api_key: Secret<String>,
    pub model: String,
    /// Any OpenAI-compatible endpoint works here.
    pub base_url: String,
    pub timeout: Duration,
}

impl OpenAIConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

pub struct OpenAIProvider {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIProvider {
    pub fn new(config: OpenAIConfig) -> Result<Self, AIError> {
        let client = transport::client(config.timeout)?;
        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn build_body<'a>(&'a self, request: &'a CompletionRequest) -> ChatBody<'a> {
        let system = request.system_prompt.as_deref().map(|content| ChatMessage {
            role: "system",
            content,
        });
        let turns = request.messages.iter().map(|m| ChatMessage {
            role: match m.role {
                MessageRole::System => "system",
                MessageRole::User => "user",
                MessageRole::Assistant => "assistant",
            },
            content: &m.content,
        });

        ChatBody {
            model: &self.config.model,
            messages: system.into_iter().chain(turns).collect(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            response_format: request
                .json_output
                .then_some(ResponseFormat { kind: "json_object" }),
        }
    }

    /// Reads "try again in 20s" style hints from a 429 body.
    fn retry_hint(body: &str) -> Option<u32> {
        let parsed: ErrorBody = serde_json::from_str(body).ok()?;
        let message = parsed.error.message;
        let start = message.find("try again in ")? + "try again in ".len();
        let digits: String = message[start..]
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        digits.parse().ok()
    }

    fn into_completion(body: ChatReply) -> Result<CompletionResponse, AIError> {
        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AIError::parse("reply had no choices"))?;

        let finish_reason = match choice.finish_reason.as_deref() {
            Some("length") => FinishReason::Length,
            Some("content_filter") => FinishReason::ContentFilter,
            _ => FinishReason::Stop,
        };

        Ok(CompletionResponse {
            content: choice.message.content.unwrap_or_default(),
            usage: body
                .usage
                .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens))
                .unwrap_or_default(),
            model: body.model,
            finish_reason,
        })
    }
}

#[async_trait]
impl AIProvider for OpenAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&self.build_body(&request))
            .send()
            .await
            .map_err(|e| transport::send_error(e, self.config.timeout))?;
        let response = transport::check_status(response, Self::retry_hint).await?;

        let body: ChatReply = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("malformed chat reply: {e}")))?;
        Self::into_completion(body)
    }

    fn provider_info(&self) -> ProviderInfo {
        let model = self.config.model.as_str();
        let legacy = model.starts_with("gpt-4")
            && !model.starts_with("gpt-4o")
            && !model.starts_with("gpt-4-turbo");
        let context = if legacy { 8_192 } else { 128_000 };
        ProviderInfo::new("openai", model, context)
    }
}

#[derive(Debug, Serialize)]
struct ChatBody<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    model: String,
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;
    use crate::ports::RequestMetadata;

    fn provider() -> OpenAIProvider {
        OpenAIProvider::new(OpenAIConfig::new("test-key")).unwrap()
    }

    #[test]
    fn system_prompt_leads_and_json_mode_is_requested() {
        let request = CompletionRequest::new(RequestMetadata::extraction(SessionId::new()))
            .with_system_prompt("Be brief")
            .with_message(MessageRole::User, "hello")
            .with_json_output();
        let provider = provider();

        let body = serde_json::to_value(provider.build_body(&request)).unwrap();

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hello");
        assert_eq!(body["response_format"]["type"], "json_object");
    }

    #[test]
    fn unset_options_are_omitted() {
        let request = CompletionRequest::new(RequestMetadata::synthesis(SessionId::new()))
            .with_message(MessageRole::User, "write");
        let provider = provider();

        let body = serde_json::to_value(provider.build_body(&request)).unwrap();

        assert!(body.get("response_format").is_none());
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn base_url_trailing_slash_is_ignored() {
        let provider = OpenAIProvider::new(
            OpenAIConfig::new("k")
                .with_base_url("http://localhost/v1/")
                .with_timeout(Duration::from_secs(5)),
        )
        .unwrap();
        assert_eq!(provider.completions_url(), "http://localhost/v1/chat/completions");
    }

    #[test]
    fn context_window_follows_model_family() {
        assert_eq!(provider().provider_info().max_context_tokens, 128_000);
        let legacy = OpenAIProvider::new(OpenAIConfig::new("k").with_model("gpt-4")).unwrap();
        assert_eq!(legacy.provider_info().max_context_tokens, 8_192);
    }

    #[test]
    fn retry_hint_is_read_from_error_message() {
        let body = r#"{"error":{"message":"Rate limit exceeded. Please try again in 20s."}}"#;
        assert_eq!(OpenAIProvider::retry_hint(body), Some(20));
        assert_eq!(OpenAIProvider::retry_hint("not json"), None);
    }

    #[test]
    fn first_choice_becomes_completion() {
        let body: ChatReply = serde_json::from_str(
            r#"{"model":"gpt-4o-2024","choices":[{"message":{"content":"hi"},"finish_reason":"length"}],
                "usage":{"prompt_tokens":3,"completion_tokens":1}}"#,
        )
        .unwrap();

        let completion = OpenAIProvider::into_completion(body).unwrap();

        assert_eq!(completion.content, "hi");
        assert_eq!(completion.finish_reason, FinishReason::Length);
        assert_eq!(completion.usage.total_tokens, 4);
    }

    #[test]
    fn empty_choices_is_parse_error() {
        let body: ChatReply = serde_json::from_str(r#"{"model":"m","choices":[]}"#).unwrap();
        assert!(matches!(
            OpenAIProvider::into_completion(body),
            Err(AIError::Parse(_))
        ));
    }
}
