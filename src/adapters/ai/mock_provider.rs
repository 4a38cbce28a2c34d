//! Scripted provider for tests.
//!
//! Replies are queued up front (or pushed later through a shared handle) and
//! handed out in order. Every request is recorded so tests can inspect the
//! prompt the oracles built. An empty queue answers with plain prose.
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .with_json_response(json!({"replyText": "Hi!", "isCompleted": false}))
//!     .with_error(MockError::Network { message: "reset".into() });
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, ProviderInfo,
    TokenUsage,
};

const UNSCRIPTED_REPLY: &str = "Mock response";

#[derive(Debug, Clone, Default)]
pub struct MockAIProvider {
    script: Arc<Mutex<Script>>,
    delay: Duration,
}

#[derive(Debug, Default)]
struct Script {
    queue: VecDeque<Result<(String, FinishReason), MockError>>,
    calls: Vec<CompletionRequest>,
}

/// Failures a test can inject.
#[derive(Debug, Clone)]
pub enum MockError {
    RateLimited { retry_after_secs: u32 },
    Unavailable { message: String },
    AuthenticationFailed,
    Network { message: String },
    Timeout { timeout_secs: u32 },
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AIError::rate_limited(retry_after_secs),
            MockError::Unavailable { message } => AIError::unavailable(message),
            MockError::AuthenticationFailed => AIError::AuthenticationFailed,
            MockError::Network { message } => AIError::network(message),
            MockError::Timeout { timeout_secs } => AIError::Timeout { timeout_secs },
        }
    }
}

impl MockAIProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.push_response(content);
        self
    }

    pub fn with_json_response(self, value: serde_json::Value) -> Self {
        self.with_response(value.to_string())
    }

    /// Queues content that stopped at the token limit.
    pub fn with_truncated_response(self, content: impl Into<String>) -> Self {
        self.script()
            .queue
            .push_back(Ok((content.into(), FinishReason::Length)));
        self
    }

    pub fn with_error(self, error: MockError) -> Self {
        self.push_error(error);
        self
    }

    /// Sleeps this long inside every call, for overlap tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn push_response(&self, content: impl Into<String>) {
        self.script()
            .queue
            .push_back(Ok((content.into(), FinishReason::Stop)));
    }

    pub fn push_error(&self, error: MockError) {
        self.script().queue.push_back(Err(error));
    }

    pub fn call_count(&self) -> usize {
        self.script().calls.len()
    }

    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        self.script().calls.clone()
    }

    /// Last message of the most recent request.
    pub fn last_prompt(&self) -> Option<String> {
        self.script()
            .calls
            .last()
            .and_then(|call| call.messages.last())
            .map(|message| message.content.clone())
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let next = {
            let mut script = self.script();
            script.calls.push(request);
            script.queue.pop_front()
        };

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let (content, finish_reason) =
            next.unwrap_or_else(|| Ok((UNSCRIPTED_REPLY.to_string(), FinishReason::Stop)))?;
        Ok(CompletionResponse {
            usage: TokenUsage::new(10, content.len() as u32),
            content,
            model: "mock-model-1".to_string(),
            finish_reason,
        })
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("mock", "mock-model-1", 128_000)
    }
}
