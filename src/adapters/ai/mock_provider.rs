//! Scripted AI provider for tests.
//!
//! Responses are queued up front and handed out one per `complete` call.
//! When the script runs dry the provider answers with plain text, so a test
//! only scripts the calls it cares about. Every request is recorded.
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .with_tool_call("CaseRecord", json!({"personal_info": {"first_name": "Jane"}}))
//!     .with_response("What is your last name?");
//! ```

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, TokenUsage, ToolCall,
};

const DEFAULT_MODEL: &str = "mock-model";
const FALLBACK_TEXT: &str = "Mock response";

/// One scripted answer.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Text(String),
    ToolCalls(Vec<ToolCall>),
    Error(MockError),
}

/// Provider failures a script can inject.
#[derive(Debug, Clone)]
pub enum MockError {
    RateLimited { retry_after_secs: u32 },
    Unavailable { message: String },
    AuthenticationFailed,
    Network { message: String },
    Parse { message: String },
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AIError::rate_limited(retry_after_secs),
            MockError::Unavailable { message } => AIError::unavailable(message),
            MockError::AuthenticationFailed => AIError::AuthenticationFailed,
            MockError::Network { message } => AIError::network(message),
            MockError::Parse { message } => AIError::parse(message),
        }
    }
}

/// Provider double; clones share the script and the call log.
#[derive(Debug, Clone)]
pub struct MockAIProvider {
    model: String,
    script: Arc<Mutex<VecDeque<MockResponse>>>,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl Default for MockAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

// A panicking test thread must not hide the log from the assertions after it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockAIProvider {
    pub fn new() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Queues a plain text answer.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.then(MockResponse::Text(content.into()))
    }

    /// Queues an answer made of a single tool call.
    pub fn with_tool_call(self, name: impl Into<String>, arguments: Value) -> Self {
        self.with_tool_calls(vec![(name.into(), arguments)])
    }

    /// Queues one answer carrying several tool calls, ids `call_0`, `call_1`, ...
    pub fn with_tool_calls(self, calls: Vec<(String, Value)>) -> Self {
        let calls = calls
            .into_iter()
            .enumerate()
            .map(|(i, (name, arguments))| ToolCall::new(format!("call_{}", i), name, arguments))
            .collect();
        self.then(MockResponse::ToolCalls(calls))
    }

    pub fn with_error(self, error: MockError) -> Self {
        self.then(MockResponse::Error(error))
    }

    fn then(self, response: MockResponse) -> Self {
        lock(&self.script).push_back(response);
        self
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Every request received so far, oldest first.
    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        lock(&self.calls).clone()
    }

    fn respond(&self, content: String, tool_calls: Vec<ToolCall>) -> CompletionResponse {
        let finish_reason = if tool_calls.is_empty() {
            FinishReason::Stop
        } else {
            FinishReason::ToolCalls
        };
        CompletionResponse {
            content,
            tool_calls,
            usage: TokenUsage::default(),
            model: self.model.clone(),
            finish_reason,
        }
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        lock(&self.calls).push(request);
        let next = lock(&self.script).pop_front();

        match next {
            Some(MockResponse::Text(content)) => Ok(self.respond(content, Vec::new())),
            Some(MockResponse::ToolCalls(calls)) => Ok(self.respond(String::new(), calls)),
            Some(MockResponse::Error(err)) => Err(err.into()),
            None => Ok(self.respond(FALLBACK_TEXT.to_string(), Vec::new())),
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}
