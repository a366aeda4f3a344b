//! LLM-backed implementation of the QuestionGenerator port.
//!
//! Renders the case manager prompt from the current snapshot and returns
//! either the model's next question or, when the model chose to call the
//! entity tools, a proposal message.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::conversation::{ConversationMessage, PromptTemplates, QuestionPromptContext};
use crate::domain::foundation::UserId;
use crate::domain::record::EntityKind;
use crate::ports::{
    AIError, AIProvider, CompletionRequest, QuestionGenerator, QuestionGeneratorError,
    QuestionRequest, RequestMetadata, ToolChoice,
};

use super::tooling::{entity_tool, proposal_from_tool_call, provider_messages};

/// Missing fields listed by name in the progress line.
const PROGRESS_FIELD_LIMIT: usize = 10;

pub struct LlmQuestionGenerator {
    provider: Arc<dyn AIProvider>,
    user_id: UserId,
    templates: PromptTemplates,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl LlmQuestionGenerator {
    pub fn new(provider: Arc<dyn AIProvider>, user_id: UserId, templates: PromptTemplates) -> Self {
        Self {
            provider,
            user_id,
            templates,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    fn system_prompt(&self, request: &QuestionRequest) -> Result<String, QuestionGeneratorError> {
        let case_data = serde_json::to_string_pretty(&request.snapshot)
            .map_err(|e| QuestionGeneratorError::MalformedOutput(e.to_string()))?;
        let schema = request.schema.to_prompt_json();
        let progress = request.progress.summary(PROGRESS_FIELD_LIMIT);
        let time = request.timestamp.to_rfc3339();

        Ok(self.templates.render_case_manager(QuestionPromptContext {
            schema: &schema,
            case_data: &case_data,
            progress: &progress,
            disclaimer: &request.disclaimer,
            time: &time,
        }))
    }
}

fn call_failed(err: AIError) -> QuestionGeneratorError {
    match err {
        AIError::Parse(message) => QuestionGeneratorError::MalformedOutput(message),
        other => QuestionGeneratorError::CallFailed(other.to_string()),
    }
}

#[async_trait]
impl QuestionGenerator for LlmQuestionGenerator {
    async fn next_question(
        &self,
        request: QuestionRequest,
    ) -> Result<ConversationMessage, QuestionGeneratorError> {
        let metadata = RequestMetadata::new(self.user_id.clone(), Uuid::new_v4().to_string());
        let trace_id = metadata.trace_id.clone();

        let mut completion = CompletionRequest::new(metadata)
            .with_system_prompt(self.system_prompt(&request)?)
            .with_messages(provider_messages(&request.messages))
            .with_tool_choice(ToolChoice::Auto)
            .with_parallel_tool_calls(true);
        for kind in EntityKind::ALL {
            completion = completion.with_tool(entity_tool(kind));
        }
        if let Some(t) = self.temperature {
            completion = completion.with_temperature(t);
        }
        if let Some(max) = self.max_tokens {
            completion = completion.with_max_tokens(max);
        }

        tracing::debug!(
            trace_id = %trace_id,
            model = self.provider.model(),
            filled = request.progress.filled,
            total = request.progress.total,
            "Requesting next question"
        );

        let response = self.provider.complete(completion).await.map_err(call_failed)?;

        if response.has_tool_calls() {
            let proposals = response
                .tool_calls
                .iter()
                .map(proposal_from_tool_call)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| QuestionGeneratorError::MalformedOutput(e.to_string()))?;
            tracing::debug!(trace_id = %trace_id, proposals = proposals.len(), "Model proposed values inline");
            return Ok(ConversationMessage::proposal(proposals));
        }

        let text = response.content.trim();
        if text.is_empty() {
            return Err(QuestionGeneratorError::MalformedOutput(
                "empty question".to_string(),
            ));
        }
        Ok(ConversationMessage::assistant(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::domain::foundation::Timestamp;
    use crate::domain::record::{CaseRecord, SchemaEntity};
    use serde_json::json;

    fn generator(provider: &MockAIProvider) -> LlmQuestionGenerator {
        LlmQuestionGenerator::new(
            Arc::new(provider.clone()),
            UserId::new("user-1").unwrap(),
            PromptTemplates::default(),
        )
    }

    fn request() -> QuestionRequest {
        let snapshot = CaseRecord::open(Timestamp::now());
        QuestionRequest {
            schema: EntityKind::Case.schema(),
            progress: crate::domain::record::completion(&snapshot),
            snapshot,
            disclaimer: "NOTICE TEXT".to_string(),
            timestamp: Timestamp::now(),
            messages: vec![ConversationMessage::human("Hello")],
        }
    }

    #[tokio::test]
    async fn text_answer_becomes_assistant_message() {
        let provider = MockAIProvider::new().with_response("  What is your name?  ");
        let message = generator(&provider).next_question(request()).await.unwrap();

        assert_eq!(message.transcript_text(), "What is your name?");
        assert!(matches!(message, ConversationMessage::AssistantText { .. }));
    }

    #[tokio::test]
    async fn prompt_carries_schema_snapshot_and_disclaimer() {
        let provider = MockAIProvider::new().with_response("Question?");
        generator(&provider).next_question(request()).await.unwrap();

        let call = &provider.get_calls()[0];
        let prompt = call.system_prompt.clone().unwrap();
        assert!(prompt.contains("NOTICE TEXT"));
        assert!(prompt.contains(CaseRecord::NAME) || prompt.contains("personal_info"));
        assert!(prompt.contains(crate::domain::record::INTAKE_IN_PROGRESS));
        assert_eq!(call.tools.len(), EntityKind::ALL.len());
    }

    #[tokio::test]
    async fn tool_calls_become_proposal_message() {
        let provider = MockAIProvider::new().with_tool_call(
            "CaseRecord",
            json!({"record": {"personal_info": {"first_name": "Jane"}}}),
        );
        let message = generator(&provider).next_question(request()).await.unwrap();

        assert!(message.is_proposal());
        assert_eq!(message.proposed_kinds(), vec![EntityKind::Case]);
    }

    #[tokio::test]
    async fn empty_answer_is_malformed() {
        let provider = MockAIProvider::new().with_response("   ");
        let result = generator(&provider).next_question(request()).await;
        assert!(matches!(result, Err(QuestionGeneratorError::MalformedOutput(_))));
    }

    #[tokio::test]
    async fn provider_error_is_call_failure() {
        let provider = MockAIProvider::new().with_error(MockError::RateLimited {
            retry_after_secs: 1,
        });
        let result = generator(&provider).next_question(request()).await;
        assert!(matches!(result, Err(QuestionGeneratorError::CallFailed(_))));
    }
}
