//! Question Generator Port - Interface for producing the next question.

use async_trait::async_trait;

use crate::domain::conversation::ConversationMessage;
use crate::domain::foundation::Timestamp;
use crate::domain::record::{CaseRecord, Progress, SchemaDescription};

/// Everything the generator sees when asking the next question.
#[derive(Debug, Clone)]
pub struct QuestionRequest {
    pub schema: &'static SchemaDescription,
    /// Current case, folded from every stored case document.
    pub snapshot: CaseRecord,
    pub progress: Progress,
    pub disclaimer: String,
    pub timestamp: Timestamp,
    /// Conversation so far.
    pub messages: Vec<ConversationMessage>,
}

/// Question generation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QuestionGeneratorError {
    #[error("question generation failed: {0}")]
    CallFailed(String),

    #[error("malformed question output: {0}")]
    MalformedOutput(String),
}

/// Port for the question generation capability
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// Produces the next assistant message.
    ///
    /// Usually `AssistantText`; `AssistantProposal` when the model chose to
    /// record facts instead of asking.
    async fn next_question(
        &self,
        request: QuestionRequest,
    ) -> Result<ConversationMessage, QuestionGeneratorError>;
}
