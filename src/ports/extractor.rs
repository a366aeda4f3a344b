//! Extractor Port - Interface for the extraction capability.
//!
//! Given the conversation so far and the documents already stored, an
//! extractor proposes entity values. It never writes anything itself.

use async_trait::async_trait;

use crate::domain::conversation::ConversationMessage;
use crate::domain::extraction::{Document, ExtractionProposal};
use crate::domain::record::EntityKind;

/// Input to one extraction call.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// Ordered conversation window.
    pub messages: Vec<ConversationMessage>,
    /// Stored documents of the target namespaces, offered as context so
    /// proposals can refer to them by id.
    pub existing: Vec<Document>,
    /// Entity kinds the extractor may propose.
    pub targets: Vec<EntityKind>,
    /// Instruction text prepended to the conversation.
    pub instruction: String,
    /// Whether several proposals may be emitted in one call.
    pub allow_parallel: bool,
}

impl ExtractionRequest {
    pub fn new(messages: Vec<ConversationMessage>, targets: Vec<EntityKind>) -> Self {
        Self {
            messages,
            existing: Vec::new(),
            targets,
            instruction: String::new(),
            allow_parallel: true,
        }
    }

    pub fn with_existing(mut self, existing: Vec<Document>) -> Self {
        self.existing = existing;
        self
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }
}

/// Extraction capability errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtractorError {
    /// The backing service failed.
    #[error("extraction call failed: {0}")]
    CallFailed(String),

    /// The service answered with something that is not a usable proposal.
    #[error("malformed extraction output: {0}")]
    MalformedOutput(String),
}

/// Port for the extraction capability
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Proposes entity values for the requested targets.
    ///
    /// An empty list means nothing new was found.
    async fn extract(
        &self,
        request: ExtractionRequest,
    ) -> Result<Vec<ExtractionProposal>, ExtractorError>;
}
