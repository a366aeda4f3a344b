//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `RecordStore` - Namespaced document store
//! - `Extractor` - Proposes entity values from the conversation
//! - `QuestionGenerator` - Produces the next interview question
//! - `AIProvider` - Chat completion with tool calling, used by the LLM adapters

mod ai_provider;
mod extractor;
mod question_generator;
mod record_store;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, RequestMetadata, TokenUsage, ToolCall, ToolChoice, ToolDefinition,
};
pub use extractor::{ExtractionRequest, Extractor, ExtractorError};
pub use question_generator::{QuestionGenerator, QuestionGeneratorError, QuestionRequest};
pub use record_store::{RecordStore, RecordStoreError};
