//! AI Adapters.
//!
//! Providers implementing the AIProvider port, and the LLM-backed
//! implementations of the interview capabilities built on top of them.
//!
//! ## Available Adapters
//!
//! - `MockAIProvider` - Configurable mock for testing
//! - `OpenAIProvider` - OpenAI chat completions with function calling
//! - `LlmExtractor` - Extractor port over any provider
//! - `LlmQuestionGenerator` - QuestionGenerator port over any provider

mod llm_extractor;
mod llm_question_generator;
mod mock_provider;
mod openai_provider;
mod tooling;

pub use llm_extractor::LlmExtractor;
pub use llm_question_generator::LlmQuestionGenerator;
pub use mock_provider::{MockAIProvider, MockError, MockResponse};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
pub use tooling::{entity_tool, merge_message_runs, proposal_from_tool_call, provider_messages, ToolCallError};
