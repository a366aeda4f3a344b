//! Adapters - Implementations of port interfaces.
//!
//! - `ai` - AI providers and the LLM-backed interview capabilities
//! - `storage` - Record stores (in-memory, YAML files)

pub mod ai;
pub mod storage;

pub use ai::{LlmExtractor, LlmQuestionGenerator, MockAIProvider, OpenAIConfig, OpenAIProvider};
pub use storage::{FileRecordStore, InMemoryRecordStore};
