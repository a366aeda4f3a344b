//! Conversation module - The interview log, its state machine and router.
//!
//! # Module Organization
//!
//! - `message` - `ConversationMessage` log entries
//! - `state` - `InterviewState` and its transition table
//! - `router` - Pure routing over the latest message
//! - `session` - `SessionState` for one running interview
//! - `prompts` - Overridable prompt templates

mod message;
mod prompts;
mod router;
mod session;
mod state;

pub use message::ConversationMessage;
pub use prompts::{render, PromptTemplates, QuestionPromptContext};
pub use router::{Router, RouterConfig, RouterError, DEFAULT_TERMINATION_TOKENS};
pub use session::SessionState;
pub use state::InterviewState;
