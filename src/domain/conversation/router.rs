//! Conversation router.
//!
//! A pure function from the most recent log entry to the next interview
//! state. No fallback route exists: a log the rules do not cover is an
//! error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::record::EntityKind;

use super::{ConversationMessage, InterviewState};

/// Words that end the interview when sent on their own.
pub const DEFAULT_TERMINATION_TOKENS: [&str; 3] = ["quit", "exit", "terminate"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    #[error("cannot route: {0}")]
    UnrecognizedRoute(String),
}

/// Router settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Matched against the trimmed, lower-cased human text.
    pub termination_tokens: Vec<String>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            termination_tokens: DEFAULT_TERMINATION_TOKENS
                .iter()
                .map(|t| t.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Router {
    termination_tokens: Vec<String>,
}

impl Router {
    pub fn new(config: RouterConfig) -> Self {
        Self {
            termination_tokens: config
                .termination_tokens
                .into_iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    /// Decides the next state from the last message of the log.
    pub fn decide(&self, last: Option<&ConversationMessage>) -> Result<InterviewState, RouterError> {
        let message = last.ok_or_else(|| {
            RouterError::UnrecognizedRoute("the conversation log is empty".to_string())
        })?;

        match message {
            ConversationMessage::Human { text, .. } => {
                if self.is_termination(text) {
                    Ok(InterviewState::Terminated)
                } else {
                    Ok(InterviewState::NeedsExtraction)
                }
            }
            ConversationMessage::AssistantProposal { .. } => {
                let kinds = message.proposed_kinds();
                if kinds.is_empty() {
                    return Err(RouterError::UnrecognizedRoute(
                        "assistant proposal message carries no proposals".to_string(),
                    ));
                }
                if kinds.contains(&EntityKind::Case) {
                    Ok(InterviewState::ExtractCase)
                } else {
                    Ok(InterviewState::ExtractUser)
                }
            }
            ConversationMessage::AssistantText { .. } => Ok(InterviewState::AwaitingUser),
            ConversationMessage::ToolResult { .. } => Ok(InterviewState::AskNextQuestion),
        }
    }

    pub fn is_termination(&self, text: &str) -> bool {
        let normalized = text.trim().to_lowercase();
        self.termination_tokens.iter().any(|t| *t == normalized)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(RouterConfig::default())
    }
}

impl From<RouterConfig> for Router {
    fn from(config: RouterConfig) -> Self {
        Self::new(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::extraction::ExtractionProposal;
    use serde_json::json;

    fn router() -> Router {
        Router::new(RouterConfig::default())
    }

    fn proposal(kind: EntityKind) -> ExtractionProposal {
        ExtractionProposal::new(kind, json!({}))
    }

    #[test]
    fn empty_log_is_unrecognized() {
        assert!(matches!(
            router().decide(None),
            Err(RouterError::UnrecognizedRoute(_))
        ));
    }

    #[test]
    fn termination_tokens_ignore_case_and_whitespace() {
        for text in ["quit", "  EXIT ", "Terminate\n"] {
            let msg = ConversationMessage::human(text);
            assert_eq!(router().decide(Some(&msg)), Ok(InterviewState::Terminated));
        }
    }

    #[test]
    fn token_inside_sentence_does_not_terminate() {
        let msg = ConversationMessage::human("I had to quit my job");
        assert_eq!(router().decide(Some(&msg)), Ok(InterviewState::NeedsExtraction));
    }

    #[test]
    fn custom_tokens_replace_defaults() {
        let router = Router::new(RouterConfig {
            termination_tokens: vec!["Stop".to_string()],
        });
        assert!(router.is_termination("stop"));
        assert!(!router.is_termination("quit"));
    }

    #[test]
    fn proposal_routing_prefers_case() {
        let mixed = ConversationMessage::proposal(vec![
            proposal(EntityKind::UserProfile),
            proposal(EntityKind::Case),
        ]);
        let user_only = ConversationMessage::proposal(vec![proposal(EntityKind::UserProfile)]);

        assert_eq!(router().decide(Some(&mixed)), Ok(InterviewState::ExtractCase));
        assert_eq!(router().decide(Some(&user_only)), Ok(InterviewState::ExtractUser));
    }

    #[test]
    fn repeated_user_proposals_route_to_user_extraction() {
        let repeated = ConversationMessage::proposal(vec![
            proposal(EntityKind::UserProfile),
            proposal(EntityKind::UserProfile),
        ]);
        assert_eq!(repeated.proposed_kinds(), vec![EntityKind::UserProfile]);
        assert_eq!(router().decide(Some(&repeated)), Ok(InterviewState::ExtractUser));
    }

    #[test]
    fn proposal_without_proposals_fails_loudly() {
        let msg = ConversationMessage::proposal(Vec::new());
        assert!(router().decide(Some(&msg)).is_err());
    }

    #[test]
    fn assistant_text_ends_the_turn() {
        let msg = ConversationMessage::assistant("What is your name?");
        assert_eq!(router().decide(Some(&msg)), Ok(InterviewState::AwaitingUser));
    }

    #[test]
    fn tool_result_asks_next_question() {
        let msg = ConversationMessage::tool_result("Case data updated");
        assert_eq!(router().decide(Some(&msg)), Ok(InterviewState::AskNextQuestion));
    }

    #[test]
    fn decision_is_deterministic() {
        let msg = ConversationMessage::human("My name is Jane");
        let first = router().decide(Some(&msg));
        for _ in 0..10 {
            assert_eq!(router().decide(Some(&msg)), first);
        }
    }
}
