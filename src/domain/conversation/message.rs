//! Messages of the interview log.
//!
//! The log is append-only; a message never changes once written.

use serde::{Deserialize, Serialize};

use crate::domain::extraction::ExtractionProposal;
use crate::domain::foundation::{MessageId, Timestamp};
use crate::domain::record::EntityKind;

/// One entry of the interview log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversationMessage {
    /// Text typed by the person being interviewed.
    Human {
        id: MessageId,
        text: String,
        created_at: Timestamp,
    },
    /// A question or statement from the assistant.
    AssistantText {
        id: MessageId,
        text: String,
        created_at: Timestamp,
    },
    /// The assistant proposed entity values instead of speaking.
    AssistantProposal {
        id: MessageId,
        proposals: Vec<ExtractionProposal>,
        created_at: Timestamp,
    },
    /// Confirmation that proposals were processed.
    ToolResult {
        id: MessageId,
        content: String,
        created_at: Timestamp,
    },
}

impl ConversationMessage {
    pub fn human(text: impl Into<String>) -> Self {
        Self::Human {
            id: MessageId::new(),
            text: text.into(),
            created_at: Timestamp::now(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::AssistantText {
            id: MessageId::new(),
            text: text.into(),
            created_at: Timestamp::now(),
        }
    }

    pub fn proposal(proposals: Vec<ExtractionProposal>) -> Self {
        Self::AssistantProposal {
            id: MessageId::new(),
            proposals,
            created_at: Timestamp::now(),
        }
    }

    pub fn tool_result(content: impl Into<String>) -> Self {
        Self::ToolResult {
            id: MessageId::new(),
            content: content.into(),
            created_at: Timestamp::now(),
        }
    }

    pub fn id(&self) -> MessageId {
        match self {
            Self::Human { id, .. }
            | Self::AssistantText { id, .. }
            | Self::AssistantProposal { id, .. }
            | Self::ToolResult { id, .. } => *id,
        }
    }

    pub fn created_at(&self) -> Timestamp {
        match self {
            Self::Human { created_at, .. }
            | Self::AssistantText { created_at, .. }
            | Self::AssistantProposal { created_at, .. }
            | Self::ToolResult { created_at, .. } => *created_at,
        }
    }

    pub fn is_human(&self) -> bool {
        matches!(self, Self::Human { .. })
    }

    pub fn is_proposal(&self) -> bool {
        matches!(self, Self::AssistantProposal { .. })
    }

    /// Text shown to a reader of the transcript.
    ///
    /// Proposals are rendered as their JSON payloads.
    pub fn transcript_text(&self) -> String {
        match self {
            Self::Human { text, .. } | Self::AssistantText { text, .. } => text.clone(),
            Self::ToolResult { content, .. } => content.clone(),
            Self::AssistantProposal { proposals, .. } => proposals
                .iter()
                .map(|p| format!("Proposed {}: {}", p.kind, p.payload))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Entity kinds named by a proposal message, in arrival order.
    pub fn proposed_kinds(&self) -> Vec<EntityKind> {
        match self {
            Self::AssistantProposal { proposals, .. } => {
                let mut kinds = Vec::new();
                for proposal in proposals {
                    if !kinds.contains(&proposal.kind) {
                        kinds.push(proposal.kind);
                    }
                }
                kinds
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn messages_get_unique_ids() {
        let a = ConversationMessage::human("hi");
        let b = ConversationMessage::human("hi");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn serializes_with_type_tag() {
        let msg = ConversationMessage::tool_result("Case data updated");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "tool_result");
        assert_eq!(value["content"], "Case data updated");
    }

    #[test]
    fn proposed_kinds_are_deduplicated() {
        let msg = ConversationMessage::proposal(vec![
            ExtractionProposal::new(EntityKind::UserProfile, json!({})),
            ExtractionProposal::new(EntityKind::Case, json!({})),
            ExtractionProposal::new(EntityKind::UserProfile, json!({})),
        ]);
        assert_eq!(msg.proposed_kinds(), vec![EntityKind::UserProfile, EntityKind::Case]);
    }

    #[test]
    fn transcript_text_of_proposal_names_the_kind() {
        let msg = ConversationMessage::proposal(vec![ExtractionProposal::new(
            EntityKind::Case,
            json!({"status": "open"}),
        )]);
        assert!(msg.transcript_text().starts_with("Proposed CaseRecord:"));
    }
}
