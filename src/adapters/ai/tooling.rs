//! Translation between interview types and provider tool calls.

use serde_json::{json, Value};

use crate::domain::conversation::ConversationMessage;
use crate::domain::extraction::ExtractionProposal;
use crate::domain::foundation::DocumentId;
use crate::domain::record::EntityKind;
use crate::ports::{Message, MessageRole, ToolCall, ToolDefinition};

/// Argument key carrying the entity value.
pub const RECORD_ARG: &str = "record";
/// Argument key carrying the existing-document hint.
pub const EXISTING_ID_ARG: &str = "existing_id";

/// Tool through which the model proposes a value of `kind`.
pub fn entity_tool(kind: EntityKind) -> ToolDefinition {
    let schema = kind.schema();
    ToolDefinition::new(
        kind.tool_name(),
        format!(
            "Record facts for: {}. Pass existing_id to revise a stored document.",
            schema.schema.description
        ),
        json!({
            "type": "object",
            "properties": {
                EXISTING_ID_ARG: {
                    "type": ["string", "null"],
                    "description": "Id of the stored document this value revises; null for a new document"
                },
                RECORD_ARG: schema.to_json_schema(),
            },
            "required": [RECORD_ARG],
        }),
    )
}

/// Reasons a tool call cannot become a proposal.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ToolCallError {
    #[error("unknown tool {0}")]
    UnknownTool(String),

    #[error("tool {tool} called without a record object")]
    MissingRecord { tool: String },

    #[error("tool {tool} has a non-string existing_id")]
    InvalidHint { tool: String },
}

/// Reads a proposal out of a tool call.
///
/// An empty or null `existing_id` means "new document". The payload is not
/// validated against its schema here.
pub fn proposal_from_tool_call(call: &ToolCall) -> Result<ExtractionProposal, ToolCallError> {
    let kind = EntityKind::from_tool_name(&call.name)
        .ok_or_else(|| ToolCallError::UnknownTool(call.name.clone()))?;

    let record = call
        .arguments
        .get(RECORD_ARG)
        .filter(|v| v.is_object())
        .cloned()
        .ok_or_else(|| ToolCallError::MissingRecord {
            tool: call.name.clone(),
        })?;

    let hint = match call.arguments.get(EXISTING_ID_ARG) {
        None | Some(Value::Null) => None,
        Some(Value::String(id)) => DocumentId::new(id.clone()).ok(),
        Some(_) => {
            return Err(ToolCallError::InvalidHint {
                tool: call.name.clone(),
            })
        }
    };

    let proposal = ExtractionProposal::new(kind, record);
    Ok(match hint {
        Some(id) => proposal.with_hint(id),
        None => proposal,
    })
}

/// Converts the interview log into provider messages.
///
/// Proposals and tool confirmations are shown as assistant text, and
/// consecutive messages of the same role are merged into one.
pub fn provider_messages(log: &[ConversationMessage]) -> Vec<Message> {
    let converted = log.iter().map(|message| {
        let role = match message {
            ConversationMessage::Human { .. } => MessageRole::User,
            _ => MessageRole::Assistant,
        };
        Message::new(role, message.transcript_text())
    });
    merge_message_runs(converted)
}

/// Joins runs of same-role messages with a blank line.
pub fn merge_message_runs(messages: impl IntoIterator<Item = Message>) -> Vec<Message> {
    let mut merged: Vec<Message> = Vec::new();
    for message in messages {
        if message.content.trim().is_empty() {
            continue;
        }
        match merged.last_mut() {
            Some(last) if last.role == message.role => {
                last.content.push_str("\n\n");
                last.content.push_str(&message.content);
            }
            _ => merged.push(message),
        }
    }
    merged
}
