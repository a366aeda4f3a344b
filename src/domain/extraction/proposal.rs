//! Candidate values proposed by the extraction capability.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::DocumentId;
use crate::domain::record::{EntityKind, PayloadError};

/// One proposed entity value.
///
/// `existing_id` is a hint from the capability that the payload revises a
/// stored document. It is untrusted until checked against the namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionProposal {
    pub kind: EntityKind,
    pub payload: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing_id: Option<DocumentId>,
}

impl ExtractionProposal {
    pub fn new(kind: EntityKind, payload: Value) -> Self {
        Self {
            kind,
            payload,
            existing_id: None,
        }
    }

    /// Sets the existing-document hint.
    pub fn with_hint(mut self, id: DocumentId) -> Self {
        self.existing_id = Some(id);
        self
    }

    pub fn validate(&self) -> Result<(), PayloadError> {
        self.kind.validate_payload(&self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hint_is_optional_in_json() {
        let proposal: ExtractionProposal =
            serde_json::from_value(json!({"kind": "Case", "payload": {}})).unwrap();
        assert!(proposal.existing_id.is_none());

        let text = serde_json::to_string(&proposal).unwrap();
        assert!(!text.contains("existing_id"));
    }

    #[test]
    fn validate_delegates_to_kind() {
        let good = ExtractionProposal::new(EntityKind::UserProfile, json!({"full_name": "Jane"}));
        let bad = ExtractionProposal::new(EntityKind::UserProfile, json!("Jane"));
        assert!(good.validate().is_ok());
        assert!(bad.validate().is_err());
    }
}
