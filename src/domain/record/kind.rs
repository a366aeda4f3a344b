//! Entity kinds the extraction capability can produce.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::{render_schema, CaseRecord, SchemaDescription, SchemaEntity, UserProfile};

static CASE_SCHEMA: Lazy<SchemaDescription> = Lazy::new(render_schema::<CaseRecord>);
static USER_PROFILE_SCHEMA: Lazy<SchemaDescription> = Lazy::new(render_schema::<UserProfile>);

/// Which document set a namespace holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NamespaceKind {
    Case,
    User,
}

impl NamespaceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NamespaceKind::Case => "Case",
            NamespaceKind::User => "User",
        }
    }
}

impl fmt::Display for NamespaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record entity that can be proposed, validated and stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Case,
    UserProfile,
}

impl EntityKind {
    pub const ALL: [EntityKind; 2] = [EntityKind::Case, EntityKind::UserProfile];

    /// Name of the tool bound for this kind.
    pub fn tool_name(&self) -> &'static str {
        match self {
            EntityKind::Case => CaseRecord::NAME,
            EntityKind::UserProfile => UserProfile::NAME,
        }
    }

    pub fn from_tool_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tool_name() == name)
    }

    /// Namespace documents of this kind are stored under.
    pub fn namespace_kind(&self) -> NamespaceKind {
        match self {
            EntityKind::Case => NamespaceKind::Case,
            EntityKind::UserProfile => NamespaceKind::User,
        }
    }

    /// Rendered schema, computed once per kind.
    pub fn schema(&self) -> &'static SchemaDescription {
        match self {
            EntityKind::Case => &CASE_SCHEMA,
            EntityKind::UserProfile => &USER_PROFILE_SCHEMA,
        }
    }

    /// Checks that `payload` is an object that reads as this entity.
    ///
    /// Partial objects are accepted; absent keys stay unset.
    pub fn validate_payload(&self, payload: &Value) -> Result<(), PayloadError> {
        if !payload.is_object() {
            return Err(PayloadError::NotAnObject {
                kind: *self,
                found: json_type_name(payload),
            });
        }
        let result = match self {
            EntityKind::Case => serde_json::from_value::<CaseRecord>(payload.clone()).map(drop),
            EntityKind::UserProfile => {
                serde_json::from_value::<UserProfile>(payload.clone()).map(drop)
            }
        };
        result.map_err(|e| PayloadError::Malformed {
            kind: *self,
            reason: e.to_string(),
        })
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tool_name())
    }
}

/// Reasons a proposed payload is rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PayloadError {
    #[error("{kind} payload must be a JSON object, got {found}")]
    NotAnObject { kind: EntityKind, found: &'static str },

    #[error("{kind} payload does not match its schema: {reason}")]
    Malformed { kind: EntityKind, reason: String },
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
