//! Schema registry.
//!
//! Renders the declared record shape as a stable description for prompting,
//! and answers completeness questions about record snapshots. Everything here
//! is a pure function of the compile-time entity declarations.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::domain::foundation::Percentage;

use super::field::SemanticType;

/// Dotted path to a leaf field, e.g. `personal_info.first_name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(String);

impl FieldPath {
    /// The empty path of a top-level entity.
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Extends the path by one segment.
    pub fn child(&self, name: &str) -> Self {
        if self.0.is_empty() {
            Self(name.to_string())
        } else {
            Self(format!("{}.{}", self.0, name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}

/// Description of one leaf field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSchema {
    #[serde(rename = "type")]
    pub semantic_type: SemanticType,
    pub description: String,
    pub examples: Vec<Value>,
}

/// Either a leaf field or a nested entity inlined as a section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SchemaNode {
    Field(FieldSchema),
    Section(EntitySchema),
}

/// Description of an entity: its purpose and its properties by name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySchema {
    pub description: String,
    pub properties: BTreeMap<String, SchemaNode>,
}

impl EntitySchema {
    fn collect_paths(&self, prefix: &FieldPath, out: &mut BTreeSet<FieldPath>) {
        for (name, node) in &self.properties {
            let path = prefix.child(name);
            match node {
                SchemaNode::Field(_) => {
                    out.insert(path);
                }
                SchemaNode::Section(section) => section.collect_paths(&path, out),
            }
        }
    }

    fn json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .properties
            .iter()
            .map(|(name, node)| {
                let schema = match node {
                    SchemaNode::Field(field) => field_json_schema(field),
                    SchemaNode::Section(section) => section.json_schema(),
                };
                (name.clone(), schema)
            })
            .collect();

        json!({
            "type": "object",
            "description": self.description,
            "properties": properties,
        })
    }
}

/// Declarative description of a whole record type.
///
/// Carries no titles and no internal type references; nested entities are
/// inlined. Property maps are ordered by name, so the rendering is stable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaDescription {
    #[serde(skip)]
    pub entity: &'static str,
    #[serde(flatten)]
    pub schema: EntitySchema,
}

impl SchemaDescription {
    /// Every declared leaf path.
    pub fn field_paths(&self) -> BTreeSet<FieldPath> {
        let mut out = BTreeSet::new();
        self.schema.collect_paths(&FieldPath::root(), &mut out);
        out
    }

    /// JSON-Schema rendering used for tool parameter declarations.
    ///
    /// Leaves are nullable so the model can leave a field unset.
    pub fn to_json_schema(&self) -> Value {
        self.schema.json_schema()
    }

    /// Pretty JSON of the description, for prompt templates.
    pub fn to_prompt_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

fn field_json_schema(field: &FieldSchema) -> Value {
    let mut schema = match field.semantic_type {
        SemanticType::Text => json!({"type": ["string", "null"]}),
        SemanticType::Integer => json!({"type": ["integer", "null"], "minimum": 0}),
        SemanticType::Number => json!({"type": ["number", "null"]}),
        SemanticType::Boolean => json!({"type": ["boolean", "null"]}),
        SemanticType::Date => json!({"type": ["string", "null"], "format": "date"}),
        SemanticType::DateTime => json!({"type": ["string", "null"], "format": "date-time"}),
        SemanticType::TextList => json!({"type": ["array", "null"], "items": {"type": "string"}}),
        SemanticType::NumberMap => {
            json!({"type": ["object", "null"], "additionalProperties": {"type": "number"}})
        }
    };
    if let Value::Object(map) = &mut schema {
        map.insert("description".into(), Value::String(field.description.clone()));
        if !field.examples.is_empty() {
            map.insert("examples".into(), Value::Array(field.examples.clone()));
        }
    }
    schema
}

/// An entity type known to the registry.
///
/// Implemented by the `schema_entity!` macro; do not implement by hand.
pub trait SchemaEntity: Serialize + DeserializeOwned + Default + Clone + PartialEq {
    /// Name the entity is exposed under (also its tool name).
    const NAME: &'static str;

    /// Describes this entity and every nested entity.
    fn describe() -> EntitySchema;

    /// Adds the path of every unset leaf below `prefix` to `out`.
    fn collect_missing(&self, prefix: &FieldPath, out: &mut BTreeSet<FieldPath>);
}

/// Renders the declarative description of `E`.
pub fn render_schema<E: SchemaEntity>() -> SchemaDescription {
    SchemaDescription {
        entity: E::NAME,
        schema: E::describe(),
    }
}

/// Every leaf path declared by `E`.
pub fn declared_fields<E: SchemaEntity>() -> BTreeSet<FieldPath> {
    render_schema::<E>().field_paths()
}

/// Paths of all fields of `record` still holding the unset sentinel.
pub fn missing_fields<E: SchemaEntity>(record: &E) -> BTreeSet<FieldPath> {
    let mut out = BTreeSet::new();
    record.collect_missing(&FieldPath::root(), &mut out);
    out
}

/// How far a record is from complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub filled: usize,
    pub total: usize,
    pub percent: Percentage,
    pub missing: BTreeSet<FieldPath>,
}

impl Progress {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Short human-readable summary listing at most `limit` missing paths.
    pub fn summary(&self, limit: usize) -> String {
        if self.is_complete() {
            return format!("All {} fields collected.", self.total);
        }
        let listed: Vec<&str> = self.missing.iter().take(limit).map(FieldPath::as_str).collect();
        let more = self.missing.len().saturating_sub(listed.len());
        let mut text = format!(
            "Collected {} of {} fields ({}). Still missing: {}",
            self.filled,
            self.total,
            self.percent,
            listed.join(", ")
        );
        if more > 0 {
            text.push_str(&format!(" and {} more", more));
        }
        text
    }
}

/// Completion of `record` against its declared field set.
pub fn completion<E: SchemaEntity>(record: &E) -> Progress {
    let total = declared_fields::<E>().len();
    let missing = missing_fields(record);
    let filled = total.saturating_sub(missing.len());
    Progress {
        filled,
        total,
        percent: Percentage::from_ratio(filled, total),
        missing,
    }
}

/// Overlays `patch` onto `base`: objects merge key by key, `null` never
/// clears an existing value, anything else replaces.
pub fn overlay(base: &mut Value, patch: &Value) {
    match (base, patch) {
        (_, Value::Null) => {}
        (Value::Object(base_map), Value::Object(patch_map)) => {
            for (key, value) in patch_map {
                match base_map.get_mut(key) {
                    Some(existing) => overlay(existing, value),
                    None => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (slot, value) => *slot = value.clone(),
    }
}

/// Folds several payloads, oldest first, into one typed snapshot.
pub fn fold_payloads<'a, E, I>(payloads: I) -> Result<E, serde_json::Error>
where
    E: SchemaEntity,
    I: IntoIterator<Item = &'a Value>,
{
    let mut merged = serde_json::to_value(E::default())?;
    for payload in payloads {
        overlay(&mut merged, payload);
    }
    serde_json::from_value(merged)
}
