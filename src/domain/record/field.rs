//! Field slots with an explicit "not yet provided" sentinel.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// A single record field.
///
/// `Unset` is the sentinel for "not yet provided". A confirmed empty answer
/// (`""`, `[]`, `false`) is a `Value`. Serialized, `Unset` is always written
/// as an explicit `null` rather than omitted.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<T> {
    Unset,
    Value(T),
}

impl<T> FieldValue<T> {
    /// Wraps a provided value.
    pub fn set(value: T) -> Self {
        FieldValue::Value(value)
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, FieldValue::Unset)
    }

    pub fn is_set(&self) -> bool {
        !self.is_unset()
    }

    /// Borrows the provided value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            FieldValue::Unset => None,
            FieldValue::Value(v) => Some(v),
        }
    }

    pub fn into_option(self) -> Option<T> {
        self.into()
    }
}

impl<T> Default for FieldValue<T> {
    fn default() -> Self {
        FieldValue::Unset
    }
}

impl<T> From<Option<T>> for FieldValue<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => FieldValue::Value(v),
            None => FieldValue::Unset,
        }
    }
}

impl<T> From<FieldValue<T>> for Option<T> {
    fn from(value: FieldValue<T>) -> Self {
        match value {
            FieldValue::Unset => None,
            FieldValue::Value(v) => Some(v),
        }
    }
}

impl<T: Serialize> Serialize for FieldValue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Unset => serializer.serialize_none(),
            FieldValue::Value(v) => serializer.serialize_some(v),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for FieldValue<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(FieldValue::from)
    }
}

/// Semantic type of a leaf field, as shown to the language model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    Text,
    Integer,
    Number,
    Boolean,
    Date,
    DateTime,
    TextList,
    NumberMap,
}

/// Rust types allowed as record leaves.
pub trait FieldType {
    fn semantic_type() -> SemanticType;
}

impl FieldType for String {
    fn semantic_type() -> SemanticType {
        SemanticType::Text
    }
}

impl FieldType for u32 {
    fn semantic_type() -> SemanticType {
        SemanticType::Integer
    }
}

impl FieldType for f64 {
    fn semantic_type() -> SemanticType {
        SemanticType::Number
    }
}

impl FieldType for bool {
    fn semantic_type() -> SemanticType {
        SemanticType::Boolean
    }
}

impl FieldType for NaiveDate {
    fn semantic_type() -> SemanticType {
        SemanticType::Date
    }
}

impl FieldType for NaiveDateTime {
    fn semantic_type() -> SemanticType {
        SemanticType::DateTime
    }
}

impl FieldType for Vec<String> {
    fn semantic_type() -> SemanticType {
        SemanticType::TextList
    }
}

impl FieldType for BTreeMap<String, f64> {
    fn semantic_type() -> SemanticType {
        SemanticType::NumberMap
    }
}
