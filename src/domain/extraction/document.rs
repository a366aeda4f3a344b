//! Stored documents and the namespaces that scope them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

use crate::domain::foundation::{DocumentId, Timestamp, UserId};
use crate::domain::record::{
    completion, fold_payloads, missing_fields, EntityKind, FieldPath, NamespaceKind, Progress,
    SchemaEntity,
};

/// `(kind, user)` pair scoping a set of documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Namespace {
    pub kind: NamespaceKind,
    pub user_id: UserId,
}

impl Namespace {
    pub fn new(kind: NamespaceKind, user_id: UserId) -> Self {
        Self { kind, user_id }
    }

    pub fn case(user_id: UserId) -> Self {
        Self::new(NamespaceKind::Case, user_id)
    }

    pub fn user(user_id: UserId) -> Self {
        Self::new(NamespaceKind::User, user_id)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.user_id)
    }
}

/// A persisted entity value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    /// Entity kind (the tool that produced the payload).
    pub kind: EntityKind,
    pub payload: Value,
    pub updated_at: Timestamp,
}

impl Document {
    pub fn new(id: DocumentId, kind: EntityKind, payload: Value) -> Self {
        Self {
            id,
            kind,
            payload,
            updated_at: Timestamp::now(),
        }
    }

    pub fn with_updated_at(mut self, at: Timestamp) -> Self {
        self.updated_at = at;
        self
    }
}

/// Typed view over every document of one namespace.
///
/// Documents are overlaid oldest first (ties broken by id), so later
/// values win and `null` never erases a stored value.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSnapshot<E> {
    pub record: E,
    pub document_ids: Vec<DocumentId>,
}

impl<E: SchemaEntity> RecordSnapshot<E> {
    pub fn from_documents(documents: &[Document]) -> Result<Self, serde_json::Error> {
        let mut ordered: Vec<&Document> = documents.iter().collect();
        ordered.sort_by(|a, b| a.updated_at.cmp(&b.updated_at).then_with(|| a.id.cmp(&b.id)));

        let record = fold_payloads::<E, _>(ordered.iter().map(|doc| &doc.payload))?;
        Ok(Self {
            record,
            document_ids: ordered.into_iter().map(|doc| doc.id.clone()).collect(),
        })
    }

    /// Snapshot of a namespace with nothing stored yet.
    pub fn fresh(record: E) -> Self {
        Self {
            record,
            document_ids: Vec::new(),
        }
    }

    pub fn missing_fields(&self) -> BTreeSet<FieldPath> {
        missing_fields(&self.record)
    }

    pub fn progress(&self) -> Progress {
        completion(&self.record)
    }
}
