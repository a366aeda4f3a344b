//! Record Store Port - Interface for the namespaced document store.
//!
//! Documents are grouped by [`Namespace`] and identified by a
//! [`DocumentId`] unique within it. A single `set` is atomic; nothing
//! spans documents except the optional batch, which only defers writes
//! until `commit_batch`.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::extraction::{Document, Namespace};
use crate::domain::foundation::DocumentId;
use crate::domain::record::EntityKind;

/// Errors that can occur during record store operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordStoreError {
    #[error("Record store unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to serialize document {id}: {reason}")]
    SerializationFailed { id: DocumentId, reason: String },

    #[error("Failed to read stored document: {0}")]
    DeserializationFailed(String),

    #[error("No batch operation in progress")]
    NoActiveBatch,

    #[error("A batch operation is already in progress")]
    BatchAlreadyActive,

    /// `commit_batch` attempted every queued write; these did not land.
    #[error("Batch commit failed for {} document(s): {reason}", failed.len())]
    CommitFailed {
        failed: Vec<(Namespace, DocumentId)>,
        reason: String,
    },
}

impl RecordStoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}

/// Port for reading and writing namespaced documents
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All documents of a namespace, empty when none exist.
    async fn get(&self, namespace: &Namespace) -> Result<Vec<Document>, RecordStoreError>;

    /// Inserts or replaces the document with the same id.
    async fn set(&self, namespace: &Namespace, document: Document) -> Result<(), RecordStoreError>;

    /// Removes every document of a namespace.
    async fn delete(&self, namespace: &Namespace) -> Result<(), RecordStoreError>;

    /// Starts collecting `put` calls.
    ///
    /// A store holds one batch at a time, shared by every namespace, so
    /// batched writers must not overlap on the same store instance.
    ///
    /// # Errors
    /// `BatchAlreadyActive` if a batch is open.
    async fn begin_batch(&self) -> Result<(), RecordStoreError>;

    /// Queues a write into the open batch.
    ///
    /// # Errors
    /// `NoActiveBatch` when called outside `begin_batch`/`commit_batch`.
    async fn put(
        &self,
        namespace: &Namespace,
        id: DocumentId,
        kind: EntityKind,
        payload: Value,
    ) -> Result<(), RecordStoreError>;

    /// Applies every queued write and closes the batch.
    ///
    /// Every queued write is attempted even after one fails.
    ///
    /// # Errors
    /// `NoActiveBatch` when no batch is open; `CommitFailed` naming the
    /// documents that were not written.
    async fn commit_batch(&self) -> Result<(), RecordStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_active_batch_message() {
        assert_eq!(
            RecordStoreError::NoActiveBatch.to_string(),
            "No batch operation in progress"
        );
    }

    #[test]
    fn commit_failure_counts_documents() {
        let err = RecordStoreError::CommitFailed {
            failed: vec![(
                Namespace::case(crate::domain::foundation::UserId::new("u").unwrap()),
                DocumentId::new("d1").unwrap(),
            )],
            reason: "disk full".into(),
        };
        assert_eq!(err.to_string(), "Batch commit failed for 1 document(s): disk full");
    }
}
