//! In-Memory Record Store Adapter
//!
//! Keeps documents in memory, grouped by namespace.
//! Useful for testing and development.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::domain::extraction::{Document, Namespace};
use crate::domain::foundation::DocumentId;
use crate::domain::record::EntityKind;
use crate::ports::{RecordStore, RecordStoreError};

type Pending = Vec<(Namespace, Document)>;

/// In-memory document store
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
    documents: Arc<RwLock<HashMap<Namespace, BTreeMap<DocumentId, Document>>>>,
    batch: Arc<Mutex<Option<Pending>>>,
}

impl InMemoryRecordStore {
    /// Create a new, empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored data (useful for tests)
    pub async fn clear(&self) {
        self.documents.write().await.clear();
        *self.batch.lock().await = None;
    }

    /// Number of documents stored under a namespace
    pub async fn document_count(&self, namespace: &Namespace) -> usize {
        self.documents
            .read()
            .await
            .get(namespace)
            .map_or(0, BTreeMap::len)
    }

    /// Whether a batch is open
    pub async fn batch_active(&self) -> bool {
        self.batch.lock().await.is_some()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn get(&self, namespace: &Namespace) -> Result<Vec<Document>, RecordStoreError> {
        let documents = self.documents.read().await;
        let mut found: Vec<Document> = documents
            .get(namespace)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default();
        found.sort_by(|a, b| a.updated_at.cmp(&b.updated_at).then_with(|| a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn set(&self, namespace: &Namespace, document: Document) -> Result<(), RecordStoreError> {
        let mut documents = self.documents.write().await;
        documents
            .entry(namespace.clone())
            .or_default()
            .insert(document.id.clone(), document);
        Ok(())
    }

    async fn delete(&self, namespace: &Namespace) -> Result<(), RecordStoreError> {
        self.documents.write().await.remove(namespace);
        Ok(())
    }

    async fn begin_batch(&self) -> Result<(), RecordStoreError> {
        let mut batch = self.batch.lock().await;
        if batch.is_some() {
            return Err(RecordStoreError::BatchAlreadyActive);
        }
        *batch = Some(Vec::new());
        Ok(())
    }

    async fn put(
        &self,
        namespace: &Namespace,
        id: DocumentId,
        kind: EntityKind,
        payload: Value,
    ) -> Result<(), RecordStoreError> {
        let mut batch = self.batch.lock().await;
        let pending = batch.as_mut().ok_or(RecordStoreError::NoActiveBatch)?;
        pending.push((namespace.clone(), Document::new(id, kind, payload)));
        Ok(())
    }

    async fn commit_batch(&self) -> Result<(), RecordStoreError> {
        let pending = self
            .batch
            .lock()
            .await
            .take()
            .ok_or(RecordStoreError::NoActiveBatch)?;

        let mut documents = self.documents.write().await;
        for (namespace, document) in pending {
            documents
                .entry(namespace)
                .or_default()
                .insert(document.id.clone(), document);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use serde_json::json;

    fn case_ns() -> Namespace {
        Namespace::case(UserId::new("user-1").unwrap())
    }

    fn doc(id: &str, payload: Value) -> Document {
        Document::new(DocumentId::new(id).unwrap(), EntityKind::Case, payload)
    }

    #[tokio::test]
    async fn empty_namespace_returns_no_documents() {
        let store = InMemoryRecordStore::new();
        assert!(store.get(&case_ns()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn set_with_same_id_replaces_document() {
        let store = InMemoryRecordStore::new();
        store.set(&case_ns(), doc("d1", json!({"v": 1}))).await.unwrap();
        store.set(&case_ns(), doc("d1", json!({"v": 2}))).await.unwrap();

        let docs = store.get(&case_ns()).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].payload, json!({"v": 2}));
    }

    #[tokio::test]
    async fn namespaces_are_isolated() {
        let store = InMemoryRecordStore::new();
        let other = Namespace::user(UserId::new("user-1").unwrap());
        store.set(&case_ns(), doc("d1", json!({}))).await.unwrap();

        assert_eq!(store.document_count(&case_ns()).await, 1);
        assert_eq!(store.document_count(&other).await, 0);
    }

    #[tokio::test]
    async fn delete_removes_whole_namespace() {
        let store = InMemoryRecordStore::new();
        store.set(&case_ns(), doc("d1", json!({}))).await.unwrap();
        store.set(&case_ns(), doc("d2", json!({}))).await.unwrap();
        store.delete(&case_ns()).await.unwrap();
        assert_eq!(store.document_count(&case_ns()).await, 0);
    }

    #[tokio::test]
    async fn put_outside_batch_fails() {
        let store = InMemoryRecordStore::new();
        let err = store
            .put(&case_ns(), DocumentId::generate(), EntityKind::Case, json!({}))
            .await
            .unwrap_err();
        assert_eq!(err, RecordStoreError::NoActiveBatch);
    }

    #[tokio::test]
    async fn batched_writes_land_on_commit() {
        let store = InMemoryRecordStore::new();
        store.begin_batch().await.unwrap();
        store
            .put(&case_ns(), DocumentId::new("d1").unwrap(), EntityKind::Case, json!({}))
            .await
            .unwrap();

        assert_eq!(store.document_count(&case_ns()).await, 0);
        store.commit_batch().await.unwrap();
        assert_eq!(store.document_count(&case_ns()).await, 1);
        assert!(!store.batch_active().await);
    }

    #[tokio::test]
    async fn commit_without_batch_fails() {
        let store = InMemoryRecordStore::new();
        assert_eq!(
            store.commit_batch().await.unwrap_err(),
            RecordStoreError::NoActiveBatch
        );
    }

    #[tokio::test]
    async fn nested_begin_is_rejected() {
        let store = InMemoryRecordStore::new();
        store.begin_batch().await.unwrap();
        assert_eq!(
            store.begin_batch().await.unwrap_err(),
            RecordStoreError::BatchAlreadyActive
        );
    }
}
