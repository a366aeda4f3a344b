//! File-based Record Store Adapter
//!
//! Stores each document as a YAML file on disk:
//! `<base>/<namespace kind>/<user id>/<document id>.yaml`.
//! Organized by namespace for easy navigation and debugging.

use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

use crate::domain::extraction::{Document, Namespace};
use crate::domain::foundation::DocumentId;
use crate::domain::record::EntityKind;
use crate::ports::{RecordStore, RecordStoreError};

const EXTENSION: &str = "yaml";

/// File-based document store
#[derive(Debug, Clone)]
pub struct FileRecordStore {
    base_path: PathBuf,
    batch: Arc<Mutex<Option<Vec<(Namespace, Document)>>>>,
}

impl FileRecordStore {
    /// Create a new file store rooted at `base_path`
    ///
    /// # Example
    /// ```ignore
    /// let store = FileRecordStore::new("./data/records");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            batch: Arc::new(Mutex::new(None)),
        }
    }

    fn namespace_dir(&self, namespace: &Namespace) -> Result<PathBuf, RecordStoreError> {
        let user = namespace.user_id.as_str();
        if !is_safe_segment(user) {
            return Err(RecordStoreError::unavailable(format!(
                "user id {:?} cannot be used as a directory name",
                user
            )));
        }
        Ok(self.base_path.join(namespace.kind.as_str()).join(user))
    }

    fn document_path(&self, namespace: &Namespace, id: &DocumentId) -> Result<PathBuf, RecordStoreError> {
        if !is_safe_segment(id.as_str()) {
            return Err(RecordStoreError::SerializationFailed {
                id: id.clone(),
                reason: "document id cannot be used as a file name".to_string(),
            });
        }
        Ok(self
            .namespace_dir(namespace)?
            .join(format!("{}.{}", id.as_str(), EXTENSION)))
    }

    async fn write_document(&self, namespace: &Namespace, document: &Document) -> Result<(), RecordStoreError> {
        let path = self.document_path(namespace, &document.id)?;
        let dir = self.namespace_dir(namespace)?;
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| RecordStoreError::unavailable(e.to_string()))?;

        let yaml = serde_yaml::to_string(document).map_err(|e| {
            RecordStoreError::SerializationFailed {
                id: document.id.clone(),
                reason: e.to_string(),
            }
        })?;

        // Rename over the target so readers never see a half-written file.
        let tmp = path.with_extension(format!("{}.tmp", EXTENSION));
        fs::write(&tmp, yaml)
            .await
            .map_err(|e| RecordStoreError::unavailable(e.to_string()))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| RecordStoreError::unavailable(e.to_string()))?;

        tracing::debug!(namespace = %namespace, document_id = %document.id, "Document written");
        Ok(())
    }
}

fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\', '\0'])
}

#[async_trait]
impl RecordStore for FileRecordStore {
    async fn get(&self, namespace: &Namespace) -> Result<Vec<Document>, RecordStoreError> {
        let dir = self.namespace_dir(namespace)?;
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = fs::read_dir(&dir)
            .await
            .map_err(|e| RecordStoreError::unavailable(e.to_string()))?;

        let mut documents = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| RecordStoreError::unavailable(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let yaml = fs::read_to_string(&path)
                .await
                .map_err(|e| RecordStoreError::unavailable(e.to_string()))?;
            let document: Document = serde_yaml::from_str(&yaml).map_err(|e| {
                RecordStoreError::DeserializationFailed(format!("{}: {}", path.display(), e))
            })?;
            documents.push(document);
        }

        documents.sort_by(|a, b| a.updated_at.cmp(&b.updated_at).then_with(|| a.id.cmp(&b.id)));
        Ok(documents)
    }

    async fn set(&self, namespace: &Namespace, document: Document) -> Result<(), RecordStoreError> {
        self.write_document(namespace, &document).await
    }

    async fn delete(&self, namespace: &Namespace) -> Result<(), RecordStoreError> {
        let dir = self.namespace_dir(namespace)?;
        if dir.exists() {
            fs::remove_dir_all(&dir)
                .await
                .map_err(|e| RecordStoreError::unavailable(e.to_string()))?;
        }
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

        let mut failed = Vec::new();
        let mut reason = String::new();
        for (namespace, document) in &pending {
            if let Err(e) = self.write_document(namespace, document).await {
                tracing::warn!(namespace = %namespace, document_id = %document.id, error = %e, "Batched write failed");
                let key = (namespace.clone(), document.id.clone());
                if !failed.contains(&key) {
                    failed.push(key);
                }
                if reason.is_empty() {
                    reason = e.to_string();
                }
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(RecordStoreError::CommitFailed { failed, reason })
        }
    }
}
