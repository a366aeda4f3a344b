//! Extraction/merge engine.
//!
//! Runs one extraction pass over a conversation window and commits the
//! resulting proposals to the record store, per document, without
//! rollback.

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::domain::conversation::ConversationMessage;
use crate::domain::extraction::{
    Document, ExistingIds, MergePlan, MergeReport, Namespace, PlannedWrite,
};
use crate::domain::foundation::{DocumentId, Timestamp, UserId};
use crate::domain::record::{EntityKind, NamespaceKind};
use crate::ports::{ExtractionRequest, Extractor, RecordStore, RecordStoreError};

use super::InterviewError;

/// How planned writes reach the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// One `set` per document, distinct documents concurrently.
    #[default]
    Independent,
    /// Every write queued with `put` and applied by one `commit_batch`.
    Batched,
}

pub struct ExtractionMergeEngine {
    store: Arc<dyn RecordStore>,
    extractor: Arc<dyn Extractor>,
    write_mode: WriteMode,
}

impl ExtractionMergeEngine {
    pub fn new(store: Arc<dyn RecordStore>, extractor: Arc<dyn Extractor>) -> Self {
        Self {
            store,
            extractor,
            write_mode: WriteMode::Independent,
        }
    }

    pub fn with_write_mode(mut self, mode: WriteMode) -> Self {
        self.write_mode = mode;
        self
    }

    pub fn write_mode(&self) -> WriteMode {
        self.write_mode
    }

    /// Extracts facts for `targets` from `window` and writes them.
    ///
    /// Returns `Ok` once every write has settled, even when some failed;
    /// inspect [`MergeReport::is_partial_failure`]. Capability failures
    /// and invalid proposals return an error before anything is written.
    pub async fn run(
        &self,
        user_id: &UserId,
        window: &[ConversationMessage],
        targets: &[EntityKind],
        instruction: &str,
    ) -> Result<MergeReport, InterviewError> {
        let existing = self.load_existing(user_id, targets).await?;
        let existing_ids = existing_ids(&existing);

        let request = ExtractionRequest::new(window.to_vec(), targets.to_vec())
            .with_existing(existing.into_values().flatten().collect())
            .with_instruction(instruction);

        let proposals = self.extractor.extract(request).await.map_err(|e| {
            tracing::warn!(user_id = %user_id, error = %e, "Extraction call failed");
            InterviewError::from(e)
        })?;

        for proposal in &proposals {
            if !targets.contains(&proposal.kind) {
                return Err(InterviewError::ExtractionCapabilityFailure(format!(
                    "proposal for {} was not requested",
                    proposal.kind
                )));
            }
            proposal
                .validate()
                .map_err(|e| InterviewError::ExtractionCapabilityFailure(e.to_string()))?;
        }

        let plan = MergePlan::build(proposals, user_id, &existing_ids, Timestamp::now());
        if plan.is_empty() {
            tracing::debug!(user_id = %user_id, "Extraction found nothing new");
            return Ok(MergeReport::default());
        }

        let report = self.execute(plan).await?;
        tracing::info!(
            user_id = %user_id,
            updated = report.updated.len(),
            inserted = report.inserted.len(),
            failed = report.failures.len(),
            "Merged extracted facts"
        );
        Ok(report)
    }

    /// Re-attempts only the failed writes of `report`.
    pub async fn retry_failed(&self, report: &MergeReport) -> Result<MergeReport, InterviewError> {
        let writes: Vec<PlannedWrite> = report.failures.iter().map(|f| f.write.clone()).collect();
        if writes.is_empty() {
            return Ok(MergeReport::default());
        }
        tracing::debug!(writes = writes.len(), "Retrying failed writes");
        self.execute(MergePlan { writes }).await
    }

    async fn load_existing(
        &self,
        user_id: &UserId,
        targets: &[EntityKind],
    ) -> Result<BTreeMap<NamespaceKind, Vec<Document>>, InterviewError> {
        let kinds: BTreeSet<NamespaceKind> = targets.iter().map(|k| k.namespace_kind()).collect();
        let mut existing = BTreeMap::new();
        for kind in kinds {
            let namespace = Namespace::new(kind, user_id.clone());
            let documents = self.store.get(&namespace).await.map_err(|e| {
                tracing::warn!(namespace = %namespace, error = %e, "Failed to load documents");
                InterviewError::from(e)
            })?;
            existing.insert(kind, documents);
        }
        Ok(existing)
    }

    async fn execute(&self, plan: MergePlan) -> Result<MergeReport, InterviewError> {
        match self.write_mode {
            WriteMode::Independent => Ok(self.execute_independent(plan).await),
            WriteMode::Batched => self.execute_batched(plan).await,
        }
    }

    async fn execute_independent(&self, plan: MergePlan) -> MergeReport {
        let groups = plan.into_groups();
        let outcomes = join_all(groups.into_iter().map(|group| self.apply_group(group))).await;

        let mut report = MergeReport::default();
        for (write, result) in outcomes.into_iter().flatten() {
            match result {
                Ok(()) => report.record_success(&write),
                Err(e) => {
                    tracing::warn!(
                        namespace = %write.namespace,
                        document_id = %write.document.id,
                        error = %e,
                        "Document write failed"
                    );
                    report.record_failure(write, e.to_string());
                }
            }
        }
        report
    }

    /// Writes to one document, in arrival order.
    ///
    /// Stops at the first failure: the remaining writes are reported failed
    /// without being attempted, so a retry replays the whole tail in order
    /// and the last write still wins.
    async fn apply_group(
        &self,
        group: Vec<PlannedWrite>,
    ) -> Vec<(PlannedWrite, Result<(), RecordStoreError>)> {
        let mut outcomes = Vec::with_capacity(group.len());
        let mut blocked: Option<RecordStoreError> = None;
        for write in group {
            let result = match &blocked {
                Some(e) => Err(superseded(e)),
                None => self.store.set(&write.namespace, write.document.clone()).await,
            };
            if let Err(e) = &result {
                blocked.get_or_insert_with(|| e.clone());
            }
            outcomes.push((write, result));
        }
        outcomes
    }

    async fn execute_batched(&self, plan: MergePlan) -> Result<MergeReport, InterviewError> {
        let mut report = MergeReport::default();

        if let Err(e) = self.store.begin_batch().await {
            tracing::warn!(error = %e, "Could not open write batch");
            for write in plan.writes {
                report.record_failure(write, e.to_string());
            }
            return Ok(report);
        }

        let mut queued = Vec::with_capacity(plan.writes.len());
        // Documents with a refused put; later writes to them are held back.
        let mut blocked: BTreeMap<(Namespace, DocumentId), RecordStoreError> = BTreeMap::new();
        for write in plan.writes {
            let key = (write.namespace.clone(), write.document.id.clone());
            if let Some(e) = blocked.get(&key) {
                let reason = superseded(e).to_string();
                report.record_failure(write, reason);
                continue;
            }
            let result = self
                .store
                .put(
                    &write.namespace,
                    write.document.id.clone(),
                    write.document.kind,
                    write.document.payload.clone(),
                )
                .await;
            match result {
                Ok(()) => queued.push(write),
                Err(RecordStoreError::NoActiveBatch) => return Err(InterviewError::NoActiveBatch),
                Err(e) => {
                    report.record_failure(write, e.to_string());
                    blocked.insert(key, e);
                }
            }
        }

        match self.store.commit_batch().await {
            Ok(()) => {
                for write in &queued {
                    report.record_success(write);
                }
            }
            Err(RecordStoreError::NoActiveBatch) => return Err(InterviewError::NoActiveBatch),
            Err(RecordStoreError::CommitFailed { failed, reason }) => {
                tracing::warn!(failed = failed.len(), error = %reason, "Batch commit partly failed");
                for write in queued {
                    let key = (write.namespace.clone(), write.document.id.clone());
                    if failed.contains(&key) {
                        report.record_failure(write, reason.clone());
                    } else {
                        report.record_success(&write);
                    }
                }
            }
            Err(e) => {
                tracing::warn!(writes = queued.len(), error = %e, "Batch commit failed");
                for write in queued {
                    report.record_failure(write, e.to_string());
                }
            }
        }
        Ok(report)
    }
}

/// Failure recorded for a write held back behind an earlier failed one.
fn superseded(cause: &RecordStoreError) -> RecordStoreError {
    RecordStoreError::unavailable(format!("earlier write to this document failed: {}", cause))
}

fn existing_ids(existing: &BTreeMap<NamespaceKind, Vec<Document>>) -> ExistingIds {
    existing
        .iter()
        .map(|(kind, documents)| (*kind, documents.iter().map(|d| d.id.clone()).collect()))
        .collect()
}
