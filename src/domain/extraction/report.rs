//! Outcome of committing one merge plan.

use crate::domain::foundation::DocumentId;

use super::{PlannedWrite, WriteAction};

/// A write that did not reach the store.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteFailure {
    pub write: PlannedWrite,
    pub reason: String,
}

/// Per-document result of a merge.
///
/// Writes are not rolled back, so a report with failures may still list
/// successful updates and inserts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeReport {
    pub updated: Vec<DocumentId>,
    pub inserted: Vec<DocumentId>,
    pub failures: Vec<WriteFailure>,
}

impl MergeReport {
    pub fn record_success(&mut self, write: &PlannedWrite) {
        let ids = match write.action {
            WriteAction::Update => &mut self.updated,
            WriteAction::Insert => &mut self.inserted,
        };
        if !ids.contains(&write.document.id) {
            ids.push(write.document.id.clone());
        }
    }

    pub fn record_failure(&mut self, write: PlannedWrite, reason: impl Into<String>) {
        self.failures.push(WriteFailure {
            write,
            reason: reason.into(),
        });
    }

    /// True when at least one write failed.
    pub fn is_partial_failure(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Number of distinct documents written.
    pub fn written(&self) -> usize {
        self.updated.len() + self.inserted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.written() == 0 && self.failures.is_empty()
    }

    /// Folds a retry of this report's failures back in.
    ///
    /// Successes are added; the retry's failures replace the old ones.
    pub fn absorb_retry(&mut self, retry: MergeReport) {
        for id in retry.updated {
            if !self.updated.contains(&id) {
                self.updated.push(id);
            }
        }
        for id in retry.inserted {
            if !self.inserted.contains(&id) {
                self.inserted.push(id);
            }
        }
        self.failures = retry.failures;
    }

    /// Ids of the documents whose writes failed.
    pub fn failed_ids(&self) -> Vec<&DocumentId> {
        self.failures.iter().map(|f| &f.write.document.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::extraction::{Document, Namespace};
    use crate::domain::foundation::UserId;
    use crate::domain::record::EntityKind;
    use serde_json::json;

    fn write(id: &str, action: WriteAction) -> PlannedWrite {
        PlannedWrite {
            namespace: Namespace::case(UserId::new("u").unwrap()),
            document: Document::new(DocumentId::new(id).unwrap(), EntityKind::Case, json!({})),
            action,
        }
    }

    #[test]
    fn repeated_update_of_same_document_is_listed_once() {
        let mut report = MergeReport::default();
        report.record_success(&write("a", WriteAction::Update));
        report.record_success(&write("a", WriteAction::Update));
        assert_eq!(report.updated.len(), 1);
        assert_eq!(report.written(), 1);
    }

    #[test]
    fn failure_marks_report_partial() {
        let mut report = MergeReport::default();
        report.record_success(&write("a", WriteAction::Insert));
        report.record_failure(write("b", WriteAction::Insert), "store down");

        assert!(report.is_partial_failure());
        assert_eq!(report.failed_ids(), vec![&DocumentId::new("b").unwrap()]);
    }

    #[test]
    fn absorbing_clean_retry_clears_failures() {
        let mut report = MergeReport::default();
        report.record_failure(write("b", WriteAction::Insert), "store down");

        let mut retry = MergeReport::default();
        retry.record_success(&write("b", WriteAction::Insert));
        report.absorb_retry(retry);

        assert!(!report.is_partial_failure());
        assert_eq!(report.inserted, vec![DocumentId::new("b").unwrap()]);
    }

    #[test]
    fn default_report_is_empty() {
        assert!(MergeReport::default().is_empty());
    }
}
