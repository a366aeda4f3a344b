//! Extraction module - Proposals, stored documents and merge planning.

mod document;
mod merge;
mod proposal;
mod report;

pub use document::{Document, Namespace, RecordSnapshot};
pub use merge::{ExistingIds, MergePlan, PlannedWrite, WriteAction};
pub use proposal::ExtractionProposal;
pub use report::{MergeReport, WriteFailure};
