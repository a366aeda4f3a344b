//! Interview error type.

use thiserror::Error;

use crate::domain::conversation::RouterError;
use crate::domain::extraction::MergeReport;
use crate::domain::foundation::TransitionError;
use crate::ports::{ExtractorError, QuestionGeneratorError, RecordStoreError};

/// Everything that can go wrong while running an interview turn.
#[derive(Debug, Clone, Error)]
pub enum InterviewError {
    /// A required setting is absent.
    #[error("Configuration missing: {0}")]
    ConfigurationMissing(String),

    /// The store refused reads or writes. Carries the per-document
    /// outcome of the writes attempted so far (empty for read failures).
    #[error("Record store unavailable: {message}")]
    StoreUnavailable { message: String, report: MergeReport },

    /// A batched write ran without an open batch.
    #[error("No batch operation in progress")]
    NoActiveBatch,

    /// The extraction capability failed or answered with unusable output.
    /// Nothing was written.
    #[error("Extraction failed: {0}")]
    ExtractionCapabilityFailure(String),

    /// The question generation capability failed.
    #[error("Question generation failed: {0}")]
    QuestionCapabilityFailure(String),

    #[error("Unrecognized route: {0}")]
    UnrecognizedRoute(String),

    #[error("Turn exceeded {max_steps} steps without reaching a turn boundary")]
    TurnLimitExceeded { max_steps: usize },

    #[error("The interview has ended")]
    SessionTerminated,

    #[error("Invalid state transition: {0}")]
    InvalidTransition(#[from] TransitionError),
}

impl InterviewError {
    /// Store failure without any write report.
    pub fn store(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
            report: MergeReport::default(),
        }
    }

    /// Returns true if re-running the turn may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::StoreUnavailable { .. }
                | Self::ExtractionCapabilityFailure(_)
                | Self::QuestionCapabilityFailure(_)
        )
    }

    /// Write report of a store failure, if any.
    pub fn report(&self) -> Option<&MergeReport> {
        match self {
            Self::StoreUnavailable { report, .. } => Some(report),
            _ => None,
        }
    }
}

impl From<RecordStoreError> for InterviewError {
    fn from(err: RecordStoreError) -> Self {
        match err {
            RecordStoreError::NoActiveBatch => Self::NoActiveBatch,
            other => Self::store(other.to_string()),
        }
    }
}

impl From<ExtractorError> for InterviewError {
    fn from(err: ExtractorError) -> Self {
        Self::ExtractionCapabilityFailure(err.to_string())
    }
}

impl From<QuestionGeneratorError> for InterviewError {
    fn from(err: QuestionGeneratorError) -> Self {
        Self::QuestionCapabilityFailure(err.to_string())
    }
}

impl From<RouterError> for InterviewError {
    fn from(err: RouterError) -> Self {
        match err {
            RouterError::UnrecognizedRoute(reason) => Self::UnrecognizedRoute(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_and_capability_failures_are_retryable() {
        assert!(InterviewError::store("timeout").is_retryable());
        assert!(InterviewError::ExtractionCapabilityFailure("boom".into()).is_retryable());
        assert!(InterviewError::QuestionCapabilityFailure("boom".into()).is_retryable());
    }

    #[test]
    fn routing_and_session_errors_are_not_retryable() {
        assert!(!InterviewError::UnrecognizedRoute("empty".into()).is_retryable());
        assert!(!InterviewError::SessionTerminated.is_retryable());
        assert!(!InterviewError::TurnLimitExceeded { max_steps: 8 }.is_retryable());
        assert!(!InterviewError::NoActiveBatch.is_retryable());
        assert!(!InterviewError::ConfigurationMissing("session.user_id".into()).is_retryable());
    }

    #[test]
    fn no_active_batch_keeps_its_identity() {
        let err: InterviewError = RecordStoreError::NoActiveBatch.into();
        assert!(matches!(err, InterviewError::NoActiveBatch));
        assert_eq!(err.to_string(), "No batch operation in progress");
    }

    #[test]
    fn other_store_errors_become_store_unavailable() {
        let err: InterviewError = RecordStoreError::unavailable("disk full").into();
        assert!(err.report().is_some_and(|r| r.is_empty()));
    }
}
