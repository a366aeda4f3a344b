//! Application layer - Services coordinating the domain and the ports.

pub mod interview;

pub use interview::{
    ExtractionMergeEngine, InterviewError, InterviewOrchestrator, TurnLimits, TurnOutcome,
    WriteMode, CLOSING_MESSAGE,
};
