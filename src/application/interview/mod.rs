//! Interview application services.
//!
//! - `engine` - Extraction/merge engine committing proposals to the store
//! - `orchestrator` - Turn loop over router, engine and question generator
//! - `errors` - `InterviewError`

mod engine;
mod errors;
mod orchestrator;

pub use engine::{ExtractionMergeEngine, WriteMode};
pub use errors::InterviewError;
pub use orchestrator::{InterviewOrchestrator, TurnLimits, TurnOutcome, CLOSING_MESSAGE};
