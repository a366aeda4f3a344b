//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types that form the
//! vocabulary of the intake domain.

mod errors;
mod ids;
mod percentage;
mod state_machine;
mod timestamp;

pub use errors::ValidationError;
pub use ids::{DocumentId, MessageId, UserId};
pub use percentage::Percentage;
pub use state_machine::{StateMachine, TransitionError};
pub use timestamp::Timestamp;
