//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine trait)
//! - `record` - The structured case record and its schema registry
//! - `extraction` - Proposals, stored documents and merge planning
//! - `conversation` - Message log, interview state machine and router

pub mod conversation;
pub mod extraction;
pub mod foundation;
pub mod record;
