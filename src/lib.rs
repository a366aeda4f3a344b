//! Case Intake - Conversational intake interviews for legal cases
//!
//! This crate runs a multi-turn interview that routes each message through a
//! small state machine, extracts structured case and profile facts with an
//! LLM, and merges them into a namespaced document store.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
