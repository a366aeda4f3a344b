//! Interview loop configuration

use serde::Deserialize;

use crate::application::TurnLimits;
use crate::domain::conversation::{Router, RouterConfig};

use super::error::ValidationError;

/// Interview loop configuration
#[derive(Debug, Clone, Deserialize)]
pub struct InterviewConfig {
    /// Human messages that end the interview
    #[serde(default = "default_termination_tokens")]
    pub termination_tokens: Vec<String>,

    #[serde(default = "default_max_steps")]
    pub max_steps_per_turn: usize,

    #[serde(default = "default_store_retries")]
    pub store_retry_attempts: u32,
}

impl InterviewConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.termination_tokens.iter().all(|t| t.trim().is_empty()) {
            return Err(ValidationError::NoTerminationTokens);
        }
        if self.max_steps_per_turn == 0 {
            return Err(ValidationError::InvalidStepLimit);
        }
        Ok(())
    }

    pub fn router(&self) -> Router {
        Router::new(RouterConfig {
            termination_tokens: self.termination_tokens.clone(),
        })
    }

    pub fn limits(&self) -> TurnLimits {
        TurnLimits {
            max_steps_per_turn: self.max_steps_per_turn,
            store_retry_attempts: self.store_retry_attempts,
        }
    }
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            termination_tokens: default_termination_tokens(),
            max_steps_per_turn: default_max_steps(),
            store_retry_attempts: default_store_retries(),
        }
    }
}

fn default_termination_tokens() -> Vec<String> {
    RouterConfig::default().termination_tokens
}

fn default_max_steps() -> usize {
    TurnLimits::default().max_steps_per_turn
}

fn default_store_retries() -> u32 {
    TurnLimits::default().store_retry_attempts
}
