//! Configuration error types

use thiserror::Error;

use crate::application::InterviewError;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid model '{0}': expected provider/model-name")]
    InvalidModel(String),

    #[error("Unsupported AI provider: {0}")]
    UnsupportedProvider(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Temperature must be between 0 and 2")]
    InvalidTemperature,

    #[error("Prompt template {0} is empty")]
    EmptyTemplate(&'static str),

    #[error("At least one termination token is required")]
    NoTerminationTokens,

    #[error("max_steps_per_turn must be at least 1")]
    InvalidStepLimit,

    #[error("Invalid log filter: {0}")]
    InvalidLogFilter(String),
}

impl From<ConfigError> for InterviewError {
    fn from(err: ConfigError) -> Self {
        InterviewError::ConfigurationMissing(err.to_string())
    }
}

impl From<ValidationError> for InterviewError {
    fn from(err: ValidationError) -> Self {
        InterviewError::ConfigurationMissing(err.to_string())
    }
}
