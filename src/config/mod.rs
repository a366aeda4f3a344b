//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `CASE_INTAKE` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use case_intake::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! let orchestrator = config.build_orchestrator().expect("Failed to wire interview");
//! ```

mod ai;
mod error;
mod interview;
mod logging;
mod prompts;
mod session;
mod storage;

pub use ai::{AiConfig, AiProvider};
pub use error::{ConfigError, ValidationError};
pub use interview::InterviewConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use prompts::PromptsConfig;
pub use session::SessionConfig;
pub use storage::{StorageBackend, StorageConfig};

use serde::Deserialize;
use std::sync::Arc;

use crate::adapters::ai::{LlmExtractor, LlmQuestionGenerator};
use crate::application::{ExtractionMergeEngine, InterviewError, InterviewOrchestrator};
use crate::domain::conversation::SessionState;
use crate::ports::{AIProvider, RecordStore};

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Whose interview is run
    #[serde(default)]
    pub session: SessionConfig,

    /// AI provider configuration
    #[serde(default)]
    pub ai: AiConfig,

    /// Prompt template overrides
    #[serde(default)]
    pub prompts: PromptsConfig,

    /// Record store selection
    #[serde(default)]
    pub storage: StorageConfig,

    /// Interview loop settings
    #[serde(default)]
    pub interview: InterviewConfig,

    /// Log filter and format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CASE_INTAKE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `CASE_INTAKE__SESSION__USER_ID=client-42` -> `session.user_id = "client-42"`
    /// - `CASE_INTAKE__INTERVIEW__TERMINATION_TOKENS=quit,stop` -> list of two tokens
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CASE_INTAKE")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("interview.termination_tokens")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.session.validate()?;
        self.ai.validate()?;
        self.prompts.validate()?;
        self.storage.validate()?;
        self.interview.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// A fresh session for the configured user.
    pub fn new_session(&self) -> Result<SessionState, InterviewError> {
        Ok(SessionState::new(self.session.user_id()?))
    }

    /// Wires an orchestrator from the configured provider and store.
    pub fn build_orchestrator(&self) -> Result<InterviewOrchestrator, InterviewError> {
        let provider = self
            .ai
            .build_provider()
            .map_err(|e| InterviewError::ConfigurationMissing(e.to_string()))?;
        self.wire_orchestrator(provider, self.storage.build_store())
    }

    /// Wires an orchestrator around the given provider and store.
    pub fn wire_orchestrator(
        &self,
        provider: Arc<dyn AIProvider>,
        store: Arc<dyn RecordStore>,
    ) -> Result<InterviewOrchestrator, InterviewError> {
        let user_id = self.session.user_id()?;
        let templates = self.prompts.templates();

        let extractor = LlmExtractor::new(provider.clone(), user_id.clone());
        let questions = LlmQuestionGenerator::new(provider, user_id, templates.clone())
            .with_temperature(self.ai.temperature);

        let engine = ExtractionMergeEngine::new(store.clone(), Arc::new(extractor))
            .with_write_mode(self.storage.write_mode);

        Ok(InterviewOrchestrator::new(store, engine, Arc::new(questions))
            .with_router(self.interview.router())
            .with_templates(templates)
            .with_limits(self.interview.limits()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::adapters::storage::InMemoryRecordStore;
    use crate::application::WriteMode;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 6] = [
        "CASE_INTAKE__SESSION__USER_ID",
        "CASE_INTAKE__AI__OPENAI_API_KEY",
        "CASE_INTAKE__AI__MODEL",
        "CASE_INTAKE__STORAGE__WRITE_MODE",
        "CASE_INTAKE__INTERVIEW__MAX_STEPS_PER_TURN",
        "CASE_INTAKE__INTERVIEW__TERMINATION_TOKENS",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("CASE_INTAKE__SESSION__USER_ID", "client-42");
        env::set_var("CASE_INTAKE__AI__OPENAI_API_KEY", "sk-xxx");
        env::set_var("CASE_INTAKE__AI__MODEL", "openai/gpt-4o");
        env::set_var("CASE_INTAKE__STORAGE__WRITE_MODE", "batched");
        env::set_var("CASE_INTAKE__INTERVIEW__MAX_STEPS_PER_TURN", "20");
        env::set_var("CASE_INTAKE__INTERVIEW__TERMINATION_TOKENS", "quit,stop");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.session.user_id.as_deref(), Some("client-42"));
        assert_eq!(config.ai.model, "openai/gpt-4o");
        assert_eq!(config.storage.write_mode, WriteMode::Batched);
        assert_eq!(config.interview.max_steps_per_turn, 20);
        assert_eq!(config.interview.termination_tokens, vec!["quit", "stop"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_user_id_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("CASE_INTAKE__AI__OPENAI_API_KEY", "sk-xxx");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired("session.user_id"))
        ));
        assert!(matches!(
            config.new_session(),
            Err(InterviewError::ConfigurationMissing(_))
        ));
    }

    #[test]
    fn test_wire_orchestrator_needs_a_user() {
        let config = AppConfig::default();
        let result = config.wire_orchestrator(
            Arc::new(MockAIProvider::new()),
            Arc::new(InMemoryRecordStore::new()),
        );
        assert!(matches!(result, Err(InterviewError::ConfigurationMissing(_))));
    }

    #[test]
    fn test_wire_orchestrator_applies_interview_settings() {
        let config = AppConfig {
            session: SessionConfig {
                user_id: Some("client-42".to_string()),
            },
            interview: InterviewConfig {
                termination_tokens: vec!["stop".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };
        let orchestrator = config
            .wire_orchestrator(
                Arc::new(MockAIProvider::new()),
                Arc::new(InMemoryRecordStore::new()),
            )
            .unwrap();
        assert!(orchestrator.router().is_termination("STOP"));
    }
}
