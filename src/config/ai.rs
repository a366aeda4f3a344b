//! AI provider configuration

use secrecy::Secret;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::adapters::ai::{OpenAIConfig, OpenAIProvider};
use crate::ports::{AIError, AIProvider};

use super::error::ValidationError;

/// AI provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Model as `provider/model-name`, e.g. `openai/gpt-4o`
    #[serde(default = "default_model")]
    pub model: String,

    /// OpenAI API key
    pub openai_api_key: Option<String>,

    /// Overrides the provider's API base URL
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on failure
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    /// Sampling temperature for question generation
    pub temperature: Option<f32>,
}

/// AI provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProvider {
    OpenAI,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if OpenAI is configured
    pub fn has_openai(&self) -> bool {
        self.openai_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Splits `model` into provider and model name.
    pub fn provider_and_model(&self) -> Result<(AiProvider, &str), ValidationError> {
        let (provider, name) = self
            .model
            .split_once('/')
            .filter(|(p, n)| !p.trim().is_empty() && !n.trim().is_empty())
            .ok_or_else(|| ValidationError::InvalidModel(self.model.clone()))?;

        match provider.trim().to_lowercase().as_str() {
            "openai" => Ok((AiProvider::OpenAI, name.trim())),
            other => Err(ValidationError::UnsupportedProvider(other.to_string())),
        }
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let (provider, _) = self.provider_and_model()?;

        match provider {
            AiProvider::OpenAI if !self.has_openai() => {
                return Err(ValidationError::MissingRequired("ai.openai_api_key"));
            }
            _ => {}
        }

        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(ValidationError::InvalidTemperature);
            }
        }

        Ok(())
    }

    /// Builds the configured provider.
    pub fn build_provider(&self) -> Result<Arc<dyn AIProvider>, AIError> {
        let (provider, model) = self
            .provider_and_model()
            .map_err(|e| AIError::InvalidRequest(e.to_string()))?;

        match provider {
            AiProvider::OpenAI => {
                let key = self
                    .openai_api_key
                    .clone()
                    .ok_or(AIError::AuthenticationFailed)?;
                let mut config = OpenAIConfig::from_secret(Secret::new(key))
                    .with_model(model)
                    .with_timeout(self.timeout())
                    .with_max_retries(self.max_retries);
                if let Some(url) = &self.base_url {
                    config = config.with_base_url(url.clone());
                }
                Ok(Arc::new(OpenAIProvider::new(config)?))
            }
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            openai_api_key: None,
            base_url: None,
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            temperature: None,
        }
    }
}

fn default_model() -> String {
    "openai/gpt-4".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_retries() -> u32 {
    3
}
