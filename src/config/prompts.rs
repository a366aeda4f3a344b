//! Prompt template overrides

use serde::Deserialize;

use crate::domain::conversation::PromptTemplates;

use super::error::ValidationError;

/// Replacement prompt texts; unset entries keep the built-in wording.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptsConfig {
    pub case_manager: Option<String>,
    pub extraction_instruction: Option<String>,
    pub disclaimer: Option<String>,
}

impl PromptsConfig {
    /// Built-in templates with the configured overrides applied.
    pub fn templates(&self) -> PromptTemplates {
        let defaults = PromptTemplates::default();
        PromptTemplates {
            case_manager: self.case_manager.clone().unwrap_or(defaults.case_manager),
            extraction_instruction: self
                .extraction_instruction
                .clone()
                .unwrap_or(defaults.extraction_instruction),
            disclaimer: self.disclaimer.clone().unwrap_or(defaults.disclaimer),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let overrides = [
            ("prompts.case_manager", &self.case_manager),
            ("prompts.extraction_instruction", &self.extraction_instruction),
            ("prompts.disclaimer", &self.disclaimer),
        ];
        for (name, value) in overrides {
            if value.as_ref().is_some_and(|v| v.trim().is_empty()) {
                return Err(ValidationError::EmptyTemplate(name));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_kept_without_overrides() {
        assert_eq!(PromptsConfig::default().templates(), PromptTemplates::default());
    }

    #[test]
    fn override_replaces_one_template() {
        let config = PromptsConfig {
            disclaimer: Some("Custom notice".to_string()),
            ..Default::default()
        };
        let templates = config.templates();
        assert_eq!(templates.disclaimer, "Custom notice");
        assert_eq!(templates.case_manager, PromptTemplates::default().case_manager);
    }

    #[test]
    fn blank_override_is_rejected() {
        let config = PromptsConfig {
            case_manager: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::EmptyTemplate("prompts.case_manager"))
        ));
    }
}
