//! AI provider configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// AI provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Provider used for both oracle calls
    #[serde(default)]
    pub primary_provider: AiProvider,

    /// Google Gemini API key
    pub gemini_api_key: Option<SecretString>,

    /// OpenAI API key
    pub openai_api_key: Option<SecretString>,

    /// Gemini model name
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// OpenAI model name
    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    /// HTTP client timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Token ceiling for conversational turns
    #[serde(default = "default_conversation_max_tokens")]
    pub conversation_max_tokens: u32,

    /// Token ceiling for generated documents
    #[serde(default = "default_document_max_tokens")]
    pub document_max_tokens: u32,

    /// Sampling temperature; provider default when unset
    pub temperature: Option<f32>,
}

/// AI provider type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    Gemini,
    OpenAI,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn has_gemini(&self) -> bool {
        has_key(&self.gemini_api_key)
    }

    pub fn has_openai(&self) -> bool {
        has_key(&self.openai_api_key)
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.primary_provider {
            AiProvider::Gemini if !self.has_gemini() => {
                return Err(ValidationError::MissingRequired("GEMINI_API_KEY"));
            }
            AiProvider::OpenAI if !self.has_openai() => {
                return Err(ValidationError::MissingRequired("OPENAI_API_KEY"));
            }
            _ => {}
        }

        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.conversation_max_tokens == 0 || self.document_max_tokens == 0 {
            return Err(ValidationError::InvalidTokenLimit);
        }
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(ValidationError::InvalidTemperature);
            }
        }

        Ok(())
    }
}

fn has_key(key: &Option<SecretString>) -> bool {
    key.as_ref().is_some_and(|k| !k.expose_secret().is_empty())
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            primary_provider: AiProvider::default(),
            gemini_api_key: None,
            openai_api_key: None,
            gemini_model: default_gemini_model(),
            openai_model: default_openai_model(),
            timeout_secs: default_timeout(),
            conversation_max_tokens: default_conversation_max_tokens(),
            document_max_tokens: default_document_max_tokens(),
            temperature: None,
        }
    }
}

fn default_gemini_model() -> String {
    "gemini-2.5-pro".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o".to_string()
}

fn default_timeout() -> u64 {
    90
}

fn default_conversation_max_tokens() -> u32 {
    2048
}

fn default_document_max_tokens() -> u32 {
    8192
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> Option<SecretString> {
        Some(SecretString::new(s.to_string()))
    }

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.primary_provider, AiProvider::Gemini);
        assert_eq!(config.gemini_model, "gemini-2.5-pro");
        assert_eq!(config.timeout(), Duration::from_secs(90));
        assert!(config.temperature.is_none());
    }

    #[test]
    fn test_validation_no_key_for_primary() {
        assert!(AiConfig::default().validate().is_err());

        let config = AiConfig {
            openai_api_key: secret("sk-xxx"),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired("GEMINI_API_KEY"))
        ));
    }

    #[test]
    fn test_empty_key_counts_as_missing() {
        let config = AiConfig {
            gemini_api_key: secret(""),
            ..Default::default()
        };
        assert!(!config.has_gemini());
    }

    #[test]
    fn test_validation_valid_openai_config() {
        let config = AiConfig {
            primary_provider: AiProvider::OpenAI,
            openai_api_key: secret("sk-xxx"),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_temperature_range() {
        let config = AiConfig {
            gemini_api_key: secret("key"),
            temperature: Some(3.5),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidTemperature)
        ));
    }

    #[test]
    fn test_debug_output_redacts_keys() {
        let config = AiConfig {
            gemini_api_key: secret("super-secret"),
            ..Default::default()
        };
        assert!(!format!("{:?}", config).contains("super-secret"));
    }
}
