//! AI provider configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Text generation settings
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Anthropic API key; without one the mock generator is used outside production
    pub anthropic_api_key: Option<Secret<String>>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Deadline for one generation call including retries, in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_retries")]
    pub max_retries: u32,

    #[serde(default = "default_retry_base_delay")]
    pub retry_base_delay_ms: u64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    pub fn api_key(&self) -> Option<&str> {
        self.anthropic_api_key
            .as_ref()
            .map(|key| key.expose_secret().as_str())
            .filter(|key| !key.is_empty())
    }

    pub fn has_anthropic(&self) -> bool {
        self.api_key().is_some()
    }

    /// Validate AI configuration
    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        if production && !self.has_anthropic() {
            return Err(ValidationError::NoAiProviderConfigured);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidAiSetting("timeout_secs"));
        }
        if self.max_retries > 10 {
            return Err(ValidationError::InvalidAiSetting("max_retries"));
        }
        if self.max_tokens == 0 {
            return Err(ValidationError::InvalidAiSetting("max_tokens"));
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            anthropic_api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            retry_base_delay_ms: default_retry_base_delay(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_timeout() -> u64 {
    45
}

fn default_retries() -> u32 {
    2
}

fn default_retry_base_delay() -> u64 {
    500
}

fn default_max_tokens() -> u32 {
    2048
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert!(!config.has_anthropic());
        assert_eq!(config.timeout(), Duration::from_secs(45));
        assert_eq!(config.retry_base_delay(), Duration::from_millis(500));
        assert!(config.validate(false).is_ok());
    }

    #[test]
    fn test_production_requires_key() {
        let config = AiConfig::default();
        assert_eq!(
            config.validate(true),
            Err(ValidationError::NoAiProviderConfigured)
        );

        let keyed = AiConfig {
            anthropic_api_key: Some(Secret::new("sk-ant-xxx".to_string())),
            ..Default::default()
        };
        assert!(keyed.validate(true).is_ok());
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let config = AiConfig {
            anthropic_api_key: Some(Secret::new(String::new())),
            ..Default::default()
        };
        assert!(!config.has_anthropic());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = AiConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(false),
            Err(ValidationError::InvalidAiSetting("timeout_secs"))
        );
    }
}
