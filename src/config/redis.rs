//! Redis configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Redis configuration. Without a URL, rate windows are kept in memory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL
    pub url: Option<String>,
}

impl RedisConfig {
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.is_empty())
    }

    /// Validate Redis configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.url() {
            Some(url) if !url.starts_with("redis://") && !url.starts_with("rediss://") => {
                Err(ValidationError::InvalidRedisUrl)
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_url_is_valid() {
        assert!(RedisConfig::default().validate().is_ok());
        assert!(RedisConfig {
            url: Some(String::new())
        }
        .url()
        .is_none());
    }

    #[test]
    fn test_validation_invalid_url() {
        let config = RedisConfig {
            url: Some("http://localhost:6379".to_string()),
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidRedisUrl));
        let tls = RedisConfig {
            url: Some("rediss://cache:6380".to_string()),
        };
        assert!(tls.validate().is_ok());
    }
}
