//! Authentication configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Shared-secret JWT settings
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret shared with the identity service
    #[serde(default = "default_secret")]
    pub jwt_secret: Secret<String>,

    /// Expected `iss` claim
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// Expected `aud` claim
    #[serde(default = "default_audience")]
    pub audience: String,
}

impl AuthConfig {
    pub fn secret(&self) -> &str {
        self.jwt_secret.expose_secret()
    }

    /// Validate auth configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.secret().is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__JWT_SECRET"));
        }
        if *environment == Environment::Production && self.secret().len() < 32 {
            return Err(ValidationError::WeakJwtSecret);
        }
        if self.issuer.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__ISSUER"));
        }
        if self.audience.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__AUDIENCE"));
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_secret(),
            issuer: default_issuer(),
            audience: default_audience(),
        }
    }
}

fn default_secret() -> Secret<String> {
    Secret::new(String::new())
}

fn default_issuer() -> String {
    "interview-guard".to_string()
}

fn default_audience() -> String {
    "interview-guard-api".to_string()
}
