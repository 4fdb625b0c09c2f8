//! HS256 JWT session validator.
//!
//! Tokens are signed with a shared secret by the identity service. The
//! validator checks signature, issuer, audience and expiry, and requires a
//! non-empty `sub`, which becomes the caller's user id.

use async_trait::async_trait;
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// Settings for [`JwtSessionValidator`].
#[derive(Debug, Clone)]
pub struct JwtConfig {
    secret: Secret<String>,
    pub issuer: String,
    pub audience: String,
    /// Allowed clock skew in seconds.
    pub leeway_secs: u64,
}

impl JwtConfig {
    pub fn new(
        secret: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        Self {
            secret: Secret::new(secret.into()),
            issuer: issuer.into(),
            audience: audience.into(),
            leeway_secs: 30,
        }
    }

    pub fn with_leeway(mut self, leeway_secs: u64) -> Self {
        self.leeway_secs = leeway_secs;
        self
    }
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
}

/// Validates bearer tokens signed with a shared HS256 secret.
pub struct JwtSessionValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtSessionValidator {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.validate_exp = true;
        validation.leeway = config.leeway_secs;
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(config.secret.expose_secret().as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Token expired");
                    AuthError::TokenExpired
                }
                ErrorKind::InvalidIssuer => {
                    tracing::warn!("Invalid issuer in token");
                    AuthError::InvalidToken
                }
                ErrorKind::InvalidAudience => {
                    tracing::warn!("Invalid audience in token");
                    AuthError::InvalidToken
                }
                _ => {
                    tracing::debug!("Token validation failed: {}", e);
                    AuthError::InvalidToken
                }
            }
        })?;

        let id = UserId::new(data.claims.sub).map_err(|_| AuthError::InvalidToken)?;
        Ok(AuthenticatedUser::new(id, data.claims.email))
    }
}

impl std::fmt::Debug for JwtSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSessionValidator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "test-secret-with-enough-entropy";

    fn validator() -> JwtSessionValidator {
        JwtSessionValidator::new(&JwtConfig::new(SECRET, "https://auth.test", "interview-guard"))
    }

    fn token(claims: serde_json::Value, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn exp_in(secs: i64) -> i64 {
        chrono::Utc::now().timestamp() + secs
    }

    #[tokio::test]
    async fn accepts_valid_token() {
        let jwt = token(
            json!({
                "sub": "user-42",
                "iss": "https://auth.test",
                "aud": "interview-guard",
                "exp": exp_in(600),
                "email": "a@b.test"
            }),
            SECRET,
        );
        let user = validator().validate(&jwt).await.unwrap();
        assert_eq!(user.id.as_str(), "user-42");
        assert_eq!(user.email.as_deref(), Some("a@b.test"));
    }

    #[tokio::test]
    async fn rejects_expired_token() {
        let jwt = token(
            json!({
                "sub": "user-42",
                "iss": "https://auth.test",
                "aud": "interview-guard",
                "exp": exp_in(-3600)
            }),
            SECRET,
        );
        assert!(matches!(
            validator().validate(&jwt).await,
            Err(AuthError::TokenExpired)
        ));
    }

    #[tokio::test]
    async fn rejects_wrong_secret_issuer_or_audience() {
        let base = json!({
            "sub": "user-42",
            "iss": "https://auth.test",
            "aud": "interview-guard",
            "exp": exp_in(600)
        });
        let wrong_secret = token(base.clone(), "another-secret");
        assert!(validator().validate(&wrong_secret).await.is_err());

        let mut wrong_issuer = base.clone();
        wrong_issuer["iss"] = json!("https://evil.test");
        assert!(validator().validate(&token(wrong_issuer, SECRET)).await.is_err());

        let mut wrong_audience = base;
        wrong_audience["aud"] = json!("other-app");
        assert!(validator().validate(&token(wrong_audience, SECRET)).await.is_err());
    }

    #[tokio::test]
    async fn rejects_blank_subject_and_garbage() {
        let jwt = token(
            json!({
                "sub": "  ",
                "iss": "https://auth.test",
                "aud": "interview-guard",
                "exp": exp_in(600)
            }),
            SECRET,
        );
        assert!(matches!(
            validator().validate(&jwt).await,
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(
            validator().validate("not.a.jwt").await,
            Err(AuthError::InvalidToken)
        ));
    }
}
