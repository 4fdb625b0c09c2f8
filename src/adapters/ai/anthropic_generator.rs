//! Anthropic text generator using the Messages API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = AnthropicConfig::new(api_key)
//!     .with_model("claude-sonnet-4-20250514")
//!     .with_base_url("https://api.anthropic.com");
//!
//! let generator = AnthropicTextGenerator::new(config)?;
//! ```
//!
//! One HTTP call per `generate`. Retries and deadlines are applied by the
//! decorators in this module's siblings.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::generation::{GeneratedReply, GenerationRequest};
use crate::ports::{AIError, TextGenerator};

const ANTHROPIC_API_VERSION: &str = "2023-06-01";

/// Configuration for the Anthropic generator.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    /// Transport-level timeout for one HTTP call.
    pub timeout: Duration,
    pub max_tokens: u32,
}

impl AnthropicConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "claude-sonnet-4-20250514".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            timeout: Duration::from_secs(60),
            max_tokens: 2048,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Generator backed by Anthropic's Claude models.
pub struct AnthropicTextGenerator {
    config: AnthropicConfig,
    client: Client,
}

impl AnthropicTextGenerator {
    pub fn new(config: AnthropicConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::unavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }

    fn to_anthropic_request(&self, request: &GenerationRequest) -> AnthropicRequest {
        AnthropicRequest {
            model: self.config.model.clone(),
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: request.prompt.clone(),
            }],
            max_tokens: self.config.max_tokens,
        }
    }

    async fn send_request(&self, request: &GenerationRequest) -> Result<Response, AIError> {
        self.client
            .post(self.messages_url())
            .header("x-api-key", self.config.api_key())
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .header("Content-Type", "application/json")
            .json(&self.to_anthropic_request(request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AIError::Timeout {
                        timeout_secs: u32::try_from(self.config.timeout.as_secs())
                            .unwrap_or(u32::MAX),
                    }
                } else if e.is_connect() {
                    AIError::network(format!("Connection failed: {e}"))
                } else {
                    AIError::network(e.to_string())
                }
            })
    }

    async fn handle_response_status(response: Response) -> Result<Response, AIError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 | 403 => Err(AIError::AuthenticationFailed),
            429 => Err(AIError::rate_limited(parse_retry_after(&error_body))),
            400 | 413 | 422 => Err(AIError::InvalidRequest(error_body)),
            500..=599 => Err(AIError::unavailable(format!(
                "Server error {status}: {error_body}"
            ))),
            _ => Err(AIError::network(format!(
                "Unexpected status {status}: {error_body}"
            ))),
        }
    }
}

#[async_trait]
impl TextGenerator for AnthropicTextGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedReply, AIError> {
        let response = self.send_request(request).await?;
        let response = Self::handle_response_status(response).await?;

        let body: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {e}")))?;

        tracing::debug!(
            model = %body.model,
            stop_reason = ?body.stop_reason,
            blocks = body.content.len(),
            "anthropic reply received"
        );

        Ok(reply_from_response(body))
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}

/// Concatenates the text blocks of a Messages API response.
///
/// A response with no text blocks yields a reply whose text resolves to nothing.
fn reply_from_response(response: AnthropicResponse) -> GeneratedReply {
    let texts: Vec<String> = response
        .content
        .into_iter()
        .filter(|block| block.block_type == "text")
        .filter_map(|block| block.text)
        .collect();

    let reply = if texts.is_empty() {
        GeneratedReply::empty()
    } else {
        GeneratedReply::plain(texts.concat())
    };
    reply.with_model(response.model)
}

/// Extracts "try again in Ns" from an error body, defaulting to 60 seconds.
fn parse_retry_after(error_body: &str) -> u32 {
    serde_json::from_str::<serde_json::Value>(error_body)
        .ok()
        .and_then(|parsed| {
            let message = parsed.get("error")?.get("message")?.as_str()?.to_string();
            let idx = message.find("try again in ")?;
            let digits: String = message[idx + 13..]
                .chars()
                .take_while(char::is_ascii_digit)
                .collect();
            digits.parse::<u32>().ok()
        })
        .unwrap_or(60)
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    messages: Vec<AnthropicMessage>,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    model: String,
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}
