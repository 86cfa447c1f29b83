//! Anthropic Messages API HTTP client
//!
//! Provides a structured HTTP client for the Messages API with:
//! - `x-api-key` authentication
//! - Request/response serialization
//! - Error handling with network vs API error distinction
//!
//! Each call is a single attempt. Rate limiting is reported to the caller,
//! never retried here.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

/// Anthropic API errors
#[derive(Debug, Error)]
pub enum LlmError {
    /// Network error (connection failed, timeout, etc.)
    #[error("Network error: {0}")]
    Network(String),

    /// API error (4xx/5xx responses)
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Response parsing error
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_secs} seconds")]
    RateLimit { retry_after_secs: u64 },

    /// Invalid API key
    #[error("Invalid API key")]
    Unauthorized,
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::Network(err.to_string())
    }
}

// =============================================================================
// API Types
// =============================================================================

/// Conversation turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Body of `POST /messages`
#[derive(Debug, Clone, Serialize)]
pub struct MessageRequest {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub messages: Vec<Message>,
}

/// Decoded reply
#[derive(Debug, Clone)]
pub struct MessageResponse {
    /// Concatenated text of every `text` content block
    pub content: String,
    pub model: String,
    pub stop_reason: Option<String>,
    pub usage: Option<UsageStats>,
}

/// Token usage statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageStats {
    pub input_tokens: usize,
    pub output_tokens: usize,
}

// =============================================================================
// Internal API Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    model: Option<String>,
    stop_reason: Option<String>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    input_tokens: Option<usize>,
    output_tokens: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

// =============================================================================
// Anthropic Client
// =============================================================================

/// Anthropic Messages API client
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    timeout: Option<Duration>,
}

impl AnthropicClient {
    /// Anthropic API base URL
    pub const DEFAULT_BASE_URL: &'static str = "https://api.anthropic.com/v1";

    /// Value sent in the `anthropic-version` header
    pub const API_VERSION: &'static str = "2023-06-01";

    /// Create a new client against the public endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_config(api_key, None, None)
    }

    /// Create client with custom configuration
    ///
    /// `timeout = None` leaves reqwest's default in place.
    pub fn with_config(
        api_key: impl Into<String>,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url
                .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout,
        }
    }

    /// Send one message request
    pub async fn create_message(
        &self,
        request: &MessageRequest,
    ) -> Result<MessageResponse, LlmError> {
        let url = format!("{}/messages", self.base_url);

        let mut builder = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", Self::API_VERSION)
            .header("content-type", "application/json")
            .json(request);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status();

        // Handle rate limiting
        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(LlmError::RateLimit {
                retry_after_secs: retry_after,
            });
        }

        // Handle unauthorized
        if status.as_u16() == 401 {
            return Err(LlmError::Unauthorized);
        }

        let response_text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorEnvelope>(&response_text)
                .map(|envelope| envelope.error.message)
                .unwrap_or(response_text);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let api_response: ApiResponse = serde_json::from_str(&response_text)
            .map_err(|e| LlmError::Parse(format!("{}: {}", e, response_text)))?;

        let texts: Vec<String> = api_response
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();

        if texts.is_empty() {
            return Err(LlmError::Parse("No text content in response".to_string()));
        }

        let usage = api_response.usage.map(|u| UsageStats {
            input_tokens: u.input_tokens.unwrap_or(0),
            output_tokens: u.output_tokens.unwrap_or(0),
        });

        Ok(MessageResponse {
            content: texts.concat(),
            model: api_response.model.unwrap_or_default(),
            stop_reason: api_response.stop_reason,
            usage,
        })
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
