//! Query rewriter implementation
//!
//! Uses an LLM to turn a conversational location query into a search phrase.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::config::app_config::AppConfig;
use crate::llm::{AnthropicClient, LlmError, Message, MessageRequest};

/// System prompt for query rewriting
pub const SYSTEM_PROMPT: &str = "You are a location search assistant. You rewrite \
natural-language requests into concise search queries for a maps place-search service. \
Respond only with the rewritten query.";

/// Upper bound on generated tokens
pub const MAX_TOKENS: u32 = 8096;

/// Sampling temperature; zero keeps the rewrite deterministic
const TEMPERATURE: f32 = 0.0;

/// Embed the raw query into the instruction sent as the user message
pub fn build_prompt(query: &str) -> String {
    format!(
        "Given the following location search query, please analyze it and return a clear, \
         specific location search query that would work well with Google Maps. Focus on the key \
         location details and remove any unnecessary information. Only return the processed \
         query, nothing else.\n\nOriginal query: {query}\n"
    )
}

/// Rewrites a raw user query into a processed query
#[async_trait]
pub trait QueryRewrite: Send + Sync {
    /// Return the processed query. Any upstream failure is an error, never
    /// an empty or fallback string.
    async fn rewrite(&self, query: &str) -> Result<String, LlmError>;
}

/// Query rewriter backed by the Anthropic Messages API
pub struct LlmQueryRewriter {
    /// API client
    client: AnthropicClient,
    /// Model to use
    model: String,
}

impl LlmQueryRewriter {
    /// Default model
    pub const DEFAULT_MODEL: &'static str = "claude-3-5-sonnet-20241022";

    /// Create a new query rewriter against the public endpoint
    pub fn new(api_key: String) -> Self {
        Self {
            client: AnthropicClient::new(api_key),
            model: Self::DEFAULT_MODEL.to_string(),
        }
    }

    /// Create from the application configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let api_key = config
            .anthropic_api_key()
            .ok_or_else(|| anyhow!("anthropic_api_key is not configured"))?;
        let client = AnthropicClient::with_config(
            api_key,
            Some(config.anthropic_base_url().to_string()),
            config.request_timeout_secs().map(Duration::from_secs),
        );

        Ok(Self {
            client,
            model: config.anthropic_model().to_string(),
        })
    }

    /// Set custom model
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    /// Get the model
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the request sent for `query`
    pub fn build_request(&self, query: &str) -> MessageRequest {
        MessageRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            system: Some(SYSTEM_PROMPT.to_string()),
            messages: vec![Message::user(build_prompt(query))],
        }
    }
}

#[async_trait]
impl QueryRewrite for LlmQueryRewriter {
    async fn rewrite(&self, query: &str) -> Result<String, LlmError> {
        let request = self.build_request(query);
        let response = self.client.create_message(&request).await?;

        let stop_reason = response.stop_reason.as_deref().unwrap_or("unknown");
        if let Some(usage) = &response.usage {
            tracing::debug!(
                model = %response.model,
                stop_reason,
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "rewrite completed"
            );
        }
        if stop_reason == "max_tokens" {
            tracing::warn!("Rewrite hit the token limit, reply may be truncated");
        }

        Ok(response.content)
    }
}
