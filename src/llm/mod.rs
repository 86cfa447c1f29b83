//! LLM provider client
//!
//! Thin client for the Anthropic Messages API used by the query rewriter.

mod anthropic_client;

pub use anthropic_client::{
    AnthropicClient, LlmError, Message, MessageRequest, MessageResponse, UsageStats,
};
