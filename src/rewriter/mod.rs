//! Query rewriter module
//!
//! This module turns a free-text location query into a phrase suited to a
//! place-search index, using an LLM.

mod query_rewriter;

pub use query_rewriter::{build_prompt, LlmQueryRewriter, QueryRewrite, MAX_TOKENS, SYSTEM_PROMPT};
