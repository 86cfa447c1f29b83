//! placeseek: natural-language place search
//!
//! This library rewrites a free-text location query with an LLM, runs the
//! rewritten phrase against the Google Places Text Search API and returns a
//! normalized list of places.
//!
//! # Pipeline
//!
//! ```text
//! SearchRequest ─▶ QueryRewrite ─▶ PlaceSearch ─▶ SearchResponse
//!                  (Anthropic)     (top 5 places)
//! ```
//!
//! # Modules
//!
//! - `config`: Settings loaded once at startup (TOML file + environment)
//! - `models`: Request, location and response types
//! - `llm`: Anthropic Messages API client
//! - `rewriter`: Query rewriting with LLM
//! - `places`: Google Places client and strict response decoding
//! - `search`: Pipeline orchestration and failure taxonomy
//! - `server`: axum HTTP surface

pub mod config;
pub mod llm;
pub mod models;
pub mod places;
pub mod rewriter;
pub mod search;
pub mod server;

// Re-export commonly used types
pub use config::AppConfig;
pub use models::{Location, SearchRequest, SearchResponse};
pub use search::{SearchError, SearchOrchestrator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
