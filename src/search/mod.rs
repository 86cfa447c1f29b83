//! Search module
//!
//! This module runs the request pipeline: rewrite the query, look up places,
//! assemble the response envelope.

mod error;
mod orchestrator;

pub use error::SearchError;
pub use orchestrator::{PipelineStage, SearchOrchestrator};
