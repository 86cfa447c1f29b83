//! Pipeline failure taxonomy

use thiserror::Error;

use super::PipelineStage;
use crate::llm::LlmError;
use crate::models::RequestError;
use crate::places::PlacesError;

/// Classified failure of a search request
#[derive(Debug, Error)]
pub enum SearchError {
    /// The inbound query failed validation; no upstream was called
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] RequestError),

    /// The text-generation call failed
    #[error("Query rewrite failed: {0}")]
    UpstreamRewriteFailure(#[from] LlmError),

    /// The place-search call failed
    #[error("Place search failed: {0}")]
    UpstreamSearchFailure(#[from] PlacesError),
}

impl SearchError {
    /// Stage the pipeline was in when it failed, `None` when it never started
    pub fn stage(&self) -> Option<PipelineStage> {
        match self {
            SearchError::InvalidRequest(_) => None,
            SearchError::UpstreamRewriteFailure(_) => Some(PipelineStage::Rewriting),
            SearchError::UpstreamSearchFailure(_) => Some(PipelineStage::Searching),
        }
    }

    /// Whether the failure came from an external service
    pub fn is_upstream(&self) -> bool {
        self.stage().is_some()
    }
}
