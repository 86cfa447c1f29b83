//! Search orchestrator
//!
//! Strictly sequential: `Rewriting` then `Searching` then `Done`, with a jump
//! to `Failed` from either of the first two. No retries and no partial
//! results.

use std::fmt;
use std::sync::Arc;

use anyhow::Result;

use super::SearchError;
use crate::config::AppConfig;
use crate::models::{SearchRequest, SearchResponse};
use crate::places::{GooglePlacesClient, PlaceSearch};
use crate::rewriter::{LlmQueryRewriter, QueryRewrite};

/// Pipeline state of a single request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Rewriting,
    Searching,
    Done,
    Failed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStage::Rewriting => write!(f, "rewriting"),
            PipelineStage::Searching => write!(f, "searching"),
            PipelineStage::Done => write!(f, "done"),
            PipelineStage::Failed => write!(f, "failed"),
        }
    }
}

/// Runs rewrite and place search for each request
///
/// Holds no per-request state, so one instance serves concurrent requests.
#[derive(Clone)]
pub struct SearchOrchestrator {
    rewriter: Arc<dyn QueryRewrite>,
    places: Arc<dyn PlaceSearch>,
}

impl SearchOrchestrator {
    /// Create an orchestrator over the given stages
    pub fn new(rewriter: Arc<dyn QueryRewrite>, places: Arc<dyn PlaceSearch>) -> Self {
        Self { rewriter, places }
    }

    /// Wire the Anthropic rewriter and the Google Places client from config
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let rewriter = LlmQueryRewriter::from_config(config)?;
        let places = GooglePlacesClient::from_config(config)?;
        Ok(Self::new(Arc::new(rewriter), Arc::new(places)))
    }

    /// Validate a raw query, then run the pipeline
    pub async fn search_query(&self, query: &str) -> Result<SearchResponse, SearchError> {
        let request = SearchRequest::new(query)?;
        self.search(&request).await
    }

    /// Run the pipeline for a validated request
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        let query = request.query();
        tracing::info!(stage = %PipelineStage::Rewriting, query, "Processing search query");

        let processed = match self.rewriter.rewrite(query).await {
            Ok(processed) => processed,
            Err(e) => {
                tracing::error!(stage = %PipelineStage::Failed, "Query rewrite failed: {}", e);
                return Err(e.into());
            }
        };

        tracing::info!(
            stage = %PipelineStage::Searching,
            processed_query = %processed,
            "Searching places"
        );

        let locations = match self.places.search(&processed).await {
            Ok(locations) => locations,
            Err(e) => {
                tracing::error!(stage = %PipelineStage::Failed, "Place search failed: {}", e);
                return Err(e.into());
            }
        };

        tracing::info!(
            stage = %PipelineStage::Done,
            count = locations.len(),
            "Found {} locations",
            locations.len()
        );

        Ok(SearchResponse::from_locations(locations))
    }
}
