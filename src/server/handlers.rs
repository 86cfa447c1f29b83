use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;

use super::error::ApiError;
use crate::models::{HealthResponse, SearchRequest, SearchResponse};
use crate::search::SearchOrchestrator;

/// GET / - health check
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// POST /api/search - rewrite the query, search places, return the envelope
pub async fn search_handler(
    State(orchestrator): State<Arc<SearchOrchestrator>>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Json(request) = payload?;
    tracing::info!("Received search request with query: {}", request.query());

    let response = orchestrator.search(&request).await?;
    Ok(Json(response))
}
