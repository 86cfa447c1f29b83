//! HTTP boundary error mapping
//!
//! Turns the pipeline's typed failures into `{"detail": ...}` responses. The
//! two upstream failure kinds collapse into the same 500 shape.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::search::SearchError;

/// Error returned by the HTTP handlers
#[derive(Debug)]
pub enum ApiError {
    /// Request body failed validation (422)
    InvalidRequest(String),
    /// Any upstream failure (500)
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            ApiError::InvalidRequest(detail) | ApiError::Internal(detail) => detail,
        }
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::InvalidRequest(e) => ApiError::InvalidRequest(e.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Error processing search request: {}", self.detail());
        } else {
            tracing::warn!("Rejected search request: {}", self.detail());
        }

        (status, Json(json!({ "detail": self.detail() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;
    use crate::models::RequestError;
    use crate::places::PlacesError;

    #[test]
    fn test_upstream_failures_share_status() {
        let rewrite: ApiError = SearchError::from(LlmError::Unauthorized).into();
        let search: ApiError = SearchError::from(PlacesError::Parse("bad".to_string())).into();

        assert_eq!(rewrite.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(search.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(rewrite.detail().contains("Invalid API key"));
    }

    #[test]
    fn test_invalid_request_status() {
        let err: ApiError = SearchError::from(RequestError::EmptyQuery).into();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.detail(), "Query cannot be empty");
    }
}
