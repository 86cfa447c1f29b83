//! HTTP surface
//!
//! axum router exposing the health check and `POST /api/search`.

use anyhow::Result;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::search::SearchOrchestrator;

pub mod error;
pub mod handlers;

pub use error::ApiError;

pub fn create_router(orchestrator: Arc<SearchOrchestrator>, cors_permissive: bool) -> Router {
    let router = Router::new()
        .route("/", get(handlers::health_handler))
        .route("/api/search", post(handlers::search_handler))
        .with_state(orchestrator);

    if !cors_permissive {
        return router;
    }

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    router.layer(cors)
}

/// Bind `addr` and serve until Ctrl-C
pub async fn serve(addr: &str, router: Router) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
