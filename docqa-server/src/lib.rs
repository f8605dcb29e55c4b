//! HTTP boundary for the document question-answering pipeline.
//!
//! Exposes the [`docqa_core`] pipeline over a JSON API: question
//! answering with provenance, a chat variant, plain-text uploads, batch
//! ingestion, and document management.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;
pub mod types;

use std::net::SocketAddr;

use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// The HTTP server over a built [`AppState`].
pub struct ApiServer {
    config: ServerConfig,
    state: AppState,
}

impl ApiServer {
    /// Create a server over pre-built state.
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Build the router with all routes and middleware.
    pub fn build_router(&self) -> Router {
        let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

        Router::new()
            .route("/health", get(health))
            .nest("/api", routes::api_routes(self.config.max_upload_size))
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Bind and serve until the process is stopped.
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .config
            .address()
            .parse()
            .map_err(|e| ApiError::Validation(format!("Invalid bind address: {e}")))?;

        let router = self.build_router();
        info!(%addr, "starting server");

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to bind {addr}: {e}")))?;
        axum::serve(listener, router)
            .await
            .map_err(|e| ApiError::Internal(format!("Server error: {e}")))?;

        Ok(())
    }
}

async fn health() -> &'static str {
    "OK"
}
