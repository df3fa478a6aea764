// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::config::ServerConfig;
use super::detect::{amenities_handler, detect_handler, health_handler};
use super::errors::ApiError;
use crate::pipeline::BatchOrchestrator;

/// Shared handler state
///
/// The orchestrator is optional so the server can answer health checks while
/// no detector is loaded.
#[derive(Clone, Default)]
pub struct AppState {
    pub orchestrator: Arc<RwLock<Option<Arc<BatchOrchestrator>>>>,
}

impl AppState {
    pub fn new(orchestrator: BatchOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(RwLock::new(Some(Arc::new(orchestrator)))),
        }
    }

    /// State without a detector
    pub fn new_for_test() -> Self {
        Self::default()
    }

    pub async fn orchestrator(&self) -> Option<Arc<BatchOrchestrator>> {
        self.orchestrator.read().await.clone()
    }

    pub async fn set_orchestrator(&self, orchestrator: BatchOrchestrator) {
        *self.orchestrator.write().await = Some(Arc::new(orchestrator));
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_handler))
        // Amenity vocabulary
        .route("/v1/amenities", get(amenities_handler))
        // Detection, also served at the root path
        .route("/v1/detect", post(detect_handler))
        .route("/", post(detect_handler))
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

async fn not_found_handler(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}

/// Serve until Ctrl-C
pub async fn start_server(config: &ServerConfig, state: AppState) -> Result<()> {
    let addr = config.socket_addr().map_err(anyhow::Error::msg)?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("API server listening on {}", addr);

    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining requests");
}
