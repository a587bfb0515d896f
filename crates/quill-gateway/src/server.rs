// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::time::Instant;

use axum::{
    Router,
    routing::{get, post},
};
use quill_core::QuillError;
use quill_workflow::WorkflowController;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Workflow driven by the two POST operations.
    pub controller: WorkflowController,
    /// Process start time for uptime calculation.
    pub start_time: Instant,
}

impl GatewayState {
    pub fn new(controller: WorkflowController) -> Self {
        Self {
            controller,
            start_time: Instant::now(),
        }
    }
}

/// Gateway server configuration (mirrors the `[server]` config section).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Attach a permissive CORS layer.
    pub cors_permissive: bool,
}

/// Builds the router:
/// - POST /generate
/// - POST /feedback
/// - GET /
/// - GET /health
pub fn router(state: GatewayState, cors_permissive: bool) -> Router {
    let app = Router::new()
        .route("/", get(handlers::get_root))
        .route("/health", get(handlers::get_health))
        .route("/generate", post(handlers::post_generate))
        .route("/feedback", post(handlers::post_feedback))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if cors_permissive {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Start the gateway HTTP server.
///
/// Binds `host:port` and serves until `shutdown` is cancelled.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), QuillError> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| QuillError::Config(format!("failed to bind gateway to {addr}: {e}")))?;

    serve(listener, router(state, config.cors_permissive), shutdown).await
}

/// Serves `app` on an already bound listener.
///
/// Once `shutdown` is cancelled no new connections are accepted and
/// in-flight requests are allowed to finish.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    shutdown: CancellationToken,
) -> Result<(), QuillError> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("gateway server listening on {addr}");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| QuillError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("gateway server stopped");
    Ok(())
}
