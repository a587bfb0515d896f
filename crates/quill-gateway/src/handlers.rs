// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the drafting API.
//!
//! Handles POST /generate, POST /feedback, GET /, GET /health.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{error, warn};

use quill_core::{DraftParams, DraftRecord, HealthStatus, PluginAdapter, QuillError};

use crate::server::GatewayState;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error description.
    pub error: String,
    /// Stable error category (`validation`, `generation`, ...).
    pub kind: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok`, `degraded`, or `unhealthy`.
    pub status: String,
    /// Binary version.
    pub version: String,
    /// Seconds since the server started.
    pub uptime_secs: u64,
    pub provider: AdapterHealth,
    pub storage: AdapterHealth,
}

/// Health of one collaborator.
#[derive(Debug, Serialize)]
pub struct AdapterHealth {
    pub name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// A workflow error rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<QuillError> for ApiError {
    fn from(err: QuillError) -> Self {
        let status = match &err {
            QuillError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            QuillError::Generation { .. } | QuillError::Persistence { .. } => {
                StatusCode::BAD_GATEWAY
            }
            QuillError::Template(_) | QuillError::Config(_) | QuillError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            body: ErrorResponse {
                error: err.to_string(),
                kind: err.kind().to_string(),
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            body: ErrorResponse {
                error: rejection.body_text(),
                kind: "validation".to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, kind = %self.body.kind, error = %self.body.error, "request failed");
        } else {
            warn!(status = %self.status, kind = %self.body.kind, error = %self.body.error, "request rejected");
        }
        (self.status, Json(self.body)).into_response()
    }
}

/// POST /generate
///
/// Runs the generation step on the input parameters and returns the new
/// draft record.
pub async fn post_generate(
    State(state): State<GatewayState>,
    body: Result<Json<DraftParams>, JsonRejection>,
) -> Result<Json<DraftRecord>, ApiError> {
    let Json(params) = body?;
    let record = state.controller.start(&params).await?;
    Ok(Json(record))
}

/// POST /feedback
///
/// Runs the refinement step on the echoed record: refines it with the
/// attached feedback, or persists it when `approved` is set.
pub async fn post_feedback(
    State(state): State<GatewayState>,
    body: Result<Json<DraftRecord>, JsonRejection>,
) -> Result<Json<DraftRecord>, ApiError> {
    let Json(record) = body?;
    let record = state.controller.continue_draft(&record).await?;
    Ok(Json(record))
}

/// GET /
pub async fn get_root() -> &'static str {
    "Quill drafting service is running"
}

/// GET /health
///
/// Reports collaborator health. Responds 503 when either is unhealthy.
pub async fn get_health(State(state): State<GatewayState>) -> (StatusCode, Json<HealthResponse>) {
    let provider = adapter_health(state.controller.provider().as_ref()).await;
    let storage = adapter_health(state.controller.storage().as_ref()).await;

    let statuses = [provider.status.as_str(), storage.status.as_str()];
    let (code, status) = if statuses.contains(&"unhealthy") {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    } else if statuses.contains(&"degraded") {
        (StatusCode::OK, "degraded")
    } else {
        (StatusCode::OK, "ok")
    };

    (
        code,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_secs: state.start_time.elapsed().as_secs(),
            provider,
            storage,
        }),
    )
}

async fn adapter_health<A: PluginAdapter + ?Sized>(adapter: &A) -> AdapterHealth {
    let (status, detail) = match adapter.health_check().await {
        Ok(HealthStatus::Healthy) => ("healthy", None),
        Ok(HealthStatus::Degraded(detail)) => ("degraded", Some(detail)),
        Ok(HealthStatus::Unhealthy(detail)) => ("unhealthy", Some(detail)),
        Err(e) => ("unhealthy", Some(e.to_string())),
    };
    AdapterHealth {
        name: adapter.name().to_string(),
        status: status.to_string(),
        detail,
    }
}
