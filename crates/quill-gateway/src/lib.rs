// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP boundary for the Quill drafting workflow.
//!
//! Two operations drive the workflow, `POST /generate` and `POST /feedback`.
//! Both carry the whole draft record in the request or response body; the
//! server keeps no session between calls.

pub mod handlers;
pub mod server;

pub use handlers::{ApiError, ErrorResponse, HealthResponse};
pub use server::{GatewayState, ServerConfig, router, serve, start_server};
