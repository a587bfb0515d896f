// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Quill integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockProvider`] - Mock model provider with pre-configured responses
//! - [`MockStorage`] - Mock store that records every append
//! - [`TestHarness`] - Both mocks wired into a `WorkflowController`

pub mod harness;
pub mod mock_provider;
pub mod mock_storage;

pub use harness::{TestHarness, TestHarnessBuilder, self_belief_params};
pub use mock_provider::MockProvider;
pub use mock_storage::MockStorage;
