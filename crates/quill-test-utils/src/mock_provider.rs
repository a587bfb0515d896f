// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock model provider adapter for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with pre-configured responses,
//! enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use quill_core::QuillError;
use quill_core::traits::adapter::PluginAdapter;
use quill_core::traits::provider::ProviderAdapter;
use quill_core::types::{AdapterType, ChatMessage, HealthStatus};

/// A mock model provider that returns pre-configured responses.
///
/// Responses are popped from a FIFO queue. When the queue is empty,
/// a default "mock response" text is returned. Every message list it is
/// invoked with is recorded, including calls that fail.
pub struct MockProvider {
    responses: Arc<Mutex<VecDeque<String>>>,
    invocations: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl MockProvider {
    /// Create a new mock provider with an empty response queue.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            invocations: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a mock provider pre-loaded with the given responses.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            ..Self::new()
        }
    }

    /// Create a mock provider whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Arc::new(Mutex::new(Some(message.into()))),
            ..Self::new()
        }
    }

    /// Add a response to the end of the queue.
    pub async fn add_response(&self, text: String) {
        self.responses.lock().await.push_back(text);
    }

    /// Make subsequent calls fail (`Some`) or succeed again (`None`).
    pub async fn set_failure(&self, message: Option<String>) {
        *self.failure.lock().await = message;
    }

    /// Every message list received so far, oldest first.
    pub async fn invocations(&self) -> Vec<Vec<ChatMessage>> {
        self.invocations.lock().await.clone()
    }

    /// Number of calls received so far.
    pub async fn invocation_count(&self) -> usize {
        self.invocations.lock().await.len()
    }

    /// Pop the next response, or return the default.
    async fn next_response(&self) -> String {
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| "mock response".to_string())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, QuillError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), QuillError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn invoke(&self, messages: &[ChatMessage]) -> Result<String, QuillError> {
        self.invocations.lock().await.push(messages.to_vec());
        if let Some(message) = self.failure.lock().await.clone() {
            return Err(QuillError::generation(message));
        }
        Ok(self.next_response().await)
    }
}
