// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible chat completions provider adapter for Quill.
//!
//! This crate implements [`ProviderAdapter`] over the `/chat/completions`
//! endpoint. Any server speaking that protocol can be targeted through
//! `openai.base_url`.

pub mod client;
pub mod types;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use quill_config::model::OpenAiConfig;
use quill_core::error::QuillError;
use quill_core::traits::{PluginAdapter, ProviderAdapter};
use quill_core::types::{AdapterType, ChatMessage, HealthStatus, Role};
use tracing::{debug, info};

use crate::client::OpenAiClient;
use crate::types::{ApiMessage, ChatCompletionRequest};

/// Chat completions provider implementing [`ProviderAdapter`].
///
/// API key resolution order: config -> `OPENAI_API_KEY` env var -> error.
pub struct OpenAiProvider {
    client: OpenAiClient,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl OpenAiProvider {
    /// Creates a new provider from the `[openai]` configuration section.
    pub fn new(config: &OpenAiConfig) -> Result<Self, QuillError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = OpenAiClient::new(
            &api_key,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )?;

        info!(
            model = config.model,
            endpoint = client.endpoint(),
            "OpenAI provider initialized"
        );

        Ok(Self {
            client,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// Model identifier sent with every request.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn to_request(&self, messages: &[ChatMessage]) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: messages.iter().map(to_api_message).collect(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

#[async_trait]
impl PluginAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, QuillError> {
        // No request: a health check must not spend tokens.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), QuillError> {
        debug!("OpenAI provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiProvider {
    async fn invoke(&self, messages: &[ChatMessage]) -> Result<String, QuillError> {
        let request = self.to_request(messages);
        let started = Instant::now();
        let response = self.client.complete(&request).await?;

        let content = response.first_content().ok_or_else(|| {
            QuillError::generation("provider response contained no message content")
        })?;

        debug!(
            model = response.model.as_deref().unwrap_or(&self.model),
            messages = messages.len(),
            output_len = content.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "model invocation complete"
        );

        Ok(content.to_string())
    }
}

/// Maps a domain message to wire format; `human` becomes `user`.
fn to_api_message(message: &ChatMessage) -> ApiMessage {
    let role = match message.role {
        Role::System => "system",
        Role::Human => "user",
        Role::Assistant => "assistant",
    };
    ApiMessage {
        role: role.to_string(),
        content: message.content.clone(),
    }
}

/// Resolves the API key from config or environment.
fn resolve_api_key(config_key: &Option<String>) -> Result<String, QuillError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(key.clone());
    }

    std::env::var("OPENAI_API_KEY")
        .ok()
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            QuillError::Config(
                "OpenAI API key not found. Set openai.api_key in config or OPENAI_API_KEY environment variable.".into(),
            )
        })
}
