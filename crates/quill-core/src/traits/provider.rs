// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for generative model integrations.

use async_trait::async_trait;

use crate::error::QuillError;
use crate::traits::adapter::PluginAdapter;
use crate::types::ChatMessage;

/// Produces text given an ordered, role-tagged message history.
///
/// Implementations map failures to [`QuillError::Generation`].
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Sends the full message list and returns the raw response text.
    async fn invoke(&self, messages: &[ChatMessage]) -> Result<String, QuillError>;
}
