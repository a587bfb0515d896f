// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation step: turns input parameters into a first draft.

use std::sync::Arc;
use std::time::Instant;

use quill_core::{
    ChatMessage, DraftParams, DraftRecord, DraftStatus, ProviderAdapter, QuillError,
};
use quill_prompt::PromptSet;
use tracing::{info, warn};

/// Renders the generation prompt and makes exactly one model call.
#[derive(Clone)]
pub struct GenerationStep {
    provider: Arc<dyn ProviderAdapter + Send + Sync>,
    prompts: Arc<PromptSet>,
}

impl GenerationStep {
    pub fn new(provider: Arc<dyn ProviderAdapter + Send + Sync>, prompts: Arc<PromptSet>) -> Self {
        Self { provider, prompts }
    }

    /// Produces a fresh record with `output_text` set and
    /// `status = awaiting_feedback`.
    ///
    /// Validation runs before rendering, and rendering before the model
    /// call, so a rejected request never reaches the provider.
    pub async fn run(&self, params: &DraftParams) -> Result<DraftRecord, QuillError> {
        let missing = params.missing_fields();
        if !missing.is_empty() {
            return Err(QuillError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }

        let prompt = self.prompts.generate().render(&params.template_vars())?;

        let started = Instant::now();
        let response = self
            .provider
            .invoke(&[ChatMessage::system(prompt)])
            .await
            .inspect_err(|e| {
                warn!(id = ?params.identifier, error = %e, "generation model call failed");
            })?;

        let text = response.trim();
        if text.is_empty() {
            warn!(id = ?params.identifier, "model returned an empty draft");
            return Err(QuillError::generation("model returned an empty draft"));
        }

        let mut record = DraftRecord::from_params(params.clone());
        record.output_text = Some(text.to_string());
        record.status = DraftStatus::AwaitingFeedback;

        info!(
            id = %record.log_id(),
            output_len = text.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "draft generated"
        );
        Ok(record)
    }
}
