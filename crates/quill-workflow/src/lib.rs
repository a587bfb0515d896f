// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Draft generation and refinement workflow for Quill.
//!
//! The [`WorkflowController`] is the coordination boundary. It exposes two
//! operations, each running exactly one step to completion:
//! - [`start`](WorkflowController::start) runs the [`GenerationStep`]
//! - [`continue_draft`](WorkflowController::continue_draft) runs the
//!   [`RefinementStep`], which either refines or persists
//!
//! No record is retained between calls. Callers echo the full record back.

pub mod generation;
pub mod refinement;
pub mod state;

use std::sync::Arc;

use quill_config::model::WorkflowConfig;
use quill_core::{DraftParams, DraftRecord, ProviderAdapter, QuillError, StorageAdapter};
use quill_prompt::PromptSet;
use tracing::debug;

pub use generation::GenerationStep;
pub use refinement::RefinementStep;
pub use state::Action;

/// Stateless entry point shared by every request handler.
///
/// Cheap to clone: it holds only `Arc`s to immutable collaborators.
#[derive(Clone)]
pub struct WorkflowController {
    provider: Arc<dyn ProviderAdapter + Send + Sync>,
    storage: Arc<dyn StorageAdapter + Send + Sync>,
    generation: GenerationStep,
    refinement: RefinementStep,
}

impl WorkflowController {
    pub fn new(
        provider: Arc<dyn ProviderAdapter + Send + Sync>,
        storage: Arc<dyn StorageAdapter + Send + Sync>,
        prompts: Arc<PromptSet>,
        policy: WorkflowConfig,
    ) -> Self {
        let generation = GenerationStep::new(provider.clone(), prompts.clone());
        let refinement = RefinementStep::new(provider.clone(), storage.clone(), prompts, policy);
        Self {
            provider,
            storage,
            generation,
            refinement,
        }
    }

    /// Generates the first draft for `params`.
    pub async fn start(&self, params: &DraftParams) -> Result<DraftRecord, QuillError> {
        debug!(id = ?params.identifier, "start");
        self.generation.run(params).await
    }

    /// Applies feedback to `record`, or persists it when approved.
    pub async fn continue_draft(&self, record: &DraftRecord) -> Result<DraftRecord, QuillError> {
        debug!(id = %record.log_id(), state = %record.state(), "continue");
        self.refinement.run(record).await
    }

    /// The model provider, for health reporting.
    pub fn provider(&self) -> &Arc<dyn ProviderAdapter + Send + Sync> {
        &self.provider
    }

    /// The persistence store, for health reporting.
    pub fn storage(&self) -> &Arc<dyn StorageAdapter + Send + Sync> {
        &self.storage
    }
}
