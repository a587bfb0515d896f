// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end workflow testing.
//!
//! `TestHarness` assembles a [`WorkflowController`] with mock adapters and
//! the built-in prompts, and keeps handles to the mocks for assertions.

use std::sync::Arc;

use quill_config::model::{QuillConfig, WorkflowConfig};
use quill_core::{DraftId, DraftParams, DraftRecord, QuillError};
use quill_prompt::PromptSet;
use quill_workflow::WorkflowController;

use crate::mock_provider::MockProvider;
use crate::mock_storage::MockStorage;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    responses: Vec<String>,
    workflow: WorkflowConfig,
    prompts: Option<(String, String)>,
    provider_failure: Option<String>,
    storage_failure: Option<String>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            responses: Vec::new(),
            workflow: WorkflowConfig::default(),
            prompts: None,
            provider_failure: None,
            storage_failure: None,
        }
    }

    /// Set mock provider responses.
    pub fn with_mock_responses(mut self, responses: Vec<String>) -> Self {
        self.responses = responses;
        self
    }

    /// Set the refinement policy switches.
    pub fn with_workflow(mut self, workflow: WorkflowConfig) -> Self {
        self.workflow = workflow;
        self
    }

    /// Use custom generation and refinement templates.
    pub fn with_prompts(mut self, generate: &str, refine: &str) -> Self {
        self.prompts = Some((generate.to_string(), refine.to_string()));
        self
    }

    /// Make every model call fail with `message`.
    pub fn with_failing_provider(mut self, message: &str) -> Self {
        self.provider_failure = Some(message.to_string());
        self
    }

    /// Make every persistence write fail with `message`.
    pub fn with_failing_storage(mut self, message: &str) -> Self {
        self.storage_failure = Some(message.to_string());
        self
    }

    /// Build the test harness.
    pub async fn build(self) -> Result<TestHarness, QuillError> {
        let prompts = match &self.prompts {
            Some((generate, refine)) => PromptSet::from_sources(generate, refine)?,
            None => PromptSet::builtin()?,
        };

        let mock_provider = Arc::new(MockProvider::with_responses(self.responses));
        if self.provider_failure.is_some() {
            mock_provider.set_failure(self.provider_failure).await;
        }

        let mock_storage = Arc::new(MockStorage::new());
        if self.storage_failure.is_some() {
            mock_storage.set_failure(self.storage_failure).await;
        }

        let controller = WorkflowController::new(
            mock_provider.clone(),
            mock_storage.clone(),
            Arc::new(prompts),
            self.workflow.clone(),
        );

        let config = QuillConfig {
            workflow: self.workflow,
            ..QuillConfig::default()
        };

        Ok(TestHarness {
            mock_provider,
            mock_storage,
            controller,
            config,
        })
    }
}

/// A complete workflow wired to mock adapters.
pub struct TestHarness {
    /// The mock model provider.
    pub mock_provider: Arc<MockProvider>,
    /// The mock persistence store.
    pub mock_storage: Arc<MockStorage>,
    /// Controller under test.
    pub controller: WorkflowController,
    /// Configuration matching the harness setup.
    pub config: QuillConfig,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Runs the generation step.
    pub async fn start(&self, params: &DraftParams) -> Result<DraftRecord, QuillError> {
        self.controller.start(params).await
    }

    /// Runs the refinement step.
    pub async fn continue_draft(&self, record: &DraftRecord) -> Result<DraftRecord, QuillError> {
        self.controller.continue_draft(record).await
    }

    /// Add a response to the mock provider's queue.
    pub async fn add_provider_response(&self, text: String) {
        self.mock_provider.add_response(text).await;
    }
}

/// The "Self Belief" input used throughout the workflow tests.
pub fn self_belief_params() -> DraftParams {
    DraftParams {
        identifier: Some(DraftId::Number(123)),
        created_date: "2025-07-06".to_string(),
        created_time: "14:30:00".to_string(),
        topic: "Self Belief".to_string(),
        context: "Why believing in yourself matters".to_string(),
        tone: "Encouraging".to_string(),
        call_to_action: "Share your story below".to_string(),
    }
}
