// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Refinement step: persists an approved draft, or folds feedback into the
//! conversation and asks the model for a revision.
//!
//! A call makes at most one external call: one append or one model
//! invocation, never both. The caller's record is never mutated; a new
//! record is built and returned only after the external call succeeds.

use std::sync::Arc;
use std::time::Instant;

use quill_config::model::WorkflowConfig;
use quill_core::{
    ChatMessage, DraftRecord, PersistRecord, PluginAdapter, ProviderAdapter, QuillError,
    StorageAdapter,
};
use quill_prompt::PromptSet;
use tracing::{info, warn};

use crate::state::{self, Action};

/// Runs one refinement (or persistence) transition.
#[derive(Clone)]
pub struct RefinementStep {
    provider: Arc<dyn ProviderAdapter + Send + Sync>,
    storage: Arc<dyn StorageAdapter + Send + Sync>,
    prompts: Arc<PromptSet>,
    policy: WorkflowConfig,
}

impl RefinementStep {
    pub fn new(
        provider: Arc<dyn ProviderAdapter + Send + Sync>,
        storage: Arc<dyn StorageAdapter + Send + Sync>,
        prompts: Arc<PromptSet>,
        policy: WorkflowConfig,
    ) -> Self {
        Self {
            provider,
            storage,
            prompts,
            policy,
        }
    }

    /// Applies the transition selected by [`state::next_action`].
    pub async fn run(&self, record: &DraftRecord) -> Result<DraftRecord, QuillError> {
        match state::next_action(record, &self.policy)? {
            Action::Persist => self.persist(record).await,
            Action::Refine { seed } => self.refine(record, seed).await,
        }
    }

    async fn persist(&self, record: &DraftRecord) -> Result<DraftRecord, QuillError> {
        if record.draft_text().is_empty() {
            warn!(id = %record.log_id(), "persisting approved record with empty output_text");
        }

        let payload = PersistRecord::from_record(record);
        let receipt = self.storage.append(&payload).await.inspect_err(|e| {
            warn!(id = %record.log_id(), error = %e, "persistence write failed");
        })?;

        info!(
            id = %record.log_id(),
            store = self.storage.name(),
            status = receipt.status,
            "approved draft persisted"
        );
        Ok(record.clone())
    }

    async fn refine(&self, record: &DraftRecord, seed: bool) -> Result<DraftRecord, QuillError> {
        let mut history = record.conversation_history.clone();
        if seed {
            let params = record.params();
            let instructions = self.prompts.refine().render(&params.template_vars())?;
            history.push(ChatMessage::system(instructions));
            history.push(ChatMessage::assistant(record.draft_text()));
        }

        let feedback = record.feedback_text();
        if feedback.trim().is_empty() {
            warn!(id = %record.log_id(), "refining with empty feedback");
        }
        history.push(ChatMessage::human(feedback));

        let started = Instant::now();
        let response = self.provider.invoke(&history).await.inspect_err(|e| {
            warn!(id = %record.log_id(), error = %e, "refinement model call failed");
        })?;

        let text = response.trim();
        if text.is_empty() {
            warn!(id = %record.log_id(), "model returned an empty revision");
            return Err(QuillError::generation("model returned an empty revision"));
        }
        history.push(ChatMessage::assistant(text));

        let mut updated = record.clone();
        updated.output_text = Some(text.to_string());
        updated.conversation_history = history;
        updated.revision += 1;

        info!(
            id = %updated.log_id(),
            revision = updated.revision,
            history_len = updated.conversation_history.len(),
            output_len = text.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "draft refined"
        );
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::{DraftStatus, Role};
    use quill_test_utils::{MockProvider, MockStorage};

    fn generated() -> DraftRecord {
        DraftRecord {
            topic: "Self Belief".into(),
            context: "Why believing in yourself matters".into(),
            tone: "Encouraging".into(),
            call_to_action: "Share your story below".into(),
            status: DraftStatus::AwaitingFeedback,
            output_text: Some("Original draft".into()),
            feedback: Some("Make it shorter".into()),
            ..DraftRecord::default()
        }
    }

    fn step(
        provider: Arc<MockProvider>,
        storage: Arc<MockStorage>,
        policy: WorkflowConfig,
    ) -> RefinementStep {
        RefinementStep::new(
            provider,
            storage,
            Arc::new(PromptSet::builtin().unwrap()),
            policy,
        )
    }

    #[tokio::test]
    async fn first_refinement_seeds_and_appends() {
        let provider = Arc::new(MockProvider::with_responses(vec![" Short draft ".into()]));
        let storage = Arc::new(MockStorage::new());
        let step = step(provider.clone(), storage.clone(), WorkflowConfig::default());

        let refined = step.run(&generated()).await.unwrap();

        let roles: Vec<Role> = refined.conversation_history.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::Assistant, Role::Human, Role::Assistant]
        );
        assert_eq!(refined.conversation_history[1].content, "Original draft");
        assert_eq!(refined.conversation_history[2].content, "Make it shorter");
        assert_eq!(refined.conversation_history[3].content, "Short draft");
        assert_eq!(refined.output_text.as_deref(), Some("Short draft"));
        assert_eq!(refined.revision, 1);
        assert_eq!(refined.status, DraftStatus::AwaitingFeedback);

        // The model saw the seeded conversation plus the feedback.
        let calls = provider.invocations().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].len(), 3);
        assert!(calls[0][0].content.contains("Encouraging"));
        assert_eq!(storage.append_count().await, 0);
    }

    #[tokio::test]
    async fn provider_failure_leaves_input_untouched() {
        let provider = Arc::new(MockProvider::failing("timeout"));
        let storage = Arc::new(MockStorage::new());
        let step = step(provider, storage, WorkflowConfig::default());

        let input = generated();
        let before = input.clone();
        let err = step.run(&input).await.unwrap_err();
        assert_eq!(err.kind(), "generation");
        assert_eq!(input, before);
    }

    #[tokio::test]
    async fn approved_record_is_persisted_not_refined() {
        let provider = Arc::new(MockProvider::new());
        let storage = Arc::new(MockStorage::new());
        let step = step(provider.clone(), storage.clone(), WorkflowConfig::default());

        let approved = DraftRecord {
            approved: true,
            status: DraftStatus::Queued,
            ..generated()
        };
        let out = step.run(&approved).await.unwrap();

        assert_eq!(out, approved);
        assert_eq!(provider.invocation_count().await, 0);
        let writes = storage.appended().await;
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].post, "Original draft");
        assert_eq!(writes[0].cta, "Share your story below");
        assert_eq!(writes[0].status, DraftStatus::Queued);
    }

    #[tokio::test]
    async fn storage_failure_is_persistence_error() {
        let provider = Arc::new(MockProvider::new());
        let storage = Arc::new(MockStorage::failing("401 Unauthorized"));
        let step = step(provider, storage, WorkflowConfig::default());

        let approved = DraftRecord {
            approved: true,
            ..generated()
        };
        let err = step.run(&approved).await.unwrap_err();
        assert_eq!(err.kind(), "persistence");
    }

    #[tokio::test]
    async fn empty_feedback_is_sent_as_empty_human_message() {
        let provider = Arc::new(MockProvider::with_responses(vec!["revised".into()]));
        let storage = Arc::new(MockStorage::new());
        let step = step(provider.clone(), storage, WorkflowConfig::default());

        let input = DraftRecord {
            feedback: None,
            ..generated()
        };
        let out = step.run(&input).await.unwrap();
        assert_eq!(out.conversation_history[2].role, Role::Human);
        assert_eq!(out.conversation_history[2].content, "");
    }

    #[tokio::test]
    async fn malformed_history_never_reaches_provider() {
        let provider = Arc::new(MockProvider::new());
        let storage = Arc::new(MockStorage::new());
        let step = step(provider.clone(), storage, WorkflowConfig::default());

        let input = DraftRecord {
            conversation_history: vec![ChatMessage::human("hi")],
            ..generated()
        };
        let err = step.run(&input).await.unwrap_err();
        assert_eq!(err.kind(), "validation");
        assert_eq!(provider.invocation_count().await, 0);
    }
}
