// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transition rules of the draft lifecycle.
//!
//! The lifecycle is `Draft -> AwaitingFeedback -> (refine)* -> Approved`,
//! derived from the record by [`DraftRecord::state`]. This module decides
//! which action a refinement call performs, and rejects calls that the
//! current state cannot accept, before any external call is made.

use quill_config::model::WorkflowConfig;
use quill_core::{ChatMessage, DraftRecord, DraftState, QuillError, Role};

/// What a refinement call will do for a given record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Append the record to the store. No model call.
    Persist,
    /// Fold feedback into the conversation and ask the model for a revision.
    /// `seed` is true when the conversation must first be initialized.
    Refine { seed: bool },
}

/// Decides the action for `record`, or rejects it.
pub fn next_action(record: &DraftRecord, policy: &WorkflowConfig) -> Result<Action, QuillError> {
    match record.state() {
        DraftState::Approved => {
            if policy.require_output_on_approve && record.draft_text().is_empty() {
                return Err(QuillError::Validation(
                    "approved record has no output_text to persist".to_string(),
                ));
            }
            Ok(Action::Persist)
        }
        DraftState::Draft => Err(QuillError::Validation(
            "record has no output_text; generate a draft before sending feedback".to_string(),
        )),
        DraftState::AwaitingFeedback => {
            let missing = record.params().missing_fields();
            if !missing.is_empty() {
                return Err(QuillError::Validation(format!(
                    "missing required fields: {}",
                    missing.join(", ")
                )));
            }
            if policy.reject_empty_feedback && record.feedback_text().trim().is_empty() {
                return Err(QuillError::Validation(
                    "feedback is required to refine a draft".to_string(),
                ));
            }
            check_history(&record.conversation_history)?;
            Ok(Action::Refine {
                seed: record.conversation_history.is_empty(),
            })
        }
    }
}

/// An initialized conversation starts with exactly one system message
/// followed by the assistant seed.
pub fn check_history(history: &[ChatMessage]) -> Result<(), QuillError> {
    if history.is_empty() {
        return Ok(());
    }

    let starts_correctly = history.len() >= 2
        && history[0].role == Role::System
        && history[1].role == Role::Assistant;
    if !starts_correctly {
        return Err(QuillError::Validation(
            "conversation_history must start with a system message followed by an assistant message"
                .to_string(),
        ));
    }

    if history[1..].iter().any(|m| m.role == Role::System) {
        return Err(QuillError::Validation(
            "conversation_history may contain only one system message".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn awaiting() -> DraftRecord {
        DraftRecord {
            topic: "Self Belief".into(),
            context: "Why believing in yourself matters".into(),
            tone: "Encouraging".into(),
            call_to_action: "Share your story below".into(),
            output_text: Some("draft".into()),
            feedback: Some("shorter".into()),
            ..DraftRecord::default()
        }
    }

    #[test]
    fn approved_persists_even_without_output() {
        let record = DraftRecord {
            approved: true,
            ..DraftRecord::default()
        };
        assert_eq!(
            next_action(&record, &WorkflowConfig::default()).unwrap(),
            Action::Persist
        );
    }

    #[test]
    fn approved_without_output_rejected_when_required() {
        let record = DraftRecord {
            approved: true,
            ..DraftRecord::default()
        };
        let policy = WorkflowConfig {
            require_output_on_approve: true,
            ..WorkflowConfig::default()
        };
        assert_eq!(next_action(&record, &policy).unwrap_err().kind(), "validation");
    }

    #[test]
    fn ungenerated_draft_cannot_be_refined() {
        let record = DraftRecord {
            feedback: Some("anything".into()),
            ..DraftRecord::default()
        };
        let err = next_action(&record, &WorkflowConfig::default()).unwrap_err();
        assert_eq!(err.kind(), "validation");
        assert!(err.to_string().contains("output_text"));
    }

    #[test]
    fn first_refinement_seeds_history() {
        assert_eq!(
            next_action(&awaiting(), &WorkflowConfig::default()).unwrap(),
            Action::Refine { seed: true }
        );
    }

    #[test]
    fn later_refinement_does_not_reseed() {
        let record = DraftRecord {
            conversation_history: vec![
                ChatMessage::system("instructions"),
                ChatMessage::assistant("draft"),
                ChatMessage::human("shorter"),
                ChatMessage::assistant("short draft"),
            ],
            ..awaiting()
        };
        assert_eq!(
            next_action(&record, &WorkflowConfig::default()).unwrap(),
            Action::Refine { seed: false }
        );
    }

    #[test]
    fn empty_feedback_allowed_by_default() {
        let record = DraftRecord {
            feedback: None,
            ..awaiting()
        };
        assert!(next_action(&record, &WorkflowConfig::default()).is_ok());
    }

    #[test]
    fn empty_feedback_rejected_when_configured() {
        let record = DraftRecord {
            feedback: Some("   ".into()),
            ..awaiting()
        };
        let policy = WorkflowConfig {
            reject_empty_feedback: true,
            ..WorkflowConfig::default()
        };
        assert_eq!(next_action(&record, &policy).unwrap_err().kind(), "validation");
    }

    #[test]
    fn history_must_open_with_system_then_assistant() {
        assert!(check_history(&[ChatMessage::human("hi")]).is_err());
        assert!(check_history(&[ChatMessage::system("s")]).is_err());
        assert!(
            check_history(&[ChatMessage::system("s"), ChatMessage::human("h")]).is_err()
        );
        assert!(
            check_history(&[ChatMessage::system("s"), ChatMessage::assistant("a")]).is_ok()
        );
    }

    #[test]
    fn second_system_message_rejected() {
        let history = [
            ChatMessage::system("s"),
            ChatMessage::assistant("a"),
            ChatMessage::system("again"),
        ];
        assert!(check_history(&history).is_err());
    }

    #[test]
    fn refinement_requires_input_parameters() {
        let record = DraftRecord {
            topic: String::new(),
            tone: "  ".into(),
            ..awaiting()
        };
        let err = next_action(&record, &WorkflowConfig::default()).unwrap_err();
        assert_eq!(err.kind(), "validation");
        assert!(err.to_string().contains("missing required fields: topic, tone"));
    }
}
