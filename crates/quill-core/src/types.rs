// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The draft record and the message types that flow through the workflow.
//!
//! The record is the only unit of state: the boundary holds no session, so
//! callers echo the whole record back on every call. Field names follow the
//! current wire format; the legacy names (`id`, `date`, `time`, `cta`,
//! `output_post`, `messages`) are accepted on input only and never serialized.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

/// Template placeholder names, in the order the prompts reference them.
pub const TEMPLATE_KEYS: [&str; 4] = ["topic", "context", "tone", "cta"];

/// Opaque caller-assigned identifier. Echoed back in the shape it arrived in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DraftId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for DraftId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DraftId::Number(n) => write!(f, "{n}"),
            DraftId::Text(s) => f.write_str(s),
        }
    }
}

/// Speaker of a message in the conversation history.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    /// Instruction context rendered from the refinement template.
    System,
    /// Feedback supplied by the person reviewing the draft.
    #[serde(alias = "user")]
    Human,
    /// Text produced by the model (or the seeded draft).
    #[serde(alias = "ai")]
    Assistant,
}

/// A single role-tagged message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    #[serde(default)]
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn human(content: impl Into<String>) -> Self {
        Self {
            role: Role::Human,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Descriptive status carried on the record.
///
/// Not used as a transition guard; see [`DraftState`] for that.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DraftStatus {
    #[default]
    New,
    AwaitingFeedback,
    Queued,
}

impl<'de> Deserialize<'de> for DraftStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.trim().parse().map_err(|_| {
            serde::de::Error::unknown_variant(&raw, &["new", "awaiting_feedback", "queued"])
        })
    }
}

/// Explicit lifecycle state, derived from the record rather than stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum DraftState {
    /// No draft text yet; only generation is meaningful.
    Draft,
    /// Draft text exists and the record is open for feedback.
    AwaitingFeedback,
    /// Terminal: every further refinement call persists instead of refining.
    Approved,
}

/// Input parameters for the generation step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftParams {
    #[serde(default, alias = "id")]
    pub identifier: Option<DraftId>,
    #[serde(default, alias = "date", deserialize_with = "null_as_default")]
    pub created_date: String,
    #[serde(default, alias = "time", deserialize_with = "null_as_default")]
    pub created_time: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub topic: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub context: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tone: String,
    #[serde(default, alias = "cta", deserialize_with = "null_as_default")]
    pub call_to_action: String,
}

impl DraftParams {
    /// Substitutions for the prompt templates, keyed by [`TEMPLATE_KEYS`].
    pub fn template_vars(&self) -> BTreeMap<&'static str, &str> {
        BTreeMap::from([
            ("topic", self.topic.as_str()),
            ("context", self.context.as_str()),
            ("tone", self.tone.as_str()),
            ("cta", self.call_to_action.as_str()),
        ])
    }

    /// Names of required content fields that are empty or whitespace-only.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("topic", &self.topic),
            ("context", &self.context),
            ("tone", &self.tone),
            ("call_to_action", &self.call_to_action),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// The unit of state passed across every boundary call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftRecord {
    #[serde(default, alias = "id")]
    pub identifier: Option<DraftId>,
    #[serde(default, alias = "date", deserialize_with = "null_as_default")]
    pub created_date: String,
    #[serde(default, alias = "time", deserialize_with = "null_as_default")]
    pub created_time: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub topic: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub context: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tone: String,
    #[serde(default, alias = "cta", deserialize_with = "null_as_default")]
    pub call_to_action: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: DraftStatus,
    #[serde(default, alias = "output_post")]
    pub output_text: Option<String>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub approved: bool,
    #[serde(default, alias = "messages", deserialize_with = "null_as_default")]
    pub conversation_history: Vec<ChatMessage>,
    /// Number of successful refinement calls applied to this record.
    #[serde(default, deserialize_with = "null_as_default")]
    pub revision: u64,
}

impl DraftRecord {
    /// Build a fresh record from generation inputs.
    pub fn from_params(params: DraftParams) -> Self {
        Self {
            identifier: params.identifier,
            created_date: params.created_date,
            created_time: params.created_time,
            topic: params.topic,
            context: params.context,
            tone: params.tone,
            call_to_action: params.call_to_action,
            ..Self::default()
        }
    }

    /// The immutable input parameters of this record.
    pub fn params(&self) -> DraftParams {
        DraftParams {
            identifier: self.identifier.clone(),
            created_date: self.created_date.clone(),
            created_time: self.created_time.clone(),
            topic: self.topic.clone(),
            context: self.context.clone(),
            tone: self.tone.clone(),
            call_to_action: self.call_to_action.clone(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DraftState {
        if self.approved {
            DraftState::Approved
        } else if self.draft_text().is_empty() {
            DraftState::Draft
        } else {
            DraftState::AwaitingFeedback
        }
    }

    /// Current draft text, empty when not yet generated.
    pub fn draft_text(&self) -> &str {
        self.output_text.as_deref().unwrap_or("")
    }

    /// Latest feedback text, empty when absent.
    pub fn feedback_text(&self) -> &str {
        self.feedback.as_deref().unwrap_or("")
    }

    /// Identifier rendered for log fields.
    pub fn log_id(&self) -> String {
        self.identifier
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "-".to_string())
    }
}

/// Payload written to the persistence store when a draft is approved.
///
/// Field names are the column names of the scheduled-posts table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistRecord {
    pub date: String,
    pub time: String,
    pub topic: String,
    pub context: String,
    pub tone: String,
    pub cta: String,
    pub post: String,
    pub status: DraftStatus,
}

impl PersistRecord {
    /// Build the payload from whatever the record currently holds.
    pub fn from_record(record: &DraftRecord) -> Self {
        Self {
            date: record.created_date.clone(),
            time: record.created_time.clone(),
            topic: record.topic.clone(),
            context: record.context.clone(),
            tone: record.tone.clone(),
            cta: record.call_to_action.clone(),
            post: record.draft_text().to_string(),
            status: record.status,
        }
    }
}

/// Confirmation returned by a storage adapter after an append.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistReceipt {
    /// HTTP (or backend-specific) status code of the write.
    pub status: u16,
    /// Rows echoed back by the store, if it returns any.
    pub rows: serde_json::Value,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Storage,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
