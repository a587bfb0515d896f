// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Quill.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Quill configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QuillConfig {
    /// HTTP boundary settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Model provider settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Persistence store settings.
    #[serde(default)]
    pub supabase: SupabaseConfig,

    /// Prompt template file locations.
    #[serde(default)]
    pub prompts: PromptsConfig,

    /// Refinement loop policy switches.
    #[serde(default)]
    pub workflow: WorkflowConfig,
}

impl QuillConfig {
    /// Returns a copy with every secret replaced by a marker, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.openai.api_key.is_some() {
            copy.openai.api_key = Some("[redacted]".to_string());
        }
        if copy.supabase.api_key.is_some() {
            copy.supabase.api_key = Some("[redacted]".to_string());
        }
        copy
    }
}

/// HTTP boundary configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Allow requests from any origin.
    #[serde(default = "default_true")]
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            cors_permissive: true,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

/// OpenAI-compatible chat completions configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// API key. `None` falls back to the `OPENAI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the API, without the `/chat/completions` suffix.
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature. `None` leaves the provider default.
    #[serde(default)]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate. `None` leaves the provider default.
    #[serde(default)]
    pub max_tokens: Option<u32>,

    /// Request timeout in seconds.
    #[serde(default = "default_openai_timeout")]
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_openai_base_url(),
            model: default_model(),
            temperature: None,
            max_tokens: None,
            timeout_secs: default_openai_timeout(),
        }
    }
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_openai_timeout() -> u64 {
    120
}

/// Supabase (PostgREST) persistence configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SupabaseConfig {
    /// Project URL. `None` falls back to the `SUPABASE_URL` environment variable.
    #[serde(default)]
    pub url: Option<String>,

    /// Service key. `None` falls back to the `SUPABASE_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Table approved drafts are appended to.
    #[serde(default = "default_table")]
    pub table: String,

    /// Request timeout in seconds.
    #[serde(default = "default_supabase_timeout")]
    pub timeout_secs: u64,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            table: default_table(),
            timeout_secs: default_supabase_timeout(),
        }
    }
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("table", &self.table)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_table() -> String {
    "scheduled-posts".to_string()
}

fn default_supabase_timeout() -> u64 {
    30
}

/// Prompt template locations. Unset paths use the built-in templates.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PromptsConfig {
    /// Template used by the generation step.
    #[serde(default)]
    pub generate_file: Option<String>,

    /// Template used to seed the refinement conversation.
    #[serde(default)]
    pub refine_file: Option<String>,
}

/// Policy switches for edge cases of the refinement loop.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WorkflowConfig {
    /// Reject refinement calls whose feedback is empty instead of sending an
    /// empty human message.
    #[serde(default)]
    pub reject_empty_feedback: bool,

    /// Reject approval of a record that has no draft text instead of
    /// persisting an empty post.
    #[serde(default)]
    pub require_output_on_approve: bool,
}
