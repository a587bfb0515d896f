// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt templates for the Quill drafting workflow.
//!
//! A [`PromptSet`] holds the generation template and the refinement template.
//! It is loaded once at startup, from the files named in `[prompts]` or from
//! the built-in defaults, and each template is checked to reference exactly
//! the four draft inputs so mismatches fail before the first request.

pub mod template;

use std::collections::BTreeSet;

use quill_config::model::PromptsConfig;
use quill_core::{QuillError, TEMPLATE_KEYS};
use tracing::info;

pub use template::{Template, render};

/// Built-in generation template.
pub const DEFAULT_GENERATE_PROMPT: &str = include_str!("../prompts/generate.txt");

/// Built-in refinement template.
pub const DEFAULT_REFINE_PROMPT: &str = include_str!("../prompts/refine.txt");

/// The two templates used by the workflow steps.
#[derive(Debug, Clone)]
pub struct PromptSet {
    generate: Template,
    refine: Template,
}

impl PromptSet {
    /// Builds a prompt set from template sources, checking placeholders.
    pub fn from_sources(generate: &str, refine: &str) -> Result<Self, QuillError> {
        let generate = checked(Template::parse("generate", generate)?)?;
        let refine = checked(Template::parse("refine", refine)?)?;
        Ok(Self { generate, refine })
    }

    /// The built-in templates.
    pub fn builtin() -> Result<Self, QuillError> {
        Self::from_sources(DEFAULT_GENERATE_PROMPT, DEFAULT_REFINE_PROMPT)
    }

    /// Loads the templates named in config, falling back to the built-ins
    /// for any path that is unset.
    pub async fn load(config: &PromptsConfig) -> Result<Self, QuillError> {
        let generate = load_source(config.generate_file.as_deref(), DEFAULT_GENERATE_PROMPT).await?;
        let refine = load_source(config.refine_file.as_deref(), DEFAULT_REFINE_PROMPT).await?;
        Self::from_sources(&generate, &refine)
    }

    /// Template rendered as the single system message of a generation call.
    pub fn generate(&self) -> &Template {
        &self.generate
    }

    /// Template rendered as the system message that seeds a refinement
    /// conversation.
    pub fn refine(&self) -> &Template {
        &self.refine
    }
}

async fn load_source(path: Option<&str>, builtin: &str) -> Result<String, QuillError> {
    match path {
        Some(path) => {
            let content = tokio::fs::read_to_string(path).await.map_err(|e| {
                QuillError::Config(format!("failed to read prompt file `{path}`: {e}"))
            })?;
            info!(path, "loaded prompt template from file");
            Ok(content)
        }
        None => Ok(builtin.to_string()),
    }
}

fn checked(template: Template) -> Result<Template, QuillError> {
    let expected: BTreeSet<&str> = TEMPLATE_KEYS.iter().copied().collect();
    let found: BTreeSet<&str> = template.placeholders().iter().map(String::as_str).collect();
    if expected != found {
        let missing: Vec<&str> = expected.difference(&found).copied().collect();
        let extra: Vec<&str> = found.difference(&expected).copied().collect();
        return Err(QuillError::Template(format!(
            "template `{}` must reference exactly {}; missing [{}], unexpected [{}]",
            template.name(),
            TEMPLATE_KEYS.join(", "),
            missing.join(", "),
            extra.join(", ")
        )));
    }
    Ok(template)
}
