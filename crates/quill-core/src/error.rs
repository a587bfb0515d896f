// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Quill drafting workflow.

use thiserror::Error;

/// The primary error type used across the workflow steps and adapter traits.
///
/// None of these are recovered inside the core: every variant surfaces to the
/// boundary as a failed response.
#[derive(Debug, Error)]
pub enum QuillError {
    /// Missing or malformed input fields, or a record in a state that cannot
    /// accept the requested transition.
    #[error("validation error: {0}")]
    Validation(String),

    /// Placeholder/substitution mismatch while rendering a prompt template.
    #[error("template error: {0}")]
    Template(String),

    /// Model provider failure (network, HTTP status, malformed response).
    #[error("generation error: {message}")]
    Generation {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Persistence store rejected or failed the write.
    #[error("persistence error: {message}")]
    Persistence {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors detected while wiring adapters.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl QuillError {
    /// Stable snake_case label for logs and error response bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            QuillError::Validation(_) => "validation",
            QuillError::Template(_) => "template",
            QuillError::Generation { .. } => "generation",
            QuillError::Persistence { .. } => "persistence",
            QuillError::Config(_) => "config",
            QuillError::Internal(_) => "internal",
        }
    }

    /// Shorthand for a generation error without an underlying source.
    pub fn generation(message: impl Into<String>) -> Self {
        QuillError::Generation {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a persistence error without an underlying source.
    pub fn persistence(message: impl Into<String>) -> Self {
        QuillError::Persistence {
            message: message.into(),
            source: None,
        }
    }
}
