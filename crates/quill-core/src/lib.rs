// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Quill drafting workflow.
//!
//! This crate provides the draft record, the error taxonomy, and the adapter
//! traits for the two external collaborators (model provider and storage).
//! Every other crate in the workspace depends on it.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::QuillError;
pub use types::{
    AdapterType, ChatMessage, DraftId, DraftParams, DraftRecord, DraftState, DraftStatus,
    HealthStatus, PersistReceipt, PersistRecord, Role, TEMPLATE_KEYS,
};

pub use traits::{PluginAdapter, ProviderAdapter, StorageAdapter};
