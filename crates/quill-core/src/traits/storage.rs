// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for the append-only draft store.

use async_trait::async_trait;

use crate::error::QuillError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{PersistReceipt, PersistRecord};

/// Appends approved drafts to an external store.
///
/// There is no deduplication: every call is a new write. Implementations map
/// failures to [`QuillError::Persistence`].
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Appends one record and returns the store's confirmation.
    async fn append(&self, record: &PersistRecord) -> Result<PersistReceipt, QuillError>;
}
