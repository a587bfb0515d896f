// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock storage adapter that records appends in memory.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use quill_core::QuillError;
use quill_core::traits::adapter::PluginAdapter;
use quill_core::traits::storage::StorageAdapter;
use quill_core::types::{AdapterType, HealthStatus, PersistReceipt, PersistRecord};

/// Records every appended row. Optionally fails every write.
pub struct MockStorage {
    rows: Arc<Mutex<Vec<PersistRecord>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a store whose every append fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Arc::new(Mutex::new(Some(message.into()))),
            ..Self::new()
        }
    }

    /// Make subsequent appends fail (`Some`) or succeed again (`None`).
    pub async fn set_failure(&self, message: Option<String>) {
        *self.failure.lock().await = message;
    }

    /// Rows appended so far, oldest first. Failed appends are not included.
    pub async fn appended(&self) -> Vec<PersistRecord> {
        self.rows.lock().await.clone()
    }

    pub async fn append_count(&self) -> usize {
        self.rows.lock().await.len()
    }
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockStorage {
    fn name(&self) -> &str {
        "mock-storage"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, QuillError> {
        match self.failure.lock().await.as_ref() {
            Some(message) => Ok(HealthStatus::Degraded(message.clone())),
            None => Ok(HealthStatus::Healthy),
        }
    }

    async fn shutdown(&self) -> Result<(), QuillError> {
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for MockStorage {
    async fn append(&self, record: &PersistRecord) -> Result<PersistReceipt, QuillError> {
        if let Some(message) = self.failure.lock().await.clone() {
            return Err(QuillError::persistence(message));
        }
        let mut rows = self.rows.lock().await;
        rows.push(record.clone());
        Ok(PersistReceipt {
            status: 201,
            rows: serde_json::json!([{ "id": rows.len() }]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::DraftRecord;

    #[tokio::test]
    async fn appends_are_recorded_in_order() {
        let storage = MockStorage::new();
        let mut record = DraftRecord::default();
        record.topic = "one".into();
        storage.append(&PersistRecord::from_record(&record)).await.unwrap();
        record.topic = "two".into();
        let receipt = storage.append(&PersistRecord::from_record(&record)).await.unwrap();

        assert_eq!(receipt.status, 201);
        let rows = storage.appended().await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].topic, "two");
    }

    #[tokio::test]
    async fn failing_store_records_nothing() {
        let storage = MockStorage::failing("offline");
        let record = PersistRecord::from_record(&DraftRecord::default());
        let err = storage.append(&record).await.unwrap_err();
        assert_eq!(err.kind(), "persistence");
        assert_eq!(storage.append_count().await, 0);
        assert!(matches!(
            storage.health_check().await.unwrap(),
            HealthStatus::Degraded(_)
        ));
    }
}
