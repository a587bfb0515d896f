// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Supabase implementation of the StorageAdapter trait.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use quill_config::model::SupabaseConfig;
use quill_core::types::{PersistReceipt, PersistRecord};
use quill_core::{AdapterType, HealthStatus, PluginAdapter, QuillError, StorageAdapter};

use crate::client::PostgrestClient;

/// Append-only storage backed by a Supabase table.
pub struct SupabaseStorage {
    client: PostgrestClient,
    table: String,
}

impl SupabaseStorage {
    /// Create a storage adapter from the `[supabase]` configuration section.
    ///
    /// URL and key fall back to `SUPABASE_URL` / `SUPABASE_KEY`.
    pub fn new(config: &SupabaseConfig) -> Result<Self, QuillError> {
        let url = resolve(&config.url, "SUPABASE_URL", "supabase.url")?;
        let api_key = resolve(&config.api_key, "SUPABASE_KEY", "supabase.api_key")?;
        let client = PostgrestClient::new(
            &url,
            &api_key,
            &config.table,
            Duration::from_secs(config.timeout_secs),
        )?;

        info!(table = config.table, url = %url, "Supabase storage initialized");

        Ok(Self {
            client,
            table: config.table.clone(),
        })
    }

    /// Name of the table records are appended to.
    pub fn table(&self) -> &str {
        &self.table
    }
}

#[async_trait]
impl PluginAdapter for SupabaseStorage {
    fn name(&self) -> &str {
        "supabase"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, QuillError> {
        match self.client.check_table().await {
            Ok(()) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Degraded(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), QuillError> {
        debug!("Supabase storage shutting down");
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SupabaseStorage {
    async fn append(&self, record: &PersistRecord) -> Result<PersistReceipt, QuillError> {
        let receipt = self.client.insert(record).await?;
        debug!(
            table = self.table,
            status = receipt.status,
            "row appended"
        );
        Ok(receipt)
    }
}

/// Resolves a setting from config or environment.
fn resolve(config_value: &Option<String>, env_var: &str, key: &str) -> Result<String, QuillError> {
    if let Some(value) = config_value
        && !value.is_empty()
    {
        return Ok(value.clone());
    }

    std::env::var(env_var)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            QuillError::Config(format!(
                "Supabase setting not found. Set {key} in config or {env_var} environment variable."
            ))
        })
}
