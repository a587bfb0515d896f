// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Minimal PostgREST client: insert one row, check one table.

use std::time::Duration;

use quill_core::QuillError;
use quill_core::types::{PersistReceipt, PersistRecord};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::debug;

/// HTTP client bound to a single PostgREST table.
#[derive(Debug, Clone)]
pub struct PostgrestClient {
    client: reqwest::Client,
    table_url: String,
}

impl PostgrestClient {
    /// Creates a client for `<base_url>/rest/v1/<table>`.
    ///
    /// The service key is sent both as `apikey` and as a bearer token, which
    /// is what Supabase expects for server-side access.
    pub fn new(
        base_url: &str,
        api_key: &str,
        table: &str,
        timeout: Duration,
    ) -> Result<Self, QuillError> {
        let mut headers = HeaderMap::new();
        let mut apikey = HeaderValue::from_str(api_key)
            .map_err(|e| QuillError::Config(format!("invalid Supabase key header value: {e}")))?;
        apikey.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| QuillError::Config(format!("invalid Supabase key header value: {e}")))?;
        bearer.set_sensitive(true);
        headers.insert("apikey", apikey);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| QuillError::Persistence {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            table_url: format!("{}/rest/v1/{table}", base_url.trim_end_matches('/')),
        })
    }

    /// Full URL of the bound table.
    pub fn table_url(&self) -> &str {
        &self.table_url
    }

    /// Inserts one row, asking the store to echo it back.
    pub async fn insert(&self, record: &PersistRecord) -> Result<PersistReceipt, QuillError> {
        let response = self
            .client
            .post(&self.table_url)
            .header("Prefer", "return=representation")
            .json(record)
            .send()
            .await
            .map_err(|e| QuillError::Persistence {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, "insert response received");

        let body = response.text().await.map_err(|e| QuillError::Persistence {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            return Err(QuillError::persistence(format!(
                "store returned {status}: {}",
                error_message(&body)
            )));
        }

        let rows = if body.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body))
        };

        Ok(PersistReceipt {
            status: status.as_u16(),
            rows,
        })
    }

    /// Reads zero rows from the table to confirm reachability and credentials.
    pub async fn check_table(&self) -> Result<(), QuillError> {
        let response = self
            .client
            .get(&self.table_url)
            .query(&[("select", "*"), ("limit", "0")])
            .send()
            .await
            .map_err(|e| QuillError::Persistence {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(QuillError::persistence(format!(
                "store returned {status}: {}",
                error_message(&body)
            )))
        }
    }
}

/// PostgREST error bodies carry a `message` field; fall back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("message")?.as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_url_is_built_from_base() {
        let client = PostgrestClient::new(
            "https://project.supabase.co/",
            "key",
            "scheduled-posts",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            client.table_url(),
            "https://project.supabase.co/rest/v1/scheduled-posts"
        );
    }

    #[test]
    fn error_message_prefers_postgrest_message() {
        let body = r#"{"code":"42P01","message":"relation does not exist"}"#;
        assert_eq!(error_message(body), "relation does not exist");
        assert_eq!(error_message("plain text"), "plain text");
    }

    #[test]
    fn key_with_newline_is_rejected() {
        let err = PostgrestClient::new("http://x", "bad\nkey", "t", Duration::from_secs(1))
            .unwrap_err();
        assert_eq!(err.kind(), "config");
    }
}
