// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Quill configuration system.

use std::io::Write;

use quill_config::diagnostic::ConfigError;
use quill_config::model::QuillConfig;
use quill_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_quill_config() {
    let toml = r#"
[server]
host = "0.0.0.0"
port = 9000
log_level = "debug"
cors_permissive = false

[openai]
api_key = "sk-test"
base_url = "http://localhost:4000/v1"
model = "gpt-4o"
temperature = 0.7
max_tokens = 512
timeout_secs = 60

[supabase]
url = "https://project.supabase.co"
api_key = "service-key"
table = "posts"
timeout_secs = 10

[prompts]
generate_file = "prompts/generate.txt"
refine_file = "prompts/refine.txt"

[workflow]
reject_empty_feedback = true
require_output_on_approve = true
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.server.log_level, "debug");
    assert!(!config.server.cors_permissive);
    assert_eq!(config.openai.api_key.as_deref(), Some("sk-test"));
    assert_eq!(config.openai.base_url, "http://localhost:4000/v1");
    assert_eq!(config.openai.model, "gpt-4o");
    assert_eq!(config.openai.temperature, Some(0.7));
    assert_eq!(config.openai.max_tokens, Some(512));
    assert_eq!(config.openai.timeout_secs, 60);
    assert_eq!(
        config.supabase.url.as_deref(),
        Some("https://project.supabase.co")
    );
    assert_eq!(config.supabase.table, "posts");
    assert_eq!(config.supabase.timeout_secs, 10);
    assert_eq!(
        config.prompts.generate_file.as_deref(),
        Some("prompts/generate.txt")
    );
    assert!(config.workflow.reject_empty_feedback);
    assert!(config.workflow.require_output_on_approve);
}

/// Unknown field in [server] produces an error naming the key.
#[test]
fn unknown_field_in_server_produces_error() {
    let toml = r#"
[server]
prot = 9000
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("prot"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Unknown keys become diagnostics with a typo suggestion.
#[test]
fn unknown_key_diagnostic_suggests_correction() {
    let toml = r#"
[openai]
api_kye = "sk"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "api_kye");
            assert_eq!(suggestion.as_deref(), Some("api_key"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

/// Wrong value types are reported with the dotted key path.
#[test]
fn invalid_type_reports_key_path() {
    let toml = r#"
[server]
port = "eighty"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject wrong type");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key == "server.port")),
        "got: {errors:?}"
    );
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.server.log_level, "info");
    assert!(config.server.cors_permissive);
    assert!(config.openai.api_key.is_none());
    assert_eq!(config.openai.base_url, "https://api.openai.com/v1");
    assert_eq!(config.openai.model, "gpt-4o-mini");
    assert_eq!(config.openai.timeout_secs, 120);
    assert!(config.supabase.url.is_none());
    assert_eq!(config.supabase.table, "scheduled-posts");
    assert_eq!(config.supabase.timeout_secs, 30);
    assert!(config.prompts.generate_file.is_none());
    assert!(!config.workflow.reject_empty_feedback);
    assert!(!config.workflow.require_output_on_approve);
}

/// Dotted keys (as produced by the QUILL_ env mapping) override TOML values.
#[test]
fn dotted_override_beats_toml() {
    use figment::{
        Figment,
        providers::{Format, Serialized, Toml},
    };

    let toml_content = r#"
[openai]
model = "from-toml"
"#;

    let config: QuillConfig = Figment::new()
        .merge(Serialized::defaults(QuillConfig::default()))
        .merge(Toml::string(toml_content))
        .merge(("openai.model", "from-env"))
        .merge(("openai.api_key", "sk-env"))
        .extract()
        .expect("should merge env override");

    assert_eq!(config.openai.model, "from-env");
    assert_eq!(config.openai.api_key.as_deref(), Some("sk-env"));
}

/// Semantic validation collects every violation.
#[test]
fn validation_errors_are_collected() {
    let toml = r#"
[server]
log_level = "loud"

[openai]
timeout_secs = 0
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert_eq!(errors.len(), 2, "got: {errors:?}");
    assert!(
        errors
            .iter()
            .all(|e| matches!(e, ConfigError::Validation { .. }))
    );
}

/// An explicit config file path is read and validated.
#[test]
fn explicit_path_is_loaded() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "[server]\nport = 8123").expect("write config");

    let config = load_and_validate_path(file.path()).expect("file should load");
    assert_eq!(config.server.port, 8123);
}

/// A missing explicit config file is an error rather than silently skipped.
#[test]
fn explicit_missing_path_is_error() {
    let errors = load_and_validate_path(std::path::Path::new("/nonexistent/quill.toml"))
        .expect_err("missing file must fail");
    assert!(matches!(errors[0], ConfigError::Other(_)));
}

/// Debug output and the redacted view never show secrets.
#[test]
fn secrets_are_redacted() {
    let toml = r#"
[openai]
api_key = "sk-very-secret"

[supabase]
api_key = "service-very-secret"
"#;

    let config = load_config_from_str(toml).expect("valid");
    let debug = format!("{config:?}");
    assert!(!debug.contains("very-secret"));

    let shown = toml::to_string(&config.redacted()).expect("serialize");
    assert!(!shown.contains("very-secret"));
    assert!(shown.contains("[redacted]"));
}
