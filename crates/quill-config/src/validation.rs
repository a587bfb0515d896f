// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as parseable URLs, positive timeouts, and known log levels.

use reqwest::Url;

use crate::diagnostic::ConfigError;
use crate::model::QuillConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &QuillConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(validation("server.host must not be empty".to_string()));
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(validation(format!(
                "server.host `{host}` is not a valid IP address or hostname"
            )));
        }
    }

    if config.server.port == 0 {
        errors.push(validation("server.port must not be 0".to_string()));
    }

    if !LOG_LEVELS.contains(&config.server.log_level.to_ascii_lowercase().as_str()) {
        errors.push(validation(format!(
            "server.log_level `{}` must be one of: {}",
            config.server.log_level,
            LOG_LEVELS.join(", ")
        )));
    }

    check_url(&mut errors, "openai.base_url", &config.openai.base_url);
    if config.openai.model.trim().is_empty() {
        errors.push(validation("openai.model must not be empty".to_string()));
    }
    if let Some(temperature) = config.openai.temperature
        && !(0.0..=2.0).contains(&temperature)
    {
        errors.push(validation(format!(
            "openai.temperature must be between 0.0 and 2.0, got {temperature}"
        )));
    }
    if config.openai.max_tokens == Some(0) {
        errors.push(validation(
            "openai.max_tokens must be greater than 0".to_string(),
        ));
    }
    if config.openai.timeout_secs == 0 {
        errors.push(validation(
            "openai.timeout_secs must be greater than 0".to_string(),
        ));
    }

    if let Some(url) = &config.supabase.url {
        check_url(&mut errors, "supabase.url", url);
    }
    if config.supabase.table.trim().is_empty() {
        errors.push(validation("supabase.table must not be empty".to_string()));
    }
    if config.supabase.timeout_secs == 0 {
        errors.push(validation(
            "supabase.timeout_secs must be greater than 0".to_string(),
        ));
    }

    for (key, path) in [
        ("prompts.generate_file", &config.prompts.generate_file),
        ("prompts.refine_file", &config.prompts.refine_file),
    ] {
        let Some(path) = path else { continue };
        if path.trim().is_empty() {
            errors.push(validation(format!("{key} must not be empty when set")));
        } else if !std::path::Path::new(path).is_file() {
            errors.push(validation(format!("{key} `{path}` does not exist")));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validation(message: String) -> ConfigError {
    ConfigError::Validation { message }
}

fn check_url(errors: &mut Vec<ConfigError>, key: &str, value: &str) {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(validation(format!(
            "{key} must use http or https, got `{}`",
            url.scheme()
        ))),
        Err(e) => errors.push(validation(format!("{key} `{value}` is not a valid URL: {e}"))),
    }
}
