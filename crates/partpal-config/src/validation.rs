// SPDX-FileCopyrightText: 2026 Partpal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as call timeout bounds, result limits and base URL schemes.

use crate::diagnostic::ConfigError;
use crate::model::PartpalConfig;

/// Accepted values for `session.log_level`.
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Upper bound for `session.call_timeout_secs`.
const MAX_CALL_TIMEOUT_SECS: u64 = 300;

/// Upper bound for `session.history_exchanges`.
const MAX_HISTORY_EXCHANGES: usize = 50;

/// Upper bound for `mouser.max_results`.
const MAX_CATALOG_RESULTS: usize = 50;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &PartpalConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.session.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "session.log_level `{}` is not one of: {}",
                config.session.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    let timeout = config.session.call_timeout_secs;
    if timeout == 0 || timeout > MAX_CALL_TIMEOUT_SECS {
        errors.push(ConfigError::Validation {
            message: format!(
                "session.call_timeout_secs must be between 1 and {MAX_CALL_TIMEOUT_SECS}, got {timeout}"
            ),
        });
    }

    let history = config.session.history_exchanges;
    if history > MAX_HISTORY_EXCHANGES {
        errors.push(ConfigError::Validation {
            message: format!(
                "session.history_exchanges must be at most {MAX_HISTORY_EXCHANGES}, got {history}"
            ),
        });
    }

    if config.session.vision_prompt.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "session.vision_prompt must not be empty".to_string(),
        });
    }

    if config.session.audio_dir.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "session.audio_dir must not be empty".to_string(),
        });
    }

    if config.gemini.model.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "gemini.model must not be empty".to_string(),
        });
    }

    let max_results = config.mouser.max_results;
    if max_results == 0 || max_results > MAX_CATALOG_RESULTS {
        errors.push(ConfigError::Validation {
            message: format!(
                "mouser.max_results must be between 1 and {MAX_CATALOG_RESULTS}, got {max_results}"
            ),
        });
    }

    if config.elevenlabs.voice_id.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "elevenlabs.voice_id must not be empty".to_string(),
        });
    }

    if config.elevenlabs.model_id.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "elevenlabs.model_id must not be empty".to_string(),
        });
    }

    for (key, url) in [
        ("gemini.base_url", &config.gemini.base_url),
        ("mouser.base_url", &config.mouser.base_url),
        ("elevenlabs.base_url", &config.elevenlabs.base_url),
    ] {
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            errors.push(ConfigError::Validation {
                message: format!("{key} `{url}` must be an http:// or https:// URL"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
