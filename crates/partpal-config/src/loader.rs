// SPDX-FileCopyrightText: 2026 Partpal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./partpal.toml` > `~/.config/partpal/partpal.toml` > `/etc/partpal/partpal.toml`
//! with environment variable overrides via `PARTPAL_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::PartpalConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/partpal/partpal.toml";

/// Local configuration file, relative to the working directory.
pub const LOCAL_CONFIG_FILE: &str = "partpal.toml";

/// Path of the per-user config file, if the platform has a config directory.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("partpal").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/partpal/partpal.toml` (system-wide)
/// 3. `~/.config/partpal/partpal.toml` (user XDG config)
/// 4. `./partpal.toml` (local directory)
/// 5. `PARTPAL_*` environment variables
pub fn load_config() -> Result<PartpalConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<PartpalConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PartpalConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PartpalConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PartpalConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(PartpalConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `PARTPAL_SESSION_CALL_TIMEOUT_SECS` must map to
/// `session.call_timeout_secs`, not `session.call.timeout.secs`.
fn env_provider() -> Env {
    Env::prefixed("PARTPAL_").map(|key| {
        // `key` still has its original case here; figment lowercases after
        // mapping. Example: PARTPAL_MOUSER_API_KEY -> "mouser.api_key"
        let key_str = key.as_str().to_ascii_lowercase();
        let mapped = key_str
            .replacen("session_", "session.", 1)
            .replacen("gemini_", "gemini.", 1)
            .replacen("mouser_", "mouser.", 1)
            .replacen("elevenlabs_", "elevenlabs.", 1);
        mapped.into()
    })
}

/// Resolves a credential from config, falling back to a conventional
/// environment variable. Empty values count as absent.
pub fn resolve_credential(config_value: Option<&str>, env_var: &str) -> Option<String> {
    if let Some(value) = config_value
        && !value.trim().is_empty()
    {
        return Some(value.trim().to_string());
    }
    std::env::var(env_var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_map_to_sections() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("PARTPAL_SESSION_CALL_TIMEOUT_SECS", "45");
            jail.set_env("PARTPAL_MOUSER_MAX_RESULTS", "5");
            jail.set_env("PARTPAL_ELEVENLABS_VOICE_ID", "voice-x");
            jail.set_env("PARTPAL_SESSION_HISTORY_EXCHANGES", "4");
            let config = load_config()?;
            assert_eq!(config.session.call_timeout_secs, 45);
            assert_eq!(config.session.history_exchanges, 4);
            assert_eq!(config.mouser.max_results, 5);
            assert_eq!(config.elevenlabs.voice_id, "voice-x");
            Ok(())
        });
    }

    #[test]
    fn local_file_is_merged() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                LOCAL_CONFIG_FILE,
                r#"
[gemini]
model = "gemini-1.5-pro"
"#,
            )?;
            let config = load_config()?;
            assert_eq!(config.gemini.model, "gemini-1.5-pro");
            Ok(())
        });
    }

    #[test]
    fn resolve_credential_prefers_config() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("PARTPAL_TEST_KEY", "from-env");
            assert_eq!(
                resolve_credential(Some("from-config"), "PARTPAL_TEST_KEY").as_deref(),
                Some("from-config")
            );
            assert_eq!(
                resolve_credential(Some("  "), "PARTPAL_TEST_KEY").as_deref(),
                Some("from-env")
            );
            assert_eq!(resolve_credential(None, "PARTPAL_TEST_KEY_UNSET"), None);
            Ok(())
        });
    }
}
