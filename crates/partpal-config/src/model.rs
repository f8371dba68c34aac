// SPDX-FileCopyrightText: 2026 Partpal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the partpal assistant.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level partpal configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PartpalConfig {
    /// Session behavior, prompts and call bounds.
    #[serde(default)]
    pub session: SessionConfig,

    /// Gemini generation/vision settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Mouser catalog search settings.
    #[serde(default)]
    pub mouser: MouserConfig,

    /// ElevenLabs speech synthesis settings.
    #[serde(default)]
    pub elevenlabs: ElevenLabsConfig,
}

/// Session identity, prompts and per-call bounds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Display name of the assistant.
    #[serde(default = "default_session_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Inline system instruction prepended to every text action.
    /// Overridden by `system_prompt_file` if both are set.
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Path to a file containing the system instruction.
    #[serde(default)]
    pub system_prompt_file: Option<String>,

    /// Instruction sent with every uploaded image.
    #[serde(default = "default_vision_prompt")]
    pub vision_prompt: String,

    /// Upper bound, in seconds, on each collaborator call.
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,

    /// Earlier text exchanges replayed to the model with each question.
    /// 0 disables conversation memory.
    #[serde(default = "default_history_exchanges")]
    pub history_exchanges: usize,

    /// Directory where synthesized audio clips are written for playback.
    #[serde(default = "default_audio_dir")]
    pub audio_dir: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            name: default_session_name(),
            log_level: default_log_level(),
            system_prompt: None,
            system_prompt_file: None,
            vision_prompt: default_vision_prompt(),
            call_timeout_secs: default_call_timeout_secs(),
            history_exchanges: default_history_exchanges(),
            audio_dir: default_audio_dir(),
        }
    }
}

fn default_session_name() -> String {
    "partpal".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_vision_prompt() -> String {
    "Identify the electronic component in this image. Respond only with the component name."
        .to_string()
}

fn default_call_timeout_secs() -> u64 {
    20
}

fn default_history_exchanges() -> usize {
    10
}

fn default_audio_dir() -> String {
    dirs::cache_dir()
        .map(|p| p.join("partpal").join("audio"))
        .unwrap_or_else(|| std::path::PathBuf::from("partpal-audio"))
        .to_string_lossy()
        .into_owned()
}

/// Gemini generation/vision configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// Gemini API key. `None` falls back to the `GEMINI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model used for both text and image requests.
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// API base URL (the `models/...` path is appended).
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    /// Retries after a transient HTTP status.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_gemini_model(),
            base_url: default_gemini_base_url(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_max_retries() -> u32 {
    1
}

/// Mouser catalog search configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MouserConfig {
    /// Mouser search API key. When absent (and `MOUSER_API_KEY` is unset),
    /// catalog search is disabled and always returns no parts.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Maximum number of parts requested per search.
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    #[serde(default = "default_mouser_base_url")]
    pub base_url: String,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for MouserConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            max_results: default_max_results(),
            base_url: default_mouser_base_url(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_max_results() -> usize {
    3
}

fn default_mouser_base_url() -> String {
    "https://api.mouser.com/api/v1".to_string()
}

/// ElevenLabs speech synthesis configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ElevenLabsConfig {
    /// ElevenLabs API key. When absent (and `ELEVENLABS_API_KEY` is unset),
    /// speech synthesis is disabled and turns carry no audio.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_voice_id")]
    pub voice_id: String,

    #[serde(default = "default_tts_model_id")]
    pub model_id: String,

    /// Encoded output format, e.g. `mp3_44100_128`.
    #[serde(default = "default_output_format")]
    pub output_format: String,

    #[serde(default = "default_elevenlabs_base_url")]
    pub base_url: String,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for ElevenLabsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            voice_id: default_voice_id(),
            model_id: default_tts_model_id(),
            output_format: default_output_format(),
            base_url: default_elevenlabs_base_url(),
            max_retries: default_max_retries(),
        }
    }
}

impl ElevenLabsConfig {
    /// File extension matching the configured output format (`mp3_44100_128` -> `mp3`).
    pub fn audio_extension(&self) -> &str {
        self.output_format
            .split('_')
            .next()
            .filter(|ext| !ext.is_empty())
            .unwrap_or("bin")
    }
}

fn default_voice_id() -> String {
    "21m00Tcm4TlvDq8ikWAM".to_string()
}

fn default_tts_model_id() -> String {
    "eleven_multilingual_v2".to_string()
}

fn default_output_format() -> String {
    "mp3_44100_128".to_string()
}

fn default_elevenlabs_base_url() -> String {
    "https://api.elevenlabs.io/v1".to_string()
}
