// SPDX-FileCopyrightText: 2026 Partpal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wiring of configured collaborators into a session, and the one-shot
//! `ask` and `identify` commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use partpal_agent::{ProducerConfig, Session, TurnProducer};
use partpal_config::model::PartpalConfig;
use partpal_config::resolve_credential;
use partpal_core::{CatalogAdapter, PartpalError, Service, SpeechAdapter};
use partpal_elevenlabs::ElevenLabsAdapter;
use partpal_gemini::GeminiAdapter;
use partpal_mouser::MouserAdapter;
use tracing::{info, warn};

use crate::render::{AudioStore, render_turn};

/// Builds a session from configuration.
///
/// Generation is required. Catalog search and speech are enabled only when
/// their API keys resolve.
pub async fn build_session(config: &PartpalConfig) -> Result<Session, PartpalError> {
    let generation = Arc::new(GeminiAdapter::new(config)?);
    let catalog = MouserAdapter::from_config(config)?
        .map(|adapter| Arc::new(adapter) as Arc<dyn CatalogAdapter>);
    let speech = ElevenLabsAdapter::from_config(config)?
        .map(|adapter| Arc::new(adapter) as Arc<dyn SpeechAdapter>);

    let producer_config = ProducerConfig::from_config(config).await;
    Ok(Session::new(TurnProducer::new(
        generation,
        catalog,
        speech,
        producer_config,
    )))
}

/// Audio store rooted at the configured directory.
pub fn audio_store(config: &PartpalConfig) -> AudioStore {
    AudioStore::new(
        &config.session.audio_dir,
        config.elevenlabs.audio_extension(),
    )
}

/// Prints every turn of `session` in order.
///
/// `clips` holds the saved audio path of each turn already rendered; clips
/// of turns seen for the first time are written to `audio` and recorded.
pub async fn print_transcript(
    session: &Session,
    clips: &mut Vec<Option<PathBuf>>,
    assistant_name: &str,
    audio: &AudioStore,
    use_color: bool,
) {
    let snapshot = session.snapshot();
    for (index, turn) in snapshot.iter().enumerate() {
        if index == clips.len() {
            clips.push(save_clip(audio, index, turn.audio()).await);
        }
        println!(
            "{}",
            render_turn(turn, assistant_name, clips[index].as_deref(), use_color)
        );
    }
}

async fn save_clip(audio: &AudioStore, index: usize, bytes: Option<&[u8]>) -> Option<PathBuf> {
    let bytes = bytes?;
    match audio.save(index, bytes).await {
        Ok(path) => Some(path),
        Err(e) => {
            warn!(error = %e, dir = %audio.dir().display(), "failed to save audio clip");
            None
        }
    }
}

/// Runs `partpal ask <text>`: one text action, printed, then exit.
pub async fn run_ask(config: PartpalConfig, text: &str) -> Result<(), PartpalError> {
    let mut session = build_session(&config).await?;
    session.submit_text(text).await?;
    print_transcript(
        &session,
        &mut Vec::new(),
        &config.session.name,
        &audio_store(&config),
        use_color(),
    )
    .await;
    Ok(())
}

/// Runs `partpal identify <path>`: one image action, printed, then exit.
pub async fn run_identify(config: PartpalConfig, path: &Path) -> Result<(), PartpalError> {
    let image = read_image(path).await?;
    let mut session = build_session(&config).await?;
    info!(path = %path.display(), bytes = image.len(), "identifying component");
    session.submit_image(image).await?;
    print_transcript(
        &session,
        &mut Vec::new(),
        &config.session.name,
        &audio_store(&config),
        use_color(),
    )
    .await;
    Ok(())
}

/// Reads an image file for an image action.
pub async fn read_image(path: &Path) -> Result<Vec<u8>, PartpalError> {
    tokio::fs::read(path).await.map_err(|e| {
        PartpalError::UnsupportedMedia(format!("cannot read {}: {e}", path.display()))
    })
}

/// Renders the effective configuration as TOML with credentials masked.
pub fn redacted_config(config: &PartpalConfig) -> Result<String, PartpalError> {
    let mut shown = config.clone();
    for key in [
        &mut shown.gemini.api_key,
        &mut shown.mouser.api_key,
        &mut shown.elevenlabs.api_key,
    ] {
        if key.is_some() {
            *key = Some("********".to_string());
        }
    }
    toml::to_string_pretty(&shown)
        .map_err(|e| PartpalError::Internal(format!("failed to render config: {e}")))
}

/// One line per collaborator saying whether its credential resolves.
pub fn collaborator_summary(config: &PartpalConfig) -> String {
    let collaborators = [
        (
            Service::Generation,
            "gemini",
            config.gemini.api_key.as_deref(),
            partpal_gemini::API_KEY_ENV,
        ),
        (
            Service::Catalog,
            "mouser",
            config.mouser.api_key.as_deref(),
            partpal_mouser::API_KEY_ENV,
        ),
        (
            Service::Speech,
            "elevenlabs",
            config.elevenlabs.api_key.as_deref(),
            partpal_elevenlabs::API_KEY_ENV,
        ),
    ];

    collaborators
        .into_iter()
        .map(|(service, section, key, env)| {
            if resolve_credential(key, env).is_some() {
                format!("# {service} ({section}): enabled")
            } else {
                format!("# {service} ({section}): disabled, set {section}.api_key or {env}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacted_config_masks_keys() {
        let mut config = PartpalConfig::default();
        config.gemini.api_key = Some("AIza-secret".into());
        config.mouser.api_key = Some("mouser-secret".into());

        let out = redacted_config(&config).unwrap();
        assert!(!out.contains("AIza-secret"));
        assert!(!out.contains("mouser-secret"));
        assert!(out.contains("********"));
        assert!(out.contains("gemini-2.0-flash"));
    }

    #[test]
    fn summary_reports_configured_collaborators() {
        let mut config = PartpalConfig::default();
        config.gemini.api_key = Some("k".into());
        let summary = collaborator_summary(&config);
        assert!(summary.contains("# generation (gemini): enabled"), "got: {summary}");
        if std::env::var(partpal_mouser::API_KEY_ENV).is_err() {
            assert!(
                summary.contains("# catalog (mouser): disabled, set mouser.api_key or MOUSER_API_KEY"),
                "got: {summary}"
            );
        }
    }

    #[tokio::test]
    async fn clips_are_saved_only_for_turns_with_audio() {
        let tmp = tempfile::tempdir().unwrap();
        let audio = AudioStore::new(tmp.path(), "mp3");
        let mut clips = Vec::new();

        assert_eq!(save_clip(&audio, 0, None).await, None);
        clips.push(save_clip(&audio, 1, Some(&[1, 2][..])).await);
        assert_eq!(clips[0], Some(tmp.path().join("turn-0002.mp3")));
    }

    #[tokio::test]
    async fn missing_image_file_is_unsupported_media() {
        let err = read_image(Path::new("/nonexistent/part.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, PartpalError::UnsupportedMedia(_)));
    }

    #[tokio::test]
    async fn build_session_without_optional_keys() {
        // Only meaningful when the environment does not configure the keys.
        if std::env::var("MOUSER_API_KEY").is_err() && std::env::var("ELEVENLABS_API_KEY").is_err()
        {
            let mut config = PartpalConfig::default();
            config.gemini.api_key = Some("test-key".into());
            let session = build_session(&config).await.unwrap();
            assert!(session.snapshot().is_empty());
        }
    }
}
