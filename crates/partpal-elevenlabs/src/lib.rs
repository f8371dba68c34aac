// SPDX-FileCopyrightText: 2026 Partpal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! ElevenLabs speech adapter for partpal.
//!
//! Implements [`SpeechAdapter`] over the `text-to-speech/{voice_id}` endpoint.

pub mod client;
pub mod types;

use async_trait::async_trait;
use partpal_config::PartpalConfig;
use partpal_config::resolve_credential;
use partpal_core::traits::{PluginAdapter, SpeechAdapter};
use partpal_core::{HealthStatus, PartpalError, Service};
use tracing::{debug, info};

use crate::client::ElevenLabsClient;

/// Environment variable consulted when `elevenlabs.api_key` is not set.
pub const API_KEY_ENV: &str = "ELEVENLABS_API_KEY";

/// ElevenLabs adapter implementing [`SpeechAdapter`].
pub struct ElevenLabsAdapter {
    client: ElevenLabsClient,
}

impl ElevenLabsAdapter {
    /// Builds the adapter when an ElevenLabs API key is configured.
    ///
    /// Returns `Ok(None)` when neither `elevenlabs.api_key` nor
    /// `ELEVENLABS_API_KEY` is set; speech is optional.
    pub fn from_config(config: &PartpalConfig) -> Result<Option<Self>, PartpalError> {
        let tts = &config.elevenlabs;
        let Some(api_key) = resolve_credential(tts.api_key.as_deref(), API_KEY_ENV) else {
            info!("ElevenLabs API key not configured, speech disabled");
            return Ok(None);
        };

        let client = ElevenLabsClient::new(
            &api_key,
            &tts.base_url,
            &tts.voice_id,
            tts.model_id.clone(),
            &tts.output_format,
            tts.max_retries,
        )?;
        info!(
            voice = tts.voice_id.as_str(),
            model = tts.model_id.as_str(),
            "ElevenLabs adapter initialized"
        );
        Ok(Some(Self { client }))
    }

    pub fn with_client(client: ElevenLabsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PluginAdapter for ElevenLabsAdapter {
    fn name(&self) -> &str {
        "elevenlabs"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn service(&self) -> Service {
        Service::Speech
    }

    async fn health_check(&self) -> Result<HealthStatus, PartpalError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PartpalError> {
        Ok(())
    }
}

#[async_trait]
impl SpeechAdapter for ElevenLabsAdapter {
    async fn synthesize(&self, text: &str) -> Result<Option<Vec<u8>>, PartpalError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let audio = self.client.convert(text).await?;
        debug!(
            chars = text.len(),
            bytes = audio.len(),
            model = self.client.model_id(),
            "speech synthesized"
        );
        Ok((!audio.is_empty()).then_some(audio))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn adapter(base_url: &str) -> ElevenLabsAdapter {
        let mut config = PartpalConfig::default();
        config.elevenlabs.api_key = Some("test-key".into());
        config.elevenlabs.base_url = base_url.to_string();
        config.elevenlabs.voice_id = "voice-1".into();
        ElevenLabsAdapter::from_config(&config).unwrap().unwrap()
    }

    #[test]
    fn missing_key_disables_adapter() {
        if std::env::var(API_KEY_ENV).is_err() {
            let config = PartpalConfig::default();
            assert!(ElevenLabsAdapter::from_config(&config).unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn synthesize_posts_trimmed_text_to_configured_voice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/text-to-speech/voice-1"))
            .and(body_partial_json(serde_json::json!({"text": "Identified: LM7805"})))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7u8; 16]))
            .expect(1)
            .mount(&server)
            .await;

        let audio = adapter(&server.uri())
            .synthesize("  Identified: LM7805 \n")
            .await
            .unwrap();
        assert_eq!(audio, Some(vec![7u8; 16]));
    }

    #[tokio::test]
    async fn blank_text_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        assert_eq!(adapter(&server.uri()).synthesize(" \t").await.unwrap(), None);
    }

    #[tokio::test]
    async fn empty_audio_body_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        assert_eq!(adapter(&server.uri()).synthesize("hi").await.unwrap(), None);
    }

    #[tokio::test]
    async fn server_error_propagates_after_retry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .expect(2)
            .mount(&server)
            .await;

        let err = adapter(&server.uri()).synthesize("hi").await.unwrap_err();
        assert!(err.is_upstream());
    }
}
