// SPDX-FileCopyrightText: 2026 Partpal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock speech synthesis adapter with fixed audio and call recording.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use partpal_core::traits::{PluginAdapter, SpeechAdapter};
use partpal_core::{HealthStatus, PartpalError, Service};

/// A mock synthesizer returning the same clip (or nothing, or a failure) for
/// every request.
pub struct MockSpeech {
    outcome: Result<Option<Vec<u8>>, String>,
    calls: AtomicUsize,
    last_text: Mutex<Option<String>>,
}

impl MockSpeech {
    fn with_outcome(outcome: Result<Option<Vec<u8>>, String>) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            last_text: Mutex::new(None),
        }
    }

    pub fn with_audio(audio: Vec<u8>) -> Self {
        Self::with_outcome(Ok(Some(audio)))
    }

    /// A synthesizer that succeeds without producing audio.
    pub fn silent() -> Self {
        Self::with_outcome(Ok(None))
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_outcome(Err(message.into()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn last_text(&self) -> Option<String> {
        self.last_text.lock().await.clone()
    }
}

impl Default for MockSpeech {
    fn default() -> Self {
        Self::silent()
    }
}

#[async_trait]
impl PluginAdapter for MockSpeech {
    fn name(&self) -> &str {
        "mock-speech"
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
impl SpeechAdapter for MockSpeech {
    async fn synthesize(&self, text: &str) -> Result<Option<Vec<u8>>, PartpalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_text.lock().await = Some(text.to_string());

        self.outcome
            .clone()
            .map_err(|message| PartpalError::upstream(Service::Speech, message))
    }
}
