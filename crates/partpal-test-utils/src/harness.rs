// SPDX-FileCopyrightText: 2026 Partpal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a [`Session`] over mock collaborators and keeps
//! handles to the mocks for assertions.

use std::sync::Arc;
use std::time::Duration;

use partpal_agent::{ProducerConfig, Session, TurnProducer};
use partpal_core::{PartResult, PartpalError, Turn};

use crate::mock_catalog::MockCatalog;
use crate::mock_generation::MockGeneration;
use crate::mock_speech::MockSpeech;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    generation: Option<MockGeneration>,
    catalog: Option<MockCatalog>,
    speech: Option<MockSpeech>,
    catalog_enabled: bool,
    speech_enabled: bool,
    config: ProducerConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            generation: None,
            catalog: None,
            speech: None,
            catalog_enabled: true,
            speech_enabled: true,
            config: ProducerConfig::default(),
        }
    }

    /// Set mock generation replies (shared by text and image actions).
    pub fn with_replies(mut self, replies: Vec<String>) -> Self {
        self.generation = Some(MockGeneration::with_replies(replies));
        self
    }

    /// Use a custom generation mock (failing, delayed, ...).
    pub fn with_generation(mut self, generation: MockGeneration) -> Self {
        self.generation = Some(generation);
        self
    }

    pub fn with_parts(mut self, parts: Vec<PartResult>) -> Self {
        self.catalog = Some(MockCatalog::with_parts(parts));
        self
    }

    pub fn with_catalog(mut self, catalog: MockCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_audio(mut self, audio: Vec<u8>) -> Self {
        self.speech = Some(MockSpeech::with_audio(audio));
        self
    }

    pub fn with_speech(mut self, speech: MockSpeech) -> Self {
        self.speech = Some(speech);
        self
    }

    /// Build without a catalog collaborator (no credential configured).
    pub fn without_catalog(mut self) -> Self {
        self.catalog_enabled = false;
        self
    }

    /// Build without a speech collaborator (no credential configured).
    pub fn without_speech(mut self) -> Self {
        self.speech_enabled = false;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.config.call_timeout = timeout;
        self
    }

    /// Build the test harness.
    pub fn build(self) -> TestHarness {
        let generation = Arc::new(self.generation.unwrap_or_default());
        let catalog = Arc::new(self.catalog.unwrap_or_default());
        let speech = Arc::new(self.speech.unwrap_or_default());

        let producer = TurnProducer::new(
            generation.clone(),
            self.catalog_enabled
                .then(|| catalog.clone() as Arc<dyn partpal_core::CatalogAdapter>),
            self.speech_enabled
                .then(|| speech.clone() as Arc<dyn partpal_core::SpeechAdapter>),
            self.config,
        );

        TestHarness {
            generation,
            catalog,
            speech,
            session: Session::new(producer),
        }
    }
}

/// A session wired to mock collaborators.
pub struct TestHarness {
    /// The mock generation/vision collaborator.
    pub generation: Arc<MockGeneration>,
    /// The mock catalog (unused by the session when built `without_catalog`).
    pub catalog: Arc<MockCatalog>,
    /// The mock synthesizer (unused by the session when built `without_speech`).
    pub speech: Arc<MockSpeech>,
    /// The session under test.
    pub session: Session,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Run a text action and return the turns it appended.
    pub async fn send_text(&mut self, text: &str) -> Result<Vec<Turn>, PartpalError> {
        let appended = self.session.submit_text(text).await?;
        Ok(self.last_turns(appended))
    }

    /// Run an image action and return the turns it appended.
    pub async fn send_image(&mut self, image: &[u8]) -> Result<Vec<Turn>, PartpalError> {
        let appended = self.session.submit_image(image.to_vec()).await?;
        Ok(self.last_turns(appended))
    }

    /// All turns in the session transcript, cloned.
    pub fn turns(&self) -> Vec<Turn> {
        self.session.snapshot().iter().cloned().collect()
    }

    fn last_turns(&self, count: usize) -> Vec<Turn> {
        let snapshot = self.session.snapshot();
        snapshot
            .iter()
            .skip(snapshot.len() - count)
            .cloned()
            .collect()
    }
}
