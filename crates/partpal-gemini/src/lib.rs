// SPDX-FileCopyrightText: 2026 Partpal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini generation/vision adapter for partpal.
//!
//! This crate implements [`GenerationAdapter`] over the Gemini
//! `generateContent` API, providing single-shot generation (with an optional
//! inline image) and streaming SSE responses.

pub mod client;
pub mod media;
pub mod sse;
pub mod types;

use async_trait::async_trait;
use futures::stream::StreamExt;
use partpal_config::PartpalConfig;
use partpal_config::resolve_credential;
use partpal_core::traits::{GenerationAdapter, PluginAdapter, TextStream};
use partpal_core::{ChatMessage, HealthStatus, PartpalError, Service};
use tracing::{debug, info};

use crate::client::GeminiClient;
use crate::sse::StreamEvent;
use crate::types::{GenerateContentRequest, GenerateContentResponse};

/// Environment variable consulted when `gemini.api_key` is not set.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Gemini adapter implementing [`GenerationAdapter`].
///
/// API key resolution order: config -> `GEMINI_API_KEY` env var -> error.
pub struct GeminiAdapter {
    client: GeminiClient,
}

impl GeminiAdapter {
    /// Creates a new Gemini adapter from the given configuration.
    pub fn new(config: &PartpalConfig) -> Result<Self, PartpalError> {
        let api_key = resolve_credential(config.gemini.api_key.as_deref(), API_KEY_ENV)
            .ok_or_else(|| {
                PartpalError::Config(format!(
                    "Gemini API key not found. Set gemini.api_key in config or {API_KEY_ENV} environment variable."
                ))
            })?;

        let client = GeminiClient::new(
            &api_key,
            config.gemini.model.clone(),
            &config.gemini.base_url,
            config.gemini.max_retries,
        )?;

        info!(model = config.gemini.model.as_str(), "Gemini adapter initialized");
        Ok(Self { client })
    }

    /// Creates an adapter with an existing client.
    pub fn with_client(client: GeminiClient) -> Self {
        Self { client }
    }
}

/// Extracts the reply text, turning a blocked prompt into an error.
fn reply_text(response: &GenerateContentResponse) -> Result<String, PartpalError> {
    if let Some(reason) = response.block_reason() {
        return Err(PartpalError::upstream(
            Service::Generation,
            format!("prompt blocked ({reason})"),
        ));
    }
    Ok(response.text())
}

#[async_trait]
impl PluginAdapter for GeminiAdapter {
    fn name(&self) -> &str {
        "gemini"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn service(&self) -> Service {
        Service::Generation
    }

    async fn health_check(&self) -> Result<HealthStatus, PartpalError> {
        // Constructing the client validated the key header; a real request
        // would spend quota.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PartpalError> {
        debug!("Gemini adapter shutting down");
        Ok(())
    }
}

#[async_trait]
impl GenerationAdapter for GeminiAdapter {
    async fn generate(&self, prompt: &str, image: Option<&[u8]>) -> Result<String, PartpalError> {
        let inline = image.map(media::inline_image).transpose()?;
        let request = GenerateContentRequest::user_prompt(prompt, inline);
        let response = self.client.generate_content(&request).await?;

        let text = reply_text(&response)?;
        debug!(
            chars = text.len(),
            image = image.is_some(),
            finish_reason = response.finish_reason().unwrap_or("unknown"),
            "generation complete"
        );
        Ok(text)
    }

    async fn generate_stream(
        &self,
        history: &[ChatMessage],
        prompt: &str,
    ) -> Result<TextStream, PartpalError> {
        let request = GenerateContentRequest::conversation(history, prompt);
        let event_stream = self.client.stream_generate_content(&request).await?;

        let text_stream = event_stream.filter_map(|result| async move {
            match result {
                Ok(StreamEvent::Chunk(chunk)) => match reply_text(&chunk) {
                    Ok(text) if text.is_empty() => None,
                    other => Some(other),
                },
                Ok(StreamEvent::Error(err)) => Some(Err(PartpalError::upstream(
                    Service::Generation,
                    format!("Gemini API error ({}): {}", err.status, err.message),
                ))),
                Err(e) => Some(Err(e)),
            }
        });

        Ok(Box::pin(text_stream))
    }
}
