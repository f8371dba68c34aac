// SPDX-FileCopyrightText: 2026 Partpal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the ElevenLabs text-to-speech API.

use std::time::Duration;

use partpal_core::{PartpalError, Service};
use reqwest::Url;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, TextToSpeechRequest};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const RETRY_DELAY: Duration = Duration::from_secs(1);

/// HTTP client for ElevenLabs speech synthesis.
///
/// Holds the fully resolved `text-to-speech/{voice_id}` URL including the
/// `output_format` query parameter.
#[derive(Debug, Clone)]
pub struct ElevenLabsClient {
    client: reqwest::Client,
    speech_url: Url,
    model_id: String,
    max_retries: u32,
}

impl ElevenLabsClient {
    pub fn new(
        api_key: &str,
        base_url: &str,
        voice_id: &str,
        model_id: String,
        output_format: &str,
        max_retries: u32,
    ) -> Result<Self, PartpalError> {
        let endpoint = format!(
            "{}/text-to-speech/{voice_id}",
            base_url.trim_end_matches('/')
        );
        let speech_url = Url::parse_with_params(&endpoint, &[("output_format", output_format)])
            .map_err(|e| PartpalError::Config(format!("invalid ElevenLabs base URL: {e}")))?;

        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(api_key).map_err(|e| {
            PartpalError::Config(format!("invalid ElevenLabs API key header value: {e}"))
        })?;
        key.set_sensitive(true);
        headers.insert("xi-api-key", key);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                PartpalError::upstream_with_source(Service::Speech, "failed to build HTTP client", e)
            })?;

        Ok(Self {
            client,
            speech_url,
            model_id,
            max_retries,
        })
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Converts `text` to speech and returns the encoded audio bytes.
    pub async fn convert(&self, text: &str) -> Result<Vec<u8>, PartpalError> {
        let request = TextToSpeechRequest {
            text: text.to_string(),
            model_id: self.model_id.clone(),
        };
        let response = self.post_with_retry(&request).await?;

        let bytes = response.bytes().await.map_err(|e| {
            PartpalError::upstream_with_source(
                Service::Speech,
                "failed to read audio body",
                e.without_url(),
            )
        })?;
        Ok(bytes.to_vec())
    }

    async fn post_with_retry(
        &self,
        request: &TextToSpeechRequest,
    ) -> Result<reqwest::Response, PartpalError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying ElevenLabs request after transient error");
                tokio::time::sleep(RETRY_DELAY).await;
            }

            let response = self
                .client
                .post(self.speech_url.clone())
                .json(request)
                .send()
                .await
                .map_err(|e| {
                    PartpalError::upstream_with_source(
                        Service::Speech,
                        "HTTP request failed",
                        e.without_url(),
                    )
                })?;

            let status = response.status();
            debug!(status = %status, attempt, "ElevenLabs response received");

            if status.is_success() {
                return Ok(response);
            }

            let body = response.text().await.unwrap_or_default();
            let error = PartpalError::upstream(Service::Speech, error_message(status, &body));

            if is_transient_error(status) && attempt < self.max_retries {
                last_error = Some(error);
                continue;
            }
            return Err(error);
        }

        Err(last_error.unwrap_or_else(|| {
            PartpalError::upstream(Service::Speech, "request failed after retries")
        }))
    }
}

fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(api_err) => format!("ElevenLabs API error ({status}): {}", api_err.detail.describe()),
        Err(_) => format!("API returned {status}: {}", body.trim()),
    }
}

pub(crate) fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}
