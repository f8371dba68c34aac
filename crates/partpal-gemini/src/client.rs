// SPDX-FileCopyrightText: 2026 Partpal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini `generateContent` API.
//!
//! Provides [`GeminiClient`] which handles endpoint construction,
//! authentication, streaming SSE responses, and transient error retry.

use std::pin::Pin;
use std::time::Duration;

use futures::Stream;
use partpal_core::{PartpalError, Service};
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::sse::{self, StreamEvent};
use crate::types::{ApiErrorResponse, GenerateContentRequest, GenerateContentResponse};

/// Upper bound on a single HTTP exchange; the caller applies its own,
/// usually tighter, per-call bound on top.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Pause before retrying after a transient status.
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// HTTP client for Gemini API communication.
///
/// Manages the API key header, connection pooling, and retry logic
/// for transient errors (429, 500, 503).
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    model: String,
    max_retries: u32,
    base_url: String,
}

impl GeminiClient {
    /// Creates a new Gemini API client.
    ///
    /// # Arguments
    /// * `api_key` - Gemini API key, sent as `x-goog-api-key`
    /// * `model` - Model identifier (e.g., "gemini-2.0-flash")
    /// * `base_url` - API root; `models/{model}:<method>` is appended
    /// * `max_retries` - Retries after a transient status
    pub fn new(
        api_key: &str,
        model: String,
        base_url: &str,
        max_retries: u32,
    ) -> Result<Self, PartpalError> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|e| PartpalError::Config(format!("invalid Gemini API key header value: {e}")))?;
        key.set_sensitive(true);
        headers.insert("x-goog-api-key", key);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                PartpalError::upstream_with_source(
                    Service::Generation,
                    "failed to build HTTP client",
                    e,
                )
            })?;

        Ok(Self {
            client,
            model,
            max_retries,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Returns the model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/models/{}:{method}", self.base_url, self.model)
    }

    /// Sends a non-streaming request and returns the full response.
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, PartpalError> {
        let response = self
            .post_with_retry(&self.endpoint("generateContent"), request)
            .await?;

        let body = response.text().await.map_err(|e| {
            PartpalError::upstream_with_source(
                Service::Generation,
                "failed to read response body",
                e.without_url(),
            )
        })?;
        serde_json::from_str(&body).map_err(|e| {
            PartpalError::upstream_with_source(
                Service::Generation,
                "failed to parse API response",
                e,
            )
        })
    }

    /// Sends a streaming request and returns a stream of SSE events.
    pub async fn stream_generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<StreamEvent, PartpalError>> + Send>>, PartpalError>
    {
        let url = format!("{}?alt=sse", self.endpoint("streamGenerateContent"));
        let response = self.post_with_retry(&url, request).await?;
        Ok(sse::parse_sse_stream(response))
    }

    /// POSTs `request`, retrying transient statuses after a 1-second delay.
    ///
    /// Returns the successful response, or an upstream error carrying the
    /// API's own message when the body has the Gemini error shape.
    async fn post_with_retry(
        &self,
        url: &str,
        request: &GenerateContentRequest,
    ) -> Result<reqwest::Response, PartpalError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying Gemini request after transient error");
                tokio::time::sleep(RETRY_DELAY).await;
            }

            let response = self
                .client
                .post(url)
                .json(request)
                .send()
                .await
                .map_err(|e| {
                    PartpalError::upstream_with_source(
                        Service::Generation,
                        "HTTP request failed",
                        e.without_url(),
                    )
                })?;

            let status = response.status();
            debug!(status = %status, attempt, model = self.model.as_str(), "Gemini response received");

            if status.is_success() {
                return Ok(response);
            }

            let body = response.text().await.unwrap_or_default();
            let error = PartpalError::upstream(Service::Generation, error_message(status, &body));

            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, "transient error, will retry");
                last_error = Some(error);
                continue;
            }

            // Non-transient error or exhausted retries.
            return Err(error);
        }

        Err(last_error.unwrap_or_else(|| {
            PartpalError::upstream(Service::Generation, "request failed after retries")
        }))
    }
}

/// Formats an error body, preferring the API's structured message.
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(api_err) if !api_err.error.status.is_empty() => format!(
            "Gemini API error ({}): {}",
            api_err.error.status, api_err.error.message
        ),
        Ok(api_err) => format!("Gemini API error ({status}): {}", api_err.error.message),
        Err(_) => format!("API returned {status}: {}", body.trim()),
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
pub(crate) fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}
