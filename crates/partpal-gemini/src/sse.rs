// SPDX-FileCopyrightText: 2026 Partpal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SSE stream parser for `streamGenerateContent?alt=sse` responses.
//!
//! Converts a reqwest response byte stream into typed [`StreamEvent`] variants
//! using the `eventsource-stream` crate for SSE protocol compliance.

use std::pin::Pin;

use eventsource_stream::Eventsource;
use futures::stream::{Stream, StreamExt};
use partpal_core::{PartpalError, Service};
use serde::Deserialize;

use crate::types::{ApiErrorDetail, ApiErrorResponse, GenerateContentResponse};

/// Typed SSE events from the Gemini streaming protocol.
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// A partial response carrying the next slice of candidate text.
    Chunk(GenerateContentResponse),
    /// API error reported inside the stream.
    Error(ApiErrorDetail),
}

/// Every `data:` payload is either an error envelope or a response chunk.
/// The error shape is tried first since every chunk field is optional.
#[derive(Deserialize)]
#[serde(untagged)]
enum SsePayload {
    Error(ApiErrorResponse),
    Chunk(GenerateContentResponse),
}

/// Parses a reqwest streaming response into a stream of typed [`StreamEvent`]s.
///
/// Gemini sends unnamed events whose data is a JSON response object. Blank
/// payloads and the `[DONE]` sentinel are skipped.
pub fn parse_sse_stream(
    response: reqwest::Response,
) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, PartpalError>> + Send>> {
    let byte_stream = response.bytes_stream();
    let event_stream = byte_stream.eventsource();

    let mapped = event_stream.filter_map(|result| async move {
        match result {
            Ok(event) => {
                let data = event.data.trim();
                if data.is_empty() || data == "[DONE]" {
                    return None;
                }
                let parsed = serde_json::from_str::<SsePayload>(data)
                    .map(|payload| match payload {
                        SsePayload::Error(err) => StreamEvent::Error(err.error),
                        SsePayload::Chunk(chunk) => StreamEvent::Chunk(chunk),
                    })
                    .map_err(|e| {
                        PartpalError::upstream_with_source(
                            Service::Generation,
                            "failed to parse stream chunk",
                            e,
                        )
                    });
                Some(parsed)
            }
            Err(e) => Some(Err(PartpalError::upstream(
                Service::Generation,
                format!("SSE stream error: {e}"),
            ))),
        }
    });

    Box::pin(mapped)
}
