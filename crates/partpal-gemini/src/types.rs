// SPDX-FileCopyrightText: 2026 Partpal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gemini `generateContent` request/response types.
//!
//! The same response shape is used for the non-streaming body and for every
//! SSE `data:` payload of `streamGenerateContent`.

use partpal_core::ChatMessage;
use serde::{Deserialize, Serialize};

// --- Request types ---

/// A request to `models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation contents, oldest first, ending with the new user turn.
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// A single user turn holding `prompt` and, optionally, one inline image.
    pub fn user_prompt(prompt: &str, image: Option<InlineData>) -> Self {
        let mut parts = vec![Part::text(prompt)];
        if let Some(inline_data) = image {
            parts.push(Part {
                text: None,
                inline_data: Some(inline_data),
            });
        }
        Self {
            contents: vec![Content {
                role: Some("user".into()),
                parts,
            }],
        }
    }

    /// The earlier `history` replayed as alternating turns, then `prompt`.
    pub fn conversation(history: &[ChatMessage], prompt: &str) -> Self {
        let contents = history
            .iter()
            .map(|message| Content {
                role: Some(message.role.to_string()),
                parts: vec![Part::text(&message.text)],
            })
            .chain(std::iter::once(Content {
                role: Some("user".into()),
                parts: vec![Part::text(prompt)],
            }))
            .collect();
        Self { contents }
    }
}

/// A single turn of content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    /// "user" or "model". Omitted by the API on some streamed chunks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One part of a content turn: text or inline media.
///
/// Unknown part kinds in responses (function calls, thoughts) deserialize
/// with both fields empty and are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            inline_data: None,
        }
    }
}

/// Inline binary data (base64 encoded).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// MIME type (e.g., "image/jpeg", "image/png").
    pub mime_type: String,
    /// Base64-encoded data.
    pub data: String,
}

// --- Response types ---

/// A `generateContent` response, or one streamed chunk of it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    /// The reason the prompt was blocked, if it was.
    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
    }

    /// The finish reason of the first candidate.
    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
    }
}

/// One generated candidate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    /// e.g. "STOP", "MAX_TOKENS", "SAFETY".
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Feedback about the prompt itself.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Token usage statistics from the API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
    #[serde(default)]
    pub total_token_count: u32,
}

/// API error response, e.g.
/// `{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Error detail within an API error response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    /// HTTP status code echoed by the API.
    #[serde(default)]
    pub code: u16,
    /// Human-readable error message.
    pub message: String,
    /// Canonical status name (e.g., "RESOURCE_EXHAUSTED").
    #[serde(default)]
    pub status: String,
}
