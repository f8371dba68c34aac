// SPDX-FileCopyrightText: 2026 Partpal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transcript and collaborator types shared across the partpal workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Identifies one of the three external collaborators.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Service {
    /// Text generation and image recognition.
    Generation,
    /// Parts catalog keyword search.
    Catalog,
    /// Text-to-speech synthesis.
    Speech,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// One normalized catalog search hit.
///
/// All fields are always populated; upstream omissions are replaced with the
/// display placeholders below so renderers never branch on absence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartResult {
    /// Manufacturer part number.
    pub identifier: String,
    pub description: String,
    /// Display price of the first price break.
    pub price: String,
    /// Product detail URL.
    pub link: String,
}

impl PartResult {
    pub const UNKNOWN_IDENTIFIER: &'static str = "Unknown";
    pub const NO_DESCRIPTION: &'static str = "No description";
    pub const NO_PRICE: &'static str = "N/A";
    pub const NO_LINK: &'static str = "#";

    /// Builds a part from possibly-missing upstream fields.
    ///
    /// Missing, empty and whitespace-only values fall back to the placeholders.
    pub fn from_upstream(
        identifier: Option<String>,
        description: Option<String>,
        price: Option<String>,
        link: Option<String>,
    ) -> Self {
        Self {
            identifier: or_placeholder(identifier, Self::UNKNOWN_IDENTIFIER),
            description: or_placeholder(description, Self::NO_DESCRIPTION),
            price: or_placeholder(price, Self::NO_PRICE),
            link: or_placeholder(link, Self::NO_LINK),
        }
    }

    /// True when the upstream supplied a usable product link.
    pub fn has_link(&self) -> bool {
        self.link != Self::NO_LINK
    }
}

fn or_placeholder(value: Option<String>, placeholder: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => placeholder.to_string(),
    }
}

/// The assistant side of a turn, decided once when the turn is produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssistantPayload {
    /// Plain assistant text.
    Text { body: String },
    /// Assistant text followed by catalog hits (which may be empty).
    TextWithParts { body: String, parts: Vec<PartResult> },
    /// Catalog hits with no accompanying text.
    PartsOnly { parts: Vec<PartResult> },
    /// No assistant content.
    Empty,
}

impl AssistantPayload {
    pub fn text(body: impl Into<String>) -> Self {
        AssistantPayload::Text { body: body.into() }
    }

    pub fn text_with_parts(body: impl Into<String>, parts: Vec<PartResult>) -> Self {
        AssistantPayload::TextWithParts {
            body: body.into(),
            parts,
        }
    }

    pub fn parts_only(parts: Vec<PartResult>) -> Self {
        AssistantPayload::PartsOnly { parts }
    }

    /// The text body, if this variant carries one.
    pub fn body(&self) -> Option<&str> {
        match self {
            AssistantPayload::Text { body } | AssistantPayload::TextWithParts { body, .. } => {
                Some(body)
            }
            AssistantPayload::PartsOnly { .. } | AssistantPayload::Empty => None,
        }
    }

    /// The catalog hits carried by this variant (empty for text-only variants).
    pub fn parts(&self) -> &[PartResult] {
        match self {
            AssistantPayload::TextWithParts { parts, .. } | AssistantPayload::PartsOnly { parts } => {
                parts
            }
            AssistantPayload::Text { .. } | AssistantPayload::Empty => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, AssistantPayload::Empty)
    }
}

/// Speaker of one message in the generation conversation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// A prior message sent to or received from the generation collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

/// One exchange unit of the transcript.
///
/// Turns are immutable once built; the transcript only hands out shared
/// references to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    user: Option<String>,
    assistant: AssistantPayload,
    audio: Option<Vec<u8>>,
}

impl Turn {
    pub fn new(
        user: Option<String>,
        assistant: AssistantPayload,
        audio: Option<Vec<u8>>,
    ) -> Self {
        Self {
            user,
            assistant,
            audio,
        }
    }

    /// A turn with only assistant content.
    pub fn assistant_only(assistant: AssistantPayload) -> Self {
        Self::new(None, assistant, None)
    }

    /// Returns the same turn with `audio` attached (or cleared when `None`).
    pub fn with_audio(mut self, audio: Option<Vec<u8>>) -> Self {
        self.audio = audio;
        self
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn assistant(&self) -> &AssistantPayload {
        &self.assistant
    }

    pub fn audio(&self) -> Option<&[u8]> {
        self.audio.as_deref()
    }

    /// True for a turn with nothing to display: no user text, an empty
    /// assistant payload and no audio.
    pub fn is_noop(&self) -> bool {
        self.user.is_none() && self.assistant.is_empty() && self.audio.is_none()
    }
}
