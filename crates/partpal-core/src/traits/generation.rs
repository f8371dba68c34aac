// SPDX-FileCopyrightText: 2026 Partpal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation adapter trait for text and vision model integrations.

use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;

use crate::error::PartpalError;
use crate::types::ChatMessage;
use crate::traits::adapter::PluginAdapter;

/// A stream of text chunks in arrival order.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, PartpalError>> + Send>>;

/// Adapter for the generation/vision collaborator.
///
/// Supports single-shot generation (optionally with an image) and streamed
/// text generation whose chunks are concatenated by the caller. Only streamed
/// generation carries conversation history; image recognition is one-shot.
#[async_trait]
pub trait GenerationAdapter: PluginAdapter {
    /// Sends a prompt, with an optional encoded image, and returns the full text reply.
    async fn generate(&self, prompt: &str, image: Option<&[u8]>) -> Result<String, PartpalError>;

    /// Sends a text prompt after the earlier `history` of the conversation
    /// and returns the reply as a stream of chunks.
    async fn generate_stream(
        &self,
        history: &[ChatMessage],
        prompt: &str,
    ) -> Result<TextStream, PartpalError>;
}
