// SPDX-FileCopyrightText: 2026 Partpal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Speech adapter trait for text-to-speech integrations.

use async_trait::async_trait;

use crate::error::PartpalError;
use crate::traits::adapter::PluginAdapter;

/// Adapter for the speech synthesis collaborator.
#[async_trait]
pub trait SpeechAdapter: PluginAdapter {
    /// Synthesizes `text` into an encoded audio clip.
    ///
    /// `Ok(None)` means there was nothing to say (for example blank text).
    async fn synthesize(&self, text: &str) -> Result<Option<Vec<u8>>, PartpalError>;
}
