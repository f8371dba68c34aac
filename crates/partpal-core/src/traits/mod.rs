// SPDX-FileCopyrightText: 2026 Partpal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator adapter traits.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod catalog;
pub mod generation;
pub mod speech;

// Re-export all traits at the traits module level for convenience.
pub use adapter::PluginAdapter;
pub use catalog::CatalogAdapter;
pub use generation::{GenerationAdapter, TextStream};
pub use speech::SpeechAdapter;
