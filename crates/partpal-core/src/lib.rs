// SPDX-FileCopyrightText: 2026 Partpal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the partpal electronics assistant.
//!
//! This crate provides the transcript data model, the error type and the
//! collaborator adapter traits used throughout the partpal workspace. Every
//! generation, catalog and speech adapter implements traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::PartpalError;
pub use types::{
    AssistantPayload, ChatMessage, ChatRole, HealthStatus, PartResult, Service, Turn,
};

// Re-export all adapter traits at crate root.
pub use traits::{CatalogAdapter, GenerationAdapter, PluginAdapter, SpeechAdapter, TextStream};
