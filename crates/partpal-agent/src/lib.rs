// SPDX-FileCopyrightText: 2026 Partpal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation core for the partpal electronics assistant.
//!
//! - [`Transcript`]: append-only log of turns for one session
//! - [`TurnProducer`]: turns one user action into turns, isolating
//!   collaborator failures
//! - [`sanitize`]: strips markup from untrusted upstream text
//! - [`Session`]: a transcript and its producer, one action at a time

pub mod producer;
pub mod sanitize;
pub mod session;
pub mod transcript;

pub use producer::{
    DEFAULT_SYSTEM_PROMPT, DEFAULT_VISION_PROMPT, IMAGE_UPLOADED, NO_MATCHING_PARTS,
    ProducerConfig, TurnProducer,
};
pub use sanitize::sanitize;
pub use session::{Session, SessionState, UserAction};
pub use transcript::{Snapshot, Transcript};
