// SPDX-FileCopyrightText: 2026 Partpal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One conversation: a transcript paired with the producer that feeds it.
//!
//! Each session goes through states: Idle -> Processing -> Idle. Actions take
//! `&mut self`, so a session never has two actions in flight. Independent
//! sessions share nothing.

use partpal_core::PartpalError;
use tracing::{debug, info};

use crate::producer::TurnProducer;
use crate::transcript::{Snapshot, Transcript};

/// States in the session FSM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the next user action.
    Idle,
    /// Collaborator calls for an action are in flight.
    Processing,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Processing => write!(f, "processing"),
        }
    }
}

/// A user action accepted by a [`Session`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    /// A typed project idea or question.
    Text(String),
    /// Raw bytes of an uploaded component photo.
    Image(Vec<u8>),
}

/// Returns the session to `Idle` when an action finishes or is dropped
/// mid-flight.
struct ProcessingGuard<'a>(&'a mut SessionState);

impl<'a> ProcessingGuard<'a> {
    fn enter(state: &'a mut SessionState) -> Self {
        *state = SessionState::Processing;
        Self(state)
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        *self.0 = SessionState::Idle;
    }
}

/// The single writer of its transcript.
pub struct Session {
    transcript: Transcript,
    producer: TurnProducer,
    state: SessionState,
    actions: u64,
}

impl Session {
    pub fn new(producer: TurnProducer) -> Self {
        Self {
            transcript: Transcript::new(),
            producer,
            state: SessionState::Idle,
            actions: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn producer(&self) -> &TurnProducer {
        &self.producer
    }

    /// Runs one action to completion and appends its turns.
    ///
    /// Returns how many turns were appended (zero for blank text).
    pub async fn submit(&mut self, action: UserAction) -> Result<usize, PartpalError> {
        let turns = {
            let _processing = ProcessingGuard::enter(&mut self.state);
            match &action {
                UserAction::Text(text) => self.producer.handle_text(text).await,
                UserAction::Image(bytes) => self.producer.handle_image(bytes).await,
            }
        };

        let produced = turns.len();
        self.transcript.extend(turns)?;
        if produced > 0 {
            self.actions += 1;
        }

        debug!(
            action = self.actions,
            turns = produced,
            total = self.transcript.len(),
            "action appended"
        );
        Ok(produced)
    }

    pub async fn submit_text(&mut self, text: &str) -> Result<usize, PartpalError> {
        self.submit(UserAction::Text(text.to_string())).await
    }

    pub async fn submit_image(&mut self, image: Vec<u8>) -> Result<usize, PartpalError> {
        self.submit(UserAction::Image(image)).await
    }

    /// Read-only view of every turn so far.
    pub fn snapshot(&self) -> Snapshot<'_> {
        self.transcript.snapshot()
    }

    /// Clears the transcript and the conversation memory, and starts over.
    pub fn reset(&mut self) {
        info!(turns = self.transcript.len(), "session reset");
        self.transcript.clear();
        self.producer.clear_history();
        self.actions = 0;
    }
}
