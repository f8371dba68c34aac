// SPDX-FileCopyrightText: 2026 Partpal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only, in-memory transcript for one session.

use std::slice;

use partpal_core::{PartpalError, Turn};
use tracing::debug;

/// Ordered log of turns. Insertion order is display order.
///
/// The transcript has exactly one writer (the session that owns it); readers
/// only ever see it through a [`Snapshot`].
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `turn` at the end.
    ///
    /// Returns [`PartpalError::InvalidTurn`] and leaves the transcript
    /// untouched if the turn carries no user text, no assistant content and
    /// no audio.
    pub fn append(&mut self, turn: Turn) -> Result<(), PartpalError> {
        if turn.is_noop() {
            debug!("rejected no-op turn");
            return Err(PartpalError::InvalidTurn);
        }
        self.turns.push(turn);
        Ok(())
    }

    /// Appends every turn in order, stopping at the first rejected one.
    pub fn extend(&mut self, turns: impl IntoIterator<Item = Turn>) -> Result<(), PartpalError> {
        for turn in turns {
            self.append(turn)?;
        }
        Ok(())
    }

    /// A read-only view of the current turns in insertion order.
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot { turns: &self.turns }
    }

    /// Empties the transcript (session reset).
    pub fn clear(&mut self) {
        debug!(turns = self.turns.len(), "transcript cleared");
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Borrowed, restartable view over a [`Transcript`].
///
/// Copying a snapshot is free and each copy iterates from the first turn.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    turns: &'a [Turn],
}

impl<'a> Snapshot<'a> {
    /// Iterates the turns lazily, oldest first.
    pub fn iter(&self) -> slice::Iter<'a, Turn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&'a Turn> {
        self.turns.last()
    }
}

impl<'a> IntoIterator for Snapshot<'a> {
    type Item = &'a Turn;
    type IntoIter = slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}

impl<'a> IntoIterator for &Snapshot<'a> {
    type Item = &'a Turn;
    type IntoIter = slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}
