// SPDX-FileCopyrightText: 2026 Partpal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for partpal integration tests.
//!
//! Provides mock collaborators and a session harness for fast,
//! deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockGeneration`] - Mock generation/vision with queued replies and scripted failures
//! - [`MockCatalog`] - Mock catalog search with fixed results
//! - [`MockSpeech`] - Mock speech synthesis with fixed audio
//! - [`TestHarness`] - A session wired to the mocks

pub mod harness;
pub mod mock_catalog;
pub mod mock_generation;
pub mod mock_speech;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_catalog::MockCatalog;
pub use mock_generation::MockGeneration;
pub use mock_speech::MockSpeech;
