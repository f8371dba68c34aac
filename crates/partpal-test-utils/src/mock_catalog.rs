// SPDX-FileCopyrightText: 2026 Partpal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock catalog search adapter with fixed results and call recording.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use partpal_core::traits::{CatalogAdapter, PluginAdapter};
use partpal_core::{HealthStatus, PartResult, PartpalError, Service};

/// A mock catalog that returns the same parts (or the same failure) on every search.
///
/// Results are returned as configured; the caller's `limit` is recorded but
/// not applied, so tests can check that callers cap results themselves.
pub struct MockCatalog {
    outcome: Result<Vec<PartResult>, String>,
    calls: AtomicUsize,
    last_keyword: Mutex<Option<String>>,
    last_limit: Mutex<Option<usize>>,
}

impl MockCatalog {
    fn with_outcome(outcome: Result<Vec<PartResult>, String>) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            last_keyword: Mutex::new(None),
            last_limit: Mutex::new(None),
        }
    }

    /// A catalog that finds nothing.
    pub fn empty() -> Self {
        Self::with_outcome(Ok(Vec::new()))
    }

    pub fn with_parts(parts: Vec<PartResult>) -> Self {
        Self::with_outcome(Ok(parts))
    }

    /// A catalog whose every search fails with an upstream error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_outcome(Err(message.into()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn last_keyword(&self) -> Option<String> {
        self.last_keyword.lock().await.clone()
    }

    pub async fn last_limit(&self) -> Option<usize> {
        *self.last_limit.lock().await
    }
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::empty()
    }
}

#[async_trait]
impl PluginAdapter for MockCatalog {
    fn name(&self) -> &str {
        "mock-catalog"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn service(&self) -> Service {
        Service::Catalog
    }

    async fn health_check(&self) -> Result<HealthStatus, PartpalError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PartpalError> {
        Ok(())
    }
}

#[async_trait]
impl CatalogAdapter for MockCatalog {
    async fn search(&self, keyword: &str, limit: usize) -> Result<Vec<PartResult>, PartpalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_keyword.lock().await = Some(keyword.to_string());
        *self.last_limit.lock().await = Some(limit);

        self.outcome
            .clone()
            .map_err(|message| PartpalError::upstream(Service::Catalog, message))
    }
}
