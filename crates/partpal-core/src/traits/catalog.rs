// SPDX-FileCopyrightText: 2026 Partpal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Catalog adapter trait for parts search integrations.

use async_trait::async_trait;

use crate::error::PartpalError;
use crate::traits::adapter::PluginAdapter;
use crate::types::PartResult;

/// Adapter for the parts catalog collaborator.
#[async_trait]
pub trait CatalogAdapter: PluginAdapter {
    /// Searches the catalog by keyword, returning at most `limit` normalized hits.
    async fn search(&self, keyword: &str, limit: usize) -> Result<Vec<PartResult>, PartpalError>;
}
