// SPDX-FileCopyrightText: 2026 Partpal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mouser catalog adapter for partpal.
//!
//! Implements [`CatalogAdapter`] over the Mouser Search API keyword endpoint.

pub mod client;
pub mod types;

use async_trait::async_trait;
use partpal_config::PartpalConfig;
use partpal_config::resolve_credential;
use partpal_core::traits::{CatalogAdapter, PluginAdapter};
use partpal_core::{HealthStatus, PartResult, PartpalError, Service};
use tracing::{debug, info};

use crate::client::MouserClient;

/// Environment variable consulted when `mouser.api_key` is not set.
pub const API_KEY_ENV: &str = "MOUSER_API_KEY";

/// Mouser adapter implementing [`CatalogAdapter`].
pub struct MouserAdapter {
    client: MouserClient,
}

impl MouserAdapter {
    /// Builds the adapter when a Mouser API key is configured.
    ///
    /// Returns `Ok(None)` when neither `mouser.api_key` nor `MOUSER_API_KEY`
    /// is set; catalog search is optional.
    pub fn from_config(config: &PartpalConfig) -> Result<Option<Self>, PartpalError> {
        let Some(api_key) = resolve_credential(config.mouser.api_key.as_deref(), API_KEY_ENV)
        else {
            info!("Mouser API key not configured, catalog search disabled");
            return Ok(None);
        };

        let client = MouserClient::new(
            &api_key,
            &config.mouser.base_url,
            config.mouser.max_retries,
        )?;
        info!("Mouser adapter initialized");
        Ok(Some(Self { client }))
    }

    pub fn with_client(client: MouserClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PluginAdapter for MouserAdapter {
    fn name(&self) -> &str {
        "mouser"
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
impl CatalogAdapter for MouserAdapter {
    async fn search(&self, keyword: &str, limit: usize) -> Result<Vec<PartResult>, PartpalError> {
        let keyword = keyword.trim();
        if keyword.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let mut parts = self
            .client
            .search_keyword(keyword, limit)
            .await?
            .into_parts();
        parts.truncate(limit);

        debug!(keyword, hits = parts.len(), "catalog search complete");
        Ok(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn adapter(base_url: &str) -> MouserAdapter {
        let mut config = PartpalConfig::default();
        config.mouser.api_key = Some("test-key".into());
        config.mouser.base_url = base_url.to_string();
        MouserAdapter::from_config(&config).unwrap().unwrap()
    }

    fn part(mpn: &str) -> serde_json::Value {
        serde_json::json!({
            "ManufacturerPartNumber": mpn,
            "Description": "MCU",
            "ProductDetailUrl": format!("https://www.mouser.com/ProductDetail/{mpn}"),
            "PriceBreaks": [{"Quantity": 1, "Price": "$2.89"}]
        })
    }

    #[test]
    fn missing_key_disables_adapter() {
        if std::env::var(API_KEY_ENV).is_err() {
            let config = PartpalConfig::default();
            assert!(MouserAdapter::from_config(&config).unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn search_trims_keyword_and_caps_results() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({
                "SearchByKeywordRequest": {"keyword": "ATMEGA328P", "records": 2}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "Errors": [],
                "SearchResults": {"Parts": [part("A"), part("B"), part("C")]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let parts = adapter(&server.uri())
            .search("  ATMEGA328P\n", 2)
            .await
            .unwrap();
        let ids: Vec<&str> = parts.iter().map(|p| p.identifier.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn blank_keyword_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let parts = adapter(&server.uri()).search("   ", 3).await.unwrap();
        assert!(parts.is_empty());
    }

    #[tokio::test]
    async fn upstream_failure_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let err = adapter(&server.uri()).search("x", 3).await.unwrap_err();
        assert_eq!(err.service(), Some(Service::Catalog));
    }

    #[test]
    fn adapter_identity() {
        let adapter = adapter("http://127.0.0.1:9");
        assert_eq!(adapter.name(), "mouser");
        assert_eq!(adapter.service(), Service::Catalog);
    }
}
