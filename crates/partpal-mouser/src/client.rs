// SPDX-FileCopyrightText: 2026 Partpal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Mouser Search API.
//!
//! The API key travels as the `apiKey` query parameter, so request URLs are
//! never logged and are stripped from transport errors.

use std::time::Duration;

use partpal_core::{PartpalError, Service};
use reqwest::Url;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::types::{KeywordSearchRequest, SearchResponse};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const RETRY_DELAY: Duration = Duration::from_secs(1);

/// HTTP client for Mouser keyword search.
#[derive(Debug, Clone)]
pub struct MouserClient {
    client: reqwest::Client,
    search_url: Url,
    max_retries: u32,
}

impl MouserClient {
    /// Creates a new client for `{base_url}/search/keyword`.
    pub fn new(api_key: &str, base_url: &str, max_retries: u32) -> Result<Self, PartpalError> {
        let endpoint = format!("{}/search/keyword", base_url.trim_end_matches('/'));
        let search_url = Url::parse_with_params(&endpoint, &[("apiKey", api_key)])
            .map_err(|e| PartpalError::Config(format!("invalid Mouser base URL: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert("accept", HeaderValue::from_static("application/json"));
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                PartpalError::upstream_with_source(
                    Service::Catalog,
                    "failed to build HTTP client",
                    e,
                )
            })?;

        Ok(Self {
            client,
            search_url,
            max_retries,
        })
    }

    /// Runs a keyword search for at most `records` parts.
    ///
    /// A response carrying a non-empty `Errors` array is an error even when
    /// the HTTP status is 200.
    pub async fn search_keyword(
        &self,
        keyword: &str,
        records: usize,
    ) -> Result<SearchResponse, PartpalError> {
        let request = KeywordSearchRequest::new(keyword, records);
        let response = self.post_with_retry(&request).await?;

        let body = response.text().await.map_err(|e| {
            PartpalError::upstream_with_source(
                Service::Catalog,
                "failed to read response body",
                e.without_url(),
            )
        })?;
        let parsed: SearchResponse = serde_json::from_str(&body).map_err(|e| {
            PartpalError::upstream_with_source(Service::Catalog, "failed to parse API response", e)
        })?;

        if let Some(message) = parsed.error_message() {
            return Err(PartpalError::upstream(
                Service::Catalog,
                format!("Mouser API error: {message}"),
            ));
        }
        Ok(parsed)
    }

    async fn post_with_retry(
        &self,
        request: &KeywordSearchRequest,
    ) -> Result<reqwest::Response, PartpalError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying Mouser request after transient error");
                tokio::time::sleep(RETRY_DELAY).await;
            }

            let response = self
                .client
                .post(self.search_url.clone())
                .json(request)
                .send()
                .await
                .map_err(|e| {
                    PartpalError::upstream_with_source(
                        Service::Catalog,
                        "HTTP request failed",
                        e.without_url(),
                    )
                })?;

            let status = response.status();
            debug!(status = %status, attempt, "Mouser response received");

            if status.is_success() {
                return Ok(response);
            }

            let body = response.text().await.unwrap_or_default();
            let error = PartpalError::upstream(Service::Catalog, error_message(status, &body));

            if is_transient_error(status) && attempt < self.max_retries {
                last_error = Some(error);
                continue;
            }
            return Err(error);
        }

        Err(last_error.unwrap_or_else(|| {
            PartpalError::upstream(Service::Catalog, "request failed after retries")
        }))
    }
}

fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<SearchResponse>(body)
        .ok()
        .and_then(|r| r.error_message())
    {
        Some(message) => format!("Mouser API error ({status}): {message}"),
        None => format!("API returned {status}: {}", body.trim()),
    }
}

pub(crate) fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> MouserClient {
        MouserClient::new("test-key", base_url, 1).unwrap()
    }

    fn parts_body() -> serde_json::Value {
        serde_json::json!({
            "Errors": [],
            "SearchResults": {"NumberOfResult": 1, "Parts": [{
                "ManufacturerPartNumber": "LM7805CT",
                "Description": "Linear Voltage Regulators 5V 1A",
                "ProductDetailUrl": "https://www.mouser.com/ProductDetail/512-LM7805CT",
                "PriceBreaks": [{"Quantity": 1, "Price": "$0.71", "Currency": "USD"}]
            }]}
        })
    }

    #[tokio::test]
    async fn search_sends_key_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search/keyword"))
            .and(query_param("apiKey", "test-key"))
            .and(body_json(serde_json::json!({
                "SearchByKeywordRequest": {"keyword": "LM7805", "records": 3}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(parts_body()))
            .expect(1)
            .mount(&server)
            .await;

        let parts = test_client(&server.uri())
            .search_keyword("LM7805", 3)
            .await
            .unwrap()
            .into_parts();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].identifier, "LM7805CT");
        assert_eq!(parts[0].price, "$0.71");
    }

    #[tokio::test]
    async fn errors_array_in_ok_response_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "Errors": [{"Code": "Invalid", "Message": "Invalid unique identifier."}],
                "SearchResults": null
            })))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .search_keyword("x", 3)
            .await
            .unwrap_err();
        assert_eq!(err.service(), Some(Service::Catalog));
        assert_eq!(
            err.cause(),
            "Mouser API error: Invalid: Invalid unique identifier."
        );
    }

    #[tokio::test]
    async fn retries_once_on_503() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(parts_body()))
            .mount(&server)
            .await;

        let response = test_client(&server.uri()).search_keyword("x", 3).await;
        assert!(response.is_ok(), "expected retry to succeed: {response:?}");
    }

    #[tokio::test]
    async fn client_error_is_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .expect(1)
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .search_keyword("x", 3)
            .await
            .unwrap_err();
        assert_eq!(err.cause(), "API returned 401 Unauthorized: unauthorized");
    }

    #[tokio::test]
    async fn transport_error_does_not_leak_api_key() {
        // Nothing listens on port 9 (discard) in the test environment.
        let client = MouserClient::new("secret-key", "http://127.0.0.1:9", 0).unwrap();
        let err = client.search_keyword("x", 3).await.unwrap_err();
        assert!(err.is_upstream());
        assert!(!err.to_string().contains("secret-key"), "got: {err}");
    }

    #[test]
    fn invalid_base_url_is_a_config_error() {
        let err = MouserClient::new("k", "not a url", 0).unwrap_err();
        assert!(matches!(err, PartpalError::Config(_)));
    }
}
