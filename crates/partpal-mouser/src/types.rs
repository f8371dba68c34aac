// SPDX-FileCopyrightText: 2026 Partpal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mouser Search API v1 keyword request/response types.
//!
//! Mouser uses PascalCase field names throughout.

use partpal_core::PartResult;
use serde::{Deserialize, Serialize};

// --- Request types ---

/// Body of `POST /search/keyword`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeywordSearchRequest {
    pub search_by_keyword_request: SearchByKeyword,
}

impl KeywordSearchRequest {
    pub fn new(keyword: &str, records: usize) -> Self {
        Self {
            search_by_keyword_request: SearchByKeyword {
                keyword: keyword.to_string(),
                records,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchByKeyword {
    pub keyword: String,
    /// Maximum number of parts returned.
    pub records: usize,
}

// --- Response types ---

/// Keyword search response. Any field may be null.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub errors: Option<Vec<ApiError>>,
    #[serde(default)]
    pub search_results: Option<SearchResults>,
}

impl SearchResponse {
    /// Joined messages of every reported error, if any were reported.
    pub fn error_message(&self) -> Option<String> {
        let errors = self.errors.as_deref().unwrap_or_default();
        if errors.is_empty() {
            return None;
        }
        Some(
            errors
                .iter()
                .map(ApiError::describe)
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Converts the returned parts, applying display placeholders.
    pub fn into_parts(self) -> Vec<PartResult> {
        self.search_results
            .and_then(|r| r.parts)
            .unwrap_or_default()
            .into_iter()
            .map(Part::into_result)
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchResults {
    #[serde(default)]
    pub number_of_result: Option<u64>,
    #[serde(default)]
    pub parts: Option<Vec<Part>>,
}

/// One catalog part. Only the fields partpal displays are kept.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Part {
    #[serde(default)]
    pub manufacturer_part_number: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub product_detail_url: Option<String>,
    #[serde(default)]
    pub price_breaks: Option<Vec<PriceBreak>>,
}

impl Part {
    /// Price of the first (smallest quantity) break.
    pub fn first_price(&self) -> Option<String> {
        self.price_breaks
            .as_deref()
            .and_then(<[PriceBreak]>::first)
            .and_then(|b| b.price.clone())
    }

    pub fn into_result(self) -> PartResult {
        let price = self.first_price();
        PartResult::from_upstream(
            self.manufacturer_part_number,
            self.description,
            price,
            self.product_detail_url,
        )
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PriceBreak {
    #[serde(default)]
    pub quantity: Option<u64>,
    /// Formatted price, e.g. "$2.89".
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
}

/// Error entry of the `Errors` array.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiError {
    fn describe(&self) -> String {
        match (self.code.as_deref(), self.message.as_deref()) {
            (Some(code), Some(message)) => format!("{code}: {message}"),
            (None, Some(message)) => message.to_string(),
            (Some(code), None) => code.to_string(),
            (None, None) => "unspecified error".to_string(),
        }
    }
}
