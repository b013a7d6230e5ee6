#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fincache/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Financial Modeling Prep (FMP) upstream client.
//!
//! This crate implements [`FundamentalsProvider`] for the
//! [Financial Modeling Prep](https://financialmodelingprep.com/) API.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fincache_fmp::FmpProvider;
//! use fincache_core::{FundamentalsProvider, StatementType, Symbol};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = FmpProvider::new("your_api_key");
//!
//!     let symbol = Symbol::new("AAPL");
//!     let profile = provider.fetch_profile(&symbol).await?;
//!     let income = provider.fetch_statement(&symbol, StatementType::Income).await?;
//!
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use fincache_core::{
    CompanyProfile, DataError, Fields, FundamentalsProvider, ReferenceItem, Result,
    StatementType, Symbol,
};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

/// Default root URL of the FMP API.
pub const FMP_BASE_URL: &str = "https://financialmodelingprep.com";

/// Number of statement periods requested per statement type.
const STATEMENT_LIMIT: &str = "5";

/// Financial Modeling Prep client.
///
/// Provides access to:
/// - Company profiles
/// - Income statements, balance sheets, cash flow statements
/// - The list of actively traded symbols
///
/// Every call is a single attempt; no retries are performed.
#[derive(Clone)]
pub struct FmpProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl fmt::Debug for FmpProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FmpProvider")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl FmpProvider {
    /// Create a new FMP provider with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_client(Client::new(), api_key)
    }

    /// Create a new FMP provider with a custom HTTP client.
    #[must_use]
    pub fn with_client(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: FMP_BASE_URL.to_string(),
        }
    }

    /// Point the provider at a different API root (proxies, test servers).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build the URL for an API path.
    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Make a GET request and parse the JSON response.
    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        tracing::debug!(path, ?query, "FMP request");

        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| DataError::Upstream(e.without_url().to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::RateLimited {
                provider: "FMP".to_string(),
                retry_after: None,
            });
        }

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(DataError::Upstream(format!("HTTP {status}: {text}")));
        }

        let text = response
            .text()
            .await
            .map_err(|e| DataError::Upstream(e.without_url().to_string()))?;

        let value: Value = serde_json::from_str(&text)
            .map_err(|e| DataError::Upstream(format!("Invalid JSON from FMP: {e}")))?;

        // FMP reports some failures as a 200 with an error object
        if let Some(message) = value.get("Error Message") {
            return Err(DataError::Upstream(match message {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            }));
        }

        serde_json::from_value(value)
            .map_err(|e| DataError::Upstream(format!("Unexpected FMP response: {e}")))
    }
}

/// FMP endpoint path for a statement type.
///
/// The v3 statement endpoints report the year as `calendarYear`, which the
/// statement key is derived from.
fn statement_path(statement_type: StatementType, symbol: &Symbol) -> String {
    let endpoint = match statement_type {
        StatementType::Income => "income-statement",
        StatementType::Balance => "balance-sheet-statement",
        StatementType::CashFlow => "cash-flow-statement",
    };
    format!("api/v3/{endpoint}/{symbol}")
}

#[async_trait]
impl FundamentalsProvider for FmpProvider {
    fn name(&self) -> &str {
        "FMP"
    }

    fn description(&self) -> &str {
        "Financial Modeling Prep - Financial data and stock market API"
    }

    async fn fetch_profile(&self, symbol: &Symbol) -> Result<CompanyProfile> {
        let profiles: Vec<Fields> = self
            .get("stable/profile", &[("symbol", symbol.as_str())])
            .await?;

        // Usually a single-element list
        let fields = profiles
            .into_iter()
            .next()
            .ok_or_else(|| DataError::NotFound(format!("No FMP profile data found for {symbol}")))?;

        tracing::info!(symbol = %symbol, "Fetched profile from FMP");
        Ok(CompanyProfile::from_provider(symbol.clone(), fields))
    }

    async fn fetch_statement(
        &self,
        symbol: &Symbol,
        statement_type: StatementType,
    ) -> Result<Vec<Fields>> {
        let records: Vec<Fields> = self
            .get(
                &statement_path(statement_type, symbol),
                &[("limit", STATEMENT_LIMIT)],
            )
            .await?;

        if records.is_empty() {
            return Err(DataError::NotFound(format!(
                "No FMP data for {statement_type} of {symbol}"
            )));
        }

        tracing::info!(
            symbol = %symbol,
            statement_type = %statement_type,
            count = records.len(),
            "Fetched statements from FMP"
        );
        Ok(records)
    }

    async fn fetch_traded_list(&self) -> Result<Vec<ReferenceItem>> {
        let listed: Vec<FmpTradedSymbol> = self.get("api/v3/available-traded/list", &[]).await?;

        let items: Vec<ReferenceItem> = listed
            .into_iter()
            .filter(|t| !t.symbol.trim().is_empty())
            .map(ReferenceItem::from)
            .collect();

        tracing::info!(count = items.len(), "Fetched traded list from FMP");
        Ok(items)
    }
}

// ============================================================================
// FMP API Response Types
// ============================================================================

/// FMP traded-list entry. The `price` field is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FmpTradedSymbol {
    symbol: String,
    #[serde(default)]
    exchange: Option<String>,
    #[serde(default)]
    exchange_short_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

impl From<FmpTradedSymbol> for ReferenceItem {
    fn from(t: FmpTradedSymbol) -> Self {
        Self::new(
            t.symbol,
            t.exchange.unwrap_or_default(),
            t.exchange_short_name.unwrap_or_default(),
            t.name.unwrap_or_default(),
            t.kind.unwrap_or_default(),
        )
    }
}
