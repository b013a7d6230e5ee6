//! Provider trait for fetching upstream fundamentals.
//!
//! [`FundamentalsProvider`] is the seam between the cache and the external
//! financial-data API. Each method makes a single attempt; retries, if any,
//! belong to the caller.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::Result,
    types::{CompanyProfile, Fields, ReferenceItem, StatementType, Symbol},
};

/// Upstream source of company profiles and financial statements.
#[async_trait]
pub trait FundamentalsProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "FMP").
    fn name(&self) -> &str;

    /// Returns a description of this provider.
    fn description(&self) -> &str;

    /// Fetches the company profile for a symbol.
    ///
    /// Fails with `NotFound` when the provider has no profile for the symbol
    /// and with `Upstream` on transport or provider failure.
    async fn fetch_profile(&self, symbol: &Symbol) -> Result<CompanyProfile>;

    /// Fetches raw statement records for a symbol, most recent first.
    ///
    /// Fails with `NotFound` when the provider returns no records and with
    /// `Upstream` on transport or provider failure.
    async fn fetch_statement(
        &self,
        symbol: &Symbol,
        statement_type: StatementType,
    ) -> Result<Vec<Fields>>;

    /// Fetches the list of symbols the provider currently trades.
    async fn fetch_traded_list(&self) -> Result<Vec<ReferenceItem>>;
}
