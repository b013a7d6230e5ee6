//! Document store trait for persisted records.
//!
//! This module defines the [`DocumentStore`] trait: typed read/write access to
//! the four logical collections (reference items, company profiles, financial
//! statements, and the singleton user input).
//!
//! # Upsert semantics
//!
//! Every `upsert_*` operation merges the given fields into the record matching
//! the natural key (creating it if absent) and stamps a server-side
//! modification time, even when the content did not change. Implementations
//! must enforce the natural key as unique so concurrent upserts for the same
//! key never produce two records; the last write wins.
//!
//! A missing record is reported as `Ok(None)` or an empty `Vec`, never as an
//! error. Persistence failures surface as
//! [`DataError::StoreUnavailable`](crate::error::DataError::StoreUnavailable).

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    error::Result,
    types::{
        CompanyProfile, Fields, FinancialStatement, RecordId, ReferenceItem, StatementType,
        Symbol, UserInput,
    },
};

/// Persistent store backing the read-through cache.
///
/// A single instance is created at process start and shared by all requests.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Checks that the store is reachable.
    async fn ping(&self) -> Result<()>;

    /// Inserts a new reference item and returns it with its generated id.
    ///
    /// Fails with `AlreadyExists` if an item with the same symbol is stored.
    async fn insert_reference_item(&self, item: &ReferenceItem) -> Result<ReferenceItem>;

    /// Replaces the reference item with the same symbol, creating it if absent.
    async fn upsert_reference_item(&self, item: &ReferenceItem) -> Result<()>;

    /// Upserts a batch of reference items by symbol and returns how many
    /// were written.
    ///
    /// The default implementation upserts one item at a time; stores may
    /// override it to write the batch in a single transaction.
    async fn upsert_reference_items(&self, items: &[ReferenceItem]) -> Result<usize> {
        for item in items {
            self.upsert_reference_item(item).await?;
        }
        Ok(items.len())
    }

    /// Looks up a reference item by symbol.
    async fn find_reference_item(&self, symbol: &Symbol) -> Result<Option<ReferenceItem>>;

    /// Returns every reference item in insertion order.
    async fn list_reference_items(&self) -> Result<Vec<ReferenceItem>>;

    /// Looks up the stored profile for a symbol.
    async fn find_profile(&self, symbol: &Symbol) -> Result<Option<CompanyProfile>>;

    /// Upserts a profile by symbol and returns the `modified_at` it was
    /// stamped with. Any `modified_at` on `profile` is ignored.
    async fn upsert_profile(&self, profile: &CompanyProfile) -> Result<DateTime<Utc>>;

    /// Returns stored statements for a symbol in insertion order, optionally
    /// restricted to one statement type.
    async fn find_statements(
        &self,
        symbol: &Symbol,
        statement_type: Option<StatementType>,
    ) -> Result<Vec<FinancialStatement>>;

    /// Upserts a statement by its composite key.
    async fn upsert_statement(&self, statement: &FinancialStatement) -> Result<()>;

    /// Merges `fields` into the singleton user-input document, creating it on
    /// first write. Returns the document id.
    async fn push_user_input(&self, fields: &Fields) -> Result<RecordId>;

    /// Returns the user-input document, if one has been written.
    async fn get_user_input(&self) -> Result<Option<UserInput>>;
}
