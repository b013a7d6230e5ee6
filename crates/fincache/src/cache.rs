//! Read-through cache over a document store and an upstream provider.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use fincache_core::{
    Clock, CompanyProfile, DataError, DocumentStore, Fields, FinancialStatement,
    FundamentalsProvider, RecordId, ReferenceItem, Result, StatementType, Symbol, SystemClock,
    UserInput, freshness::is_fresh_at,
};

use crate::sync::sync_statements;

/// Outcome of seeding the reference list from the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    /// Items returned by the provider.
    pub fetched: usize,
    /// Items written to the store.
    pub upserted: usize,
}

/// Serves profiles and statements from the store, falling back to the
/// provider when the stored copy is missing or stale.
///
/// The cache holds no state of its own. Concurrent requests for the same
/// symbol may both go upstream; the store's unique keys keep a single record
/// and the last write wins.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use fincache::{InMemoryStore, FmpProvider, ReadThroughCache, StatementType, Symbol};
///
/// let cache = ReadThroughCache::new(
///     Arc::new(InMemoryStore::new()),
///     Arc::new(FmpProvider::new("your-api-key")),
/// );
///
/// let symbol = Symbol::new("AAPL");
/// let income = cache.get_statement(&symbol, Some(StatementType::Income)).await?;
/// let everything = cache.get_statement(&symbol, None).await?;
/// ```
pub struct ReadThroughCache {
    store: Arc<dyn DocumentStore>,
    provider: Arc<dyn FundamentalsProvider>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for ReadThroughCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadThroughCache")
            .field("store", &"configured")
            .field("provider", &self.provider.name())
            .field("clock", &self.clock)
            .finish()
    }
}

impl ReadThroughCache {
    /// Create a cache over `store` and `provider` using the system clock.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, provider: Arc<dyn FundamentalsProvider>) -> Self {
        Self {
            store,
            provider,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock that decides what "today" is.
    ///
    /// Use the same clock as the store so freshness is judged against the
    /// stamps it writes.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Checks that the store is reachable.
    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await
    }

    /// Return the company profile for `symbol`.
    ///
    /// A stored profile is served when it was written today, or last Saturday
    /// when today is Sunday or Monday. Otherwise the profile is fetched,
    /// upserted, and returned with the stamp the store assigned.
    pub async fn get_profile(&self, symbol: &Symbol) -> Result<CompanyProfile> {
        ensure_symbol(symbol)?;
        let today = self.clock.today();

        if let Some(stored) = self.store.find_profile(symbol).await? {
            if is_fresh_at(stored.modified_at, today) {
                debug!(symbol = %symbol, "Cache hit for profile");
                return Ok(stored);
            }
            debug!(
                symbol = %symbol,
                modified_at = ?stored.modified_at,
                "Stored profile is stale"
            );
        }

        info!(
            provider = self.provider.name(),
            symbol = %symbol,
            "Fetching profile"
        );
        let mut profile = self.provider.fetch_profile(symbol).await?;
        profile.symbol = symbol.clone();
        let modified_at = self.store.upsert_profile(&profile).await?;
        profile.modified_at = Some(modified_at);
        Ok(profile)
    }

    /// Return financial statements for `symbol`.
    ///
    /// With a statement type, returns that type's rows. Without one, returns
    /// income, balance and cash flow rows concatenated in that order; the
    /// first failure aborts the whole call.
    pub async fn get_statement(
        &self,
        symbol: &Symbol,
        statement_type: Option<StatementType>,
    ) -> Result<Vec<FinancialStatement>> {
        ensure_symbol(symbol)?;
        let store = self.store.as_ref();
        let provider = self.provider.as_ref();

        match statement_type {
            Some(kind) => sync_statements(store, provider, symbol, kind).await,
            None => {
                let mut all = Vec::new();
                for kind in StatementType::ALL {
                    all.extend(sync_statements(store, provider, symbol, kind).await?);
                }
                Ok(all)
            }
        }
    }

    /// Merge `fields` into the user-input document.
    pub async fn push_user_input(&self, fields: &Fields) -> Result<RecordId> {
        self.store.push_user_input(fields).await
    }

    /// Return the user-input document, if any has been written.
    pub async fn get_user_input(&self) -> Result<Option<UserInput>> {
        self.store.get_user_input().await
    }

    /// List all reference items.
    pub async fn list_reference_items(&self) -> Result<Vec<ReferenceItem>> {
        self.store.list_reference_items().await
    }

    /// Look up a reference item by symbol.
    pub async fn find_reference_item(&self, symbol: &Symbol) -> Result<Option<ReferenceItem>> {
        self.store.find_reference_item(symbol).await
    }

    /// Insert a new reference item, failing with `AlreadyExists` on a
    /// duplicate symbol.
    pub async fn insert_reference_item(&self, item: &ReferenceItem) -> Result<ReferenceItem> {
        ensure_symbol(&item.symbol)?;
        self.store.insert_reference_item(item).await
    }

    /// Replace the reference list with the provider's traded symbols.
    ///
    /// Items are upserted by symbol, so seeding twice leaves one item per
    /// symbol.
    pub async fn seed_reference_items(&self) -> Result<SeedReport> {
        info!(provider = self.provider.name(), "Fetching traded symbols");
        let items = self.provider.fetch_traded_list().await?;
        let upserted = self.store.upsert_reference_items(&items).await?;
        info!(fetched = items.len(), upserted, "Seeded reference items");
        Ok(SeedReport {
            fetched: items.len(),
            upserted,
        })
    }
}

fn ensure_symbol(symbol: &Symbol) -> Result<()> {
    if symbol.is_empty() {
        return Err(DataError::InvalidArgument(
            "Symbol must not be empty".to_string(),
        ));
    }
    Ok(())
}
