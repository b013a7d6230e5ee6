//! In-memory document store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fincache_core::types::{ID_FIELD, merge_fields};
use fincache_core::{
    Clock, CompanyProfile, DataError, DocumentStore, Fields, FinancialStatement, RecordId,
    ReferenceItem, Result, StatementType, Symbol, SystemClock, UserInput,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

const USER_INPUT_ID: i64 = 1;

/// Stored document with its modification stamp.
#[derive(Debug, Clone)]
struct Entry<T> {
    data: T,
    modified_at: DateTime<Utc>,
}

/// Statement rows keyed by encoded composite key, kept in insertion order.
#[derive(Debug, Default)]
struct StatementTable {
    rows: Vec<Entry<FinancialStatement>>,
    index: HashMap<String, usize>,
}

#[derive(Debug, Default)]
struct ReferenceTable {
    rows: Vec<Entry<ReferenceItem>>,
    index: HashMap<Symbol, usize>,
    next_id: i64,
}

impl ReferenceTable {
    fn upsert(&mut self, item: &ReferenceItem, modified_at: DateTime<Utc>) {
        match self.index.get(&item.symbol) {
            Some(&pos) => {
                let entry = &mut self.rows[pos];
                entry.data = ReferenceItem {
                    id: entry.data.id,
                    ..item.clone()
                };
                entry.modified_at = modified_at;
            }
            None => {
                self.insert(item, modified_at);
            }
        }
    }

    fn insert(&mut self, item: &ReferenceItem, modified_at: DateTime<Utc>) -> ReferenceItem {
        self.next_id += 1;
        let stored = item.clone().with_id(RecordId::new(self.next_id));
        self.index.insert(stored.symbol.clone(), self.rows.len());
        self.rows.push(Entry {
            data: stored.clone(),
            modified_at,
        });
        stored
    }
}

/// Simple in-memory store for testing and development.
///
/// Collections live in `RwLock`-protected maps and are lost when the store is
/// dropped. Each write takes the collection's write lock for the whole
/// read-merge-write, which gives the same no-duplicates guarantee as the
/// SQLite unique constraints.
#[derive(Debug)]
pub struct InMemoryStore {
    reference: RwLock<ReferenceTable>,
    profiles: RwLock<HashMap<Symbol, Entry<Fields>>>,
    statements: RwLock<StatementTable>,
    user_input: RwLock<Option<Entry<Fields>>>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Create a new empty in-memory store using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reference: RwLock::default(),
            profiles: RwLock::default(),
            statements: RwLock::default(),
            user_input: RwLock::default(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used for `modified_at` stamps.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    #[instrument(skip(self, item), fields(symbol = %item.symbol))]
    async fn insert_reference_item(&self, item: &ReferenceItem) -> Result<ReferenceItem> {
        let modified_at = self.clock.now();
        let mut table = self.reference.write().await;
        if table.index.contains_key(&item.symbol) {
            return Err(DataError::AlreadyExists(format!(
                "Reference item {}",
                item.symbol
            )));
        }
        Ok(table.insert(item, modified_at))
    }

    #[instrument(skip(self, item), fields(symbol = %item.symbol))]
    async fn upsert_reference_item(&self, item: &ReferenceItem) -> Result<()> {
        let modified_at = self.clock.now();
        self.reference.write().await.upsert(item, modified_at);
        Ok(())
    }

    #[instrument(skip(self, items), fields(count = items.len()))]
    async fn upsert_reference_items(&self, items: &[ReferenceItem]) -> Result<usize> {
        let modified_at = self.clock.now();
        let mut table = self.reference.write().await;
        for item in items {
            table.upsert(item, modified_at);
        }
        debug!("Upserted {} reference items", items.len());
        Ok(items.len())
    }

    async fn find_reference_item(&self, symbol: &Symbol) -> Result<Option<ReferenceItem>> {
        let table = self.reference.read().await;
        Ok(table.index.get(symbol).map(|&pos| table.rows[pos].data.clone()))
    }

    async fn list_reference_items(&self) -> Result<Vec<ReferenceItem>> {
        let table = self.reference.read().await;
        Ok(table.rows.iter().map(|entry| entry.data.clone()).collect())
    }

    #[instrument(skip(self), fields(symbol = %symbol))]
    async fn find_profile(&self, symbol: &Symbol) -> Result<Option<CompanyProfile>> {
        let profiles = self.profiles.read().await;
        let found = profiles.get(symbol).map(|entry| CompanyProfile {
            symbol: symbol.clone(),
            modified_at: Some(entry.modified_at),
            fields: entry.data.clone(),
        });
        debug!(hit = found.is_some(), "Profile lookup");
        Ok(found)
    }

    #[instrument(skip(self, profile), fields(symbol = %profile.symbol))]
    async fn upsert_profile(&self, profile: &CompanyProfile) -> Result<DateTime<Utc>> {
        let modified_at = self.clock.now();
        let mut profiles = self.profiles.write().await;
        let entry = profiles
            .entry(profile.symbol.clone())
            .or_insert_with(|| Entry {
                data: Fields::new(),
                modified_at,
            });
        merge_fields(&mut entry.data, &profile.fields);
        entry.modified_at = modified_at;
        Ok(modified_at)
    }

    #[instrument(skip(self), fields(symbol = %symbol, statement_type = ?statement_type))]
    async fn find_statements(
        &self,
        symbol: &Symbol,
        statement_type: Option<StatementType>,
    ) -> Result<Vec<FinancialStatement>> {
        let table = self.statements.read().await;
        let found: Vec<_> = table
            .rows
            .iter()
            .map(|entry| &entry.data)
            .filter(|s| &s.symbol == symbol)
            .filter(|s| statement_type.is_none_or(|t| s.statement_type == t))
            .cloned()
            .collect();
        debug!("Found {} stored statements", found.len());
        Ok(found)
    }

    #[instrument(skip(self, statement), fields(key = %statement.key()))]
    async fn upsert_statement(&self, statement: &FinancialStatement) -> Result<()> {
        let modified_at = self.clock.now();
        let key = statement.key().encode();
        let mut table = self.statements.write().await;

        match table.index.get(&key).copied() {
            Some(pos) => {
                let entry = &mut table.rows[pos];
                merge_fields(&mut entry.data.fields, &statement.fields);
                entry.modified_at = modified_at;
            }
            None => {
                let pos = table.rows.len();
                table.rows.push(Entry {
                    data: statement.clone(),
                    modified_at,
                });
                table.index.insert(key, pos);
            }
        }
        Ok(())
    }

    #[instrument(skip(self, fields), fields(count = fields.len()))]
    async fn push_user_input(&self, fields: &Fields) -> Result<RecordId> {
        let modified_at = self.clock.now();
        let mut doc = self.user_input.write().await;
        let entry = doc.get_or_insert_with(|| Entry {
            data: Fields::new(),
            modified_at,
        });
        merge_fields(&mut entry.data, fields);
        entry.data.remove(ID_FIELD);
        entry.modified_at = modified_at;
        Ok(RecordId::new(USER_INPUT_ID))
    }

    async fn get_user_input(&self) -> Result<Option<UserInput>> {
        Ok(self.user_input.read().await.as_ref().map(|entry| UserInput {
            id: RecordId::new(USER_INPUT_ID),
            fields: entry.data.clone(),
        }))
    }
}
