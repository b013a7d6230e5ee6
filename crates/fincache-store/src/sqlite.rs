//! SQLite-based document store.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use fincache_core::types::{ID_FIELD, merge_fields};
use fincache_core::{
    Clock, CompanyProfile, DataError, DocumentStore, Fields, FinancialStatement, RecordId,
    ReferenceItem, Result, StatementType, Symbol, SystemClock, UserInput,
};
use rusqlite::{Connection, ErrorCode, OptionalExtension, params};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, instrument};

/// Row id of the singleton user-input document.
const USER_INPUT_ID: i64 = 1;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS reference_items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        symbol TEXT NOT NULL UNIQUE,
        exchange TEXT NOT NULL,
        exchange_short_name TEXT NOT NULL,
        name TEXT NOT NULL,
        kind TEXT NOT NULL,
        modified_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS company_profiles (
        symbol TEXT PRIMARY KEY,
        data_json TEXT NOT NULL,
        modified_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS financial_statements (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        natural_key TEXT NOT NULL UNIQUE,
        symbol TEXT NOT NULL,
        statement_type TEXT NOT NULL,
        fiscal_year INTEGER,
        period TEXT,
        data_json TEXT NOT NULL,
        modified_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_statements_symbol_type
        ON financial_statements(symbol, statement_type);

    CREATE TABLE IF NOT EXISTS user_inputs (
        id INTEGER PRIMARY KEY CHECK (id = 1),
        data_json TEXT NOT NULL,
        modified_at TEXT NOT NULL
    );
";

/// SQLite-backed [`DocumentStore`].
///
/// Natural keys are enforced with `PRIMARY KEY`/`UNIQUE` constraints, and every
/// read-merge-write runs in a transaction while holding the connection lock,
/// so concurrent upserts for one key never create a second row.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
    clock: Arc<dyn Clock>,
}

impl SqliteStore {
    /// Open (or create) a SQLite store at the given path.
    ///
    /// # Arguments
    /// * `path` - Path to the SQLite database file
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or schema creation fails.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path).map_err(store_err)?;
        Self::from_connection(conn)
    }

    /// Create an in-memory SQLite store.
    ///
    /// Useful for testing; data is lost when the store is dropped.
    ///
    /// # Errors
    /// Returns an error if schema creation fails.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(store_err)?;
        Self::from_connection(conn)
    }

    /// Replace the clock used for `modified_at` stamps.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA).map_err(store_err)?;
        debug!("SQLite store schema initialized");
        Ok(Self {
            conn: Mutex::new(conn),
            clock: Arc::new(SystemClock),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DataError::StoreUnavailable(e.to_string()))
    }

    fn stamp(&self) -> (DateTime<Utc>, String) {
        let now = self.clock.now();
        (now, format_timestamp(now))
    }
}

fn store_err(e: rusqlite::Error) -> DataError {
    DataError::StoreUnavailable(e.to_string())
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| DataError::Parse(format!("Invalid timestamp {s}: {e}")))
}

fn decode_fields(json: &str) -> Result<Fields> {
    serde_json::from_str(json).map_err(|e| DataError::Parse(e.to_string()))
}

fn encode_fields(fields: &Fields) -> Result<String> {
    serde_json::to_string(fields).map_err(|e| DataError::Parse(e.to_string()))
}

fn reference_item_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ReferenceItem> {
    Ok(ReferenceItem {
        id: Some(RecordId::new(row.get(0)?)),
        symbol: Symbol::new(row.get::<_, String>(1)?),
        exchange: row.get(2)?,
        exchange_short_name: row.get(3)?,
        name: row.get(4)?,
        kind: row.get(5)?,
    })
}

fn upsert_reference_row(conn: &Connection, item: &ReferenceItem, modified_at: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO reference_items
         (symbol, exchange, exchange_short_name, name, kind, modified_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(symbol) DO UPDATE SET
             exchange = excluded.exchange,
             exchange_short_name = excluded.exchange_short_name,
             name = excluded.name,
             kind = excluded.kind,
             modified_at = excluded.modified_at",
        params![
            item.symbol.as_str(),
            item.exchange,
            item.exchange_short_name,
            item.name,
            item.kind,
            modified_at
        ],
    )
    .map_err(store_err)?;
    Ok(())
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn ping(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map_err(store_err)?;
        Ok(())
    }

    #[instrument(skip(self, item), fields(symbol = %item.symbol))]
    async fn insert_reference_item(&self, item: &ReferenceItem) -> Result<ReferenceItem> {
        let (_, modified_at) = self.stamp();
        let conn = self.lock()?;

        let inserted = conn.execute(
            "INSERT INTO reference_items
             (symbol, exchange, exchange_short_name, name, kind, modified_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                item.symbol.as_str(),
                item.exchange,
                item.exchange_short_name,
                item.name,
                item.kind,
                modified_at
            ],
        );

        match inserted {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                return Err(DataError::AlreadyExists(format!(
                    "Reference item {}",
                    item.symbol
                )));
            }
            Err(e) => return Err(store_err(e)),
        }

        let id = RecordId::new(conn.last_insert_rowid());
        debug!(%id, "Inserted reference item");
        Ok(item.clone().with_id(id))
    }

    #[instrument(skip(self, item), fields(symbol = %item.symbol))]
    async fn upsert_reference_item(&self, item: &ReferenceItem) -> Result<()> {
        let (_, modified_at) = self.stamp();
        let conn = self.lock()?;
        upsert_reference_row(&conn, item, &modified_at)?;
        debug!("Upserted reference item");
        Ok(())
    }

    #[instrument(skip(self, items), fields(count = items.len()))]
    async fn upsert_reference_items(&self, items: &[ReferenceItem]) -> Result<usize> {
        let (_, modified_at) = self.stamp();
        let conn = self.lock()?;
        let tx = conn.unchecked_transaction().map_err(store_err)?;

        for item in items {
            upsert_reference_row(&tx, item, &modified_at)?;
        }

        tx.commit().map_err(store_err)?;
        debug!("Upserted {} reference items", items.len());
        Ok(items.len())
    }

    #[instrument(skip(self), fields(symbol = %symbol))]
    async fn find_reference_item(&self, symbol: &Symbol) -> Result<Option<ReferenceItem>> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT id, symbol, exchange, exchange_short_name, name, kind
             FROM reference_items WHERE symbol = ?1",
            params![symbol.as_str()],
            reference_item_from_row,
        )
        .optional()
        .map_err(store_err)
    }

    #[instrument(skip(self))]
    async fn list_reference_items(&self) -> Result<Vec<ReferenceItem>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, symbol, exchange, exchange_short_name, name, kind
                 FROM reference_items ORDER BY id ASC",
            )
            .map_err(store_err)?;

        let rows = stmt
            .query_map([], reference_item_from_row)
            .map_err(store_err)?;

        let items = rows
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(store_err)?;
        debug!("Found {} reference items", items.len());
        Ok(items)
    }

    #[instrument(skip(self), fields(symbol = %symbol))]
    async fn find_profile(&self, symbol: &Symbol) -> Result<Option<CompanyProfile>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT data_json, modified_at FROM company_profiles WHERE symbol = ?1",
                params![symbol.as_str()],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()
            .map_err(store_err)?;

        match row {
            Some((json, modified_at)) => {
                debug!("Found stored profile");
                Ok(Some(CompanyProfile {
                    symbol: symbol.clone(),
                    modified_at: Some(parse_timestamp(&modified_at)?),
                    fields: decode_fields(&json)?,
                }))
            }
            None => {
                debug!("No stored profile found");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, profile), fields(symbol = %profile.symbol))]
    async fn upsert_profile(&self, profile: &CompanyProfile) -> Result<DateTime<Utc>> {
        let (now, modified_at) = self.stamp();
        let conn = self.lock()?;
        let tx = conn.unchecked_transaction().map_err(store_err)?;

        let existing = tx
            .query_row(
                "SELECT data_json FROM company_profiles WHERE symbol = ?1",
                params![profile.symbol.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(store_err)?;

        let mut fields = match existing {
            Some(json) => decode_fields(&json)?,
            None => Fields::new(),
        };
        merge_fields(&mut fields, &profile.fields);

        tx.execute(
            "INSERT INTO company_profiles (symbol, data_json, modified_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(symbol) DO UPDATE SET
                 data_json = excluded.data_json,
                 modified_at = excluded.modified_at",
            params![profile.symbol.as_str(), encode_fields(&fields)?, modified_at],
        )
        .map_err(store_err)?;

        tx.commit().map_err(store_err)?;
        debug!(%modified_at, "Upserted profile");
        Ok(now)
    }

    #[instrument(skip(self), fields(symbol = %symbol, statement_type = ?statement_type))]
    async fn find_statements(
        &self,
        symbol: &Symbol,
        statement_type: Option<StatementType>,
    ) -> Result<Vec<FinancialStatement>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT statement_type, fiscal_year, period, data_json
                 FROM financial_statements
                 WHERE symbol = ?1 AND (?2 IS NULL OR statement_type = ?2)
                 ORDER BY id ASC",
            )
            .map_err(store_err)?;

        let rows = stmt
            .query_map(
                params![symbol.as_str(), statement_type.map(|t| t.as_str())],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, Option<i32>>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .map_err(store_err)?;

        let mut statements = Vec::new();
        for row in rows {
            let (kind, fiscal_year, period, json) = row.map_err(store_err)?;
            let statement_type = kind
                .parse::<StatementType>()
                .map_err(|e| DataError::Parse(e.to_string()))?;
            statements.push(FinancialStatement {
                symbol: symbol.clone(),
                statement_type,
                fiscal_year,
                period,
                fields: decode_fields(&json)?,
            });
        }

        debug!("Found {} stored statements", statements.len());
        Ok(statements)
    }

    #[instrument(skip(self, statement), fields(key = %statement.key()))]
    async fn upsert_statement(&self, statement: &FinancialStatement) -> Result<()> {
        let (_, modified_at) = self.stamp();
        let natural_key = statement.key().encode();
        let conn = self.lock()?;
        let tx = conn.unchecked_transaction().map_err(store_err)?;

        let existing = tx
            .query_row(
                "SELECT data_json FROM financial_statements WHERE natural_key = ?1",
                params![natural_key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(store_err)?;

        let mut fields = match existing {
            Some(json) => decode_fields(&json)?,
            None => Fields::new(),
        };
        merge_fields(&mut fields, &statement.fields);

        tx.execute(
            "INSERT INTO financial_statements
             (natural_key, symbol, statement_type, fiscal_year, period, data_json, modified_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(natural_key) DO UPDATE SET
                 data_json = excluded.data_json,
                 modified_at = excluded.modified_at",
            params![
                natural_key,
                statement.symbol.as_str(),
                statement.statement_type.as_str(),
                statement.fiscal_year,
                statement.period,
                encode_fields(&fields)?,
                modified_at
            ],
        )
        .map_err(store_err)?;

        tx.commit().map_err(store_err)?;
        debug!("Upserted statement");
        Ok(())
    }

    #[instrument(skip(self, fields), fields(count = fields.len()))]
    async fn push_user_input(&self, fields: &Fields) -> Result<RecordId> {
        let (_, modified_at) = self.stamp();
        let conn = self.lock()?;
        let tx = conn.unchecked_transaction().map_err(store_err)?;

        let existing = tx
            .query_row(
                "SELECT data_json FROM user_inputs WHERE id = ?1",
                params![USER_INPUT_ID],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(store_err)?;

        let mut merged = match existing {
            Some(json) => decode_fields(&json)?,
            None => Fields::new(),
        };
        merge_fields(&mut merged, fields);
        merged.remove(ID_FIELD);

        tx.execute(
            "INSERT INTO user_inputs (id, data_json, modified_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
                 data_json = excluded.data_json,
                 modified_at = excluded.modified_at",
            params![USER_INPUT_ID, encode_fields(&merged)?, modified_at],
        )
        .map_err(store_err)?;

        tx.commit().map_err(store_err)?;
        debug!("Merged user input");
        Ok(RecordId::new(USER_INPUT_ID))
    }

    #[instrument(skip(self))]
    async fn get_user_input(&self) -> Result<Option<UserInput>> {
        let conn = self.lock()?;
        let json = conn
            .query_row(
                "SELECT data_json FROM user_inputs WHERE id = ?1",
                params![USER_INPUT_ID],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(store_err)?;

        json.map(|json| {
            Ok(UserInput {
                id: RecordId::new(USER_INPUT_ID),
                fields: decode_fields(&json)?,
            })
        })
        .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fincache_core::FixedClock;
    use serde_json::{Value, json};

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn statement(year: Option<i32>, period: &str, revenue: i64) -> FinancialStatement {
        FinancialStatement {
            symbol: Symbol::new("AAPL"),
            statement_type: StatementType::Income,
            fiscal_year: year,
            period: Some(period.to_string()),
            fields: fields(json!({"revenue": revenue})),
        }
    }

    #[tokio::test]
    async fn test_sqlite_store_initialization() {
        let store = SqliteStore::in_memory();
        assert!(store.is_ok());
        store.unwrap().ping().await.unwrap();
    }

    #[tokio::test]
    async fn test_reference_item_insert_and_find() {
        let store = SqliteStore::in_memory().unwrap();
        let item = ReferenceItem::new("AAPL", "NASDAQ Global Select", "NASDAQ", "Apple Inc.", "stock");

        let stored = store.insert_reference_item(&item).await.unwrap();
        assert!(stored.id.is_some());
        assert_eq!(stored.symbol, item.symbol);

        let found = store
            .find_reference_item(&Symbol::new("aapl"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, stored);

        assert!(
            store
                .find_reference_item(&Symbol::new("MSFT"))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_reference_item_duplicate_insert_rejected() {
        let store = SqliteStore::in_memory().unwrap();
        let item = ReferenceItem::new("AAPL", "NASDAQ", "NASDAQ", "Apple Inc.", "stock");
        store.insert_reference_item(&item).await.unwrap();

        let err = store.insert_reference_item(&item).await.unwrap_err();
        assert!(matches!(err, DataError::AlreadyExists(_)));
        assert_eq!(store.list_reference_items().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reference_items_bulk_upsert_replaces() {
        let store = SqliteStore::in_memory().unwrap();
        let items = vec![
            ReferenceItem::new("AAPL", "NASDAQ", "NASDAQ", "Apple", "stock"),
            ReferenceItem::new("SPY", "NYSE Arca", "AMEX", "SPDR S&P 500", "etf"),
        ];
        assert_eq!(store.upsert_reference_items(&items).await.unwrap(), 2);

        let renamed = ReferenceItem::new("AAPL", "NASDAQ", "NASDAQ", "Apple Inc.", "stock");
        store.upsert_reference_item(&renamed).await.unwrap();

        let listed = store.list_reference_items().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "Apple Inc.");
        assert_eq!(listed[1].symbol.as_str(), "SPY");
    }

    #[tokio::test]
    async fn test_profile_upsert_stamps_modified_at() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let clock = Arc::new(FixedClock::at_date(day));
        let store = SqliteStore::in_memory().unwrap().with_clock(clock.clone());
        let symbol = Symbol::new("AAPL");

        assert!(store.find_profile(&symbol).await.unwrap().is_none());

        let profile = CompanyProfile::from_provider(
            symbol.clone(),
            fields(json!({"companyName": "Apple Inc.", "price": 190.0})),
        );
        let stamped = store.upsert_profile(&profile).await.unwrap();
        assert_eq!(stamped.date_naive(), day);

        let stored = store.find_profile(&symbol).await.unwrap().unwrap();
        assert_eq!(stored.modified_at, Some(stamped));
        assert_eq!(stored.fields, profile.fields);

        // Same content, later day: timestamp still moves.
        let next = day.succ_opt().unwrap();
        clock.set_date(next);
        store.upsert_profile(&profile).await.unwrap();
        let stored = store.find_profile(&symbol).await.unwrap().unwrap();
        assert_eq!(stored.modified_on(), Some(next));
    }

    #[tokio::test]
    async fn test_profile_upsert_merges_fields() {
        let store = SqliteStore::in_memory().unwrap();
        let symbol = Symbol::new("AAPL");

        let first = CompanyProfile::from_provider(
            symbol.clone(),
            fields(json!({"companyName": "Apple", "ceo": "Tim Cook"})),
        );
        store.upsert_profile(&first).await.unwrap();

        let second = CompanyProfile::from_provider(
            symbol.clone(),
            fields(json!({"companyName": "Apple Inc."})),
        );
        store.upsert_profile(&second).await.unwrap();

        let stored = store.find_profile(&symbol).await.unwrap().unwrap();
        assert_eq!(
            Value::Object(stored.fields),
            json!({"companyName": "Apple Inc.", "ceo": "Tim Cook"})
        );
    }

    #[tokio::test]
    async fn test_statement_upsert_never_duplicates_key() {
        let store = SqliteStore::in_memory().unwrap();
        let symbol = Symbol::new("AAPL");

        store
            .upsert_statement(&statement(Some(2023), "FY", 100))
            .await
            .unwrap();
        store
            .upsert_statement(&statement(Some(2023), "FY", 200))
            .await
            .unwrap();

        let stored = store
            .find_statements(&symbol, Some(StatementType::Income))
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].field("revenue"), Some(&json!(200)));
    }

    #[tokio::test]
    async fn test_statement_null_year_is_its_own_key() {
        let store = SqliteStore::in_memory().unwrap();
        let symbol = Symbol::new("AAPL");

        store.upsert_statement(&statement(None, "FY", 1)).await.unwrap();
        store.upsert_statement(&statement(None, "FY", 2)).await.unwrap();
        store.upsert_statement(&statement(Some(0), "FY", 3)).await.unwrap();

        let stored = store.find_statements(&symbol, None).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].fiscal_year, None);
        assert_eq!(stored[0].field("revenue"), Some(&json!(2)));
        assert_eq!(stored[1].fiscal_year, Some(0));
    }

    #[tokio::test]
    async fn test_find_statements_filters_by_type() {
        let store = SqliteStore::in_memory().unwrap();
        let symbol = Symbol::new("AAPL");

        store
            .upsert_statement(&statement(Some(2023), "FY", 1))
            .await
            .unwrap();
        let mut balance = statement(Some(2023), "FY", 1);
        balance.statement_type = StatementType::Balance;
        store.upsert_statement(&balance).await.unwrap();

        assert_eq!(store.find_statements(&symbol, None).await.unwrap().len(), 2);
        let only_balance = store
            .find_statements(&symbol, Some(StatementType::Balance))
            .await
            .unwrap();
        assert_eq!(only_balance.len(), 1);
        assert_eq!(only_balance[0].statement_type, StatementType::Balance);
        assert!(
            store
                .find_statements(&Symbol::new("MSFT"), None)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_user_input_merge() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.get_user_input().await.unwrap().is_none());

        let id = store.push_user_input(&fields(json!({"a": 1}))).await.unwrap();
        store.push_user_input(&fields(json!({"b": 2}))).await.unwrap();
        let doc = store.get_user_input().await.unwrap().unwrap();
        assert_eq!(doc.id, id);
        assert_eq!(Value::Object(doc.fields), json!({"a": 1, "b": 2}));

        let again = store.push_user_input(&fields(json!({"a": 3}))).await.unwrap();
        assert_eq!(again, id);
        let doc = store.get_user_input().await.unwrap().unwrap();
        assert_eq!(Value::Object(doc.fields), json!({"a": 3, "b": 2}));
    }

    #[tokio::test]
    async fn test_user_input_ignores_id_field() {
        let store = SqliteStore::in_memory().unwrap();
        store
            .push_user_input(&fields(json!({"_id": "99", "theme": "dark"})))
            .await
            .unwrap();
        let doc = store.get_user_input().await.unwrap().unwrap();
        assert_eq!(doc.id, RecordId::new(USER_INPUT_ID));
        assert_eq!(Value::Object(doc.fields), json!({"theme": "dark"}));
    }

    #[tokio::test]
    async fn test_store_persists_across_reopen() {
        let path = std::env::temp_dir().join(format!(
            "fincache-store-test-{}.sqlite",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        {
            let store = SqliteStore::new(&path).unwrap();
            store
                .push_user_input(&fields(json!({"watchlist": ["AAPL"]})))
                .await
                .unwrap();
        }

        let store = SqliteStore::new(&path).unwrap();
        let doc = store.get_user_input().await.unwrap().unwrap();
        assert_eq!(doc.fields["watchlist"], json!(["AAPL"]));

        drop(store);
        let _ = std::fs::remove_file(&path);
    }
}
