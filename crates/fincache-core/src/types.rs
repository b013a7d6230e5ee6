//! Record types stored by the cache.
//!
//! This module defines the documents persisted by a
//! [`DocumentStore`](crate::store::DocumentStore):
//!
//! - [`Symbol`] - Trading symbol/ticker
//! - [`RecordId`] - Store-generated identifier
//! - [`ReferenceItem`] - Entry of the traded-symbols reference list
//! - [`CompanyProfile`] - Provider company profile plus `modified_at`
//! - [`FinancialStatement`] - One normalized statement row
//! - [`StatementKey`] - Composite natural key of a statement row
//! - [`UserInput`] - The singleton merged user-input document

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::DataError;

/// Loosely typed provider/user fields carried alongside the modeled ones.
pub type Fields = serde_json::Map<String, Value>;

/// Key under which store identifiers are exposed.
pub const ID_FIELD: &str = "_id";

/// Key under which the profile modification stamp is exposed.
pub const MODIFIED_AT_FIELD: &str = "modified_at";

/// Copy every field of `update` into `target`, overwriting same-named fields.
///
/// Fields of `target` that `update` does not mention are left untouched.
pub fn merge_fields(target: &mut Fields, update: &Fields) {
    for (key, value) in update {
        target.insert(key.clone(), value.clone());
    }
}

/// A trading symbol/ticker.
///
/// Symbols are automatically uppercased on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new symbol from a string, converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().trim().to_uppercase())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the symbol is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Symbol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<Symbol> for String {
    fn from(s: Symbol) -> Self {
        s.0
    }
}

/// Identifier generated by the store for inserted documents.
///
/// Always serialized as a string so the external representation is safe
/// for any JSON consumer; deserializes from either a string or an integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(i64);

impl RecordId {
    /// Wrap a raw store identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordIdVisitor;

        impl Visitor<'_> for RecordIdVisitor {
            type Value = RecordId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a record id as a string or integer")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<RecordId, E> {
                Ok(RecordId(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<RecordId, E> {
                i64::try_from(v)
                    .map(RecordId)
                    .map_err(|_| E::custom(format!("record id out of range: {v}")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<RecordId, E> {
                v.parse()
                    .map(RecordId)
                    .map_err(|_| E::custom(format!("invalid record id: {v}")))
            }
        }

        deserializer.deserialize_any(RecordIdVisitor)
    }
}

/// Kind of financial statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementType {
    /// Income statement.
    Income,
    /// Balance sheet statement.
    Balance,
    /// Cash flow statement.
    CashFlow,
}

impl StatementType {
    /// All statement types, in the order combined results are returned.
    pub const ALL: [Self; 3] = [Self::Income, Self::Balance, Self::CashFlow];

    /// Returns the wire name (`income`, `balance`, `cash_flow`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Balance => "balance",
            Self::CashFlow => "cash_flow",
        }
    }
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatementType {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(Self::Income),
            "balance" => Ok(Self::Balance),
            "cash_flow" => Ok(Self::CashFlow),
            _ => Err(DataError::InvalidArgument(format!(
                "Invalid statement type: {s}. Supported: income, balance, cash_flow"
            ))),
        }
    }
}

/// Entry of the traded-symbols reference list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceItem {
    /// Store identifier; absent until the item has been inserted.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Ticker symbol (unique).
    pub symbol: Symbol,
    /// Exchange full name.
    pub exchange: String,
    /// Exchange short name (e.g., "NASDAQ").
    pub exchange_short_name: String,
    /// Instrument name.
    pub name: String,
    /// Instrument type (e.g., "stock", "etf").
    #[serde(rename = "type")]
    pub kind: String,
}

impl ReferenceItem {
    /// Creates a reference item that has not been stored yet.
    #[must_use]
    pub fn new(
        symbol: impl Into<Symbol>,
        exchange: impl Into<String>,
        exchange_short_name: impl Into<String>,
        name: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            symbol: symbol.into(),
            exchange: exchange.into(),
            exchange_short_name: exchange_short_name.into(),
            name: name.into(),
            kind: kind.into(),
        }
    }

    /// Attach a store identifier.
    #[must_use]
    pub fn with_id(mut self, id: RecordId) -> Self {
        self.id = Some(id);
        self
    }
}

/// Company profile as returned by the provider, keyed by symbol.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    /// Ticker symbol (unique).
    pub symbol: Symbol,
    /// Server time of the last successful write; `None` for data that has
    /// not been stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
    /// Provider fields, verbatim.
    #[serde(flatten)]
    pub fields: Fields,
}

impl CompanyProfile {
    /// Build a profile from raw provider fields.
    ///
    /// Any `symbol`, `modified_at` or `_id` in `fields` is discarded; the
    /// symbol is the one requested and the timestamp is assigned by the store.
    #[must_use]
    pub fn from_provider(symbol: Symbol, mut fields: Fields) -> Self {
        fields.remove("symbol");
        fields.remove(MODIFIED_AT_FIELD);
        fields.remove(ID_FIELD);
        Self {
            symbol,
            modified_at: None,
            fields,
        }
    }

    /// UTC calendar date of the last write.
    #[must_use]
    pub fn modified_on(&self) -> Option<NaiveDate> {
        self.modified_at.map(|ts| ts.date_naive())
    }

    /// Look up a provider field.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// One financial statement row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialStatement {
    /// Ticker symbol.
    pub symbol: Symbol,
    /// Statement kind.
    pub statement_type: StatementType,
    /// Fiscal year derived from the provider's `calendarYear`; serialized as
    /// `null` when absent so it never collides with year zero.
    #[serde(default)]
    pub fiscal_year: Option<i32>,
    /// Reporting period as labelled by the provider (e.g., "FY", "Q1").
    #[serde(default)]
    pub period: Option<String>,
    /// Provider fields, verbatim.
    #[serde(flatten)]
    pub fields: Fields,
}

impl FinancialStatement {
    /// Composite natural key of this row.
    #[must_use]
    pub fn key(&self) -> StatementKey {
        StatementKey {
            symbol: self.symbol.clone(),
            statement_type: self.statement_type,
            fiscal_year: self.fiscal_year,
            period: self.period.clone(),
        }
    }

    /// Look up a provider field.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// Composite key `(symbol, statementType, fiscalYear, period)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StatementKey {
    /// Ticker symbol.
    pub symbol: Symbol,
    /// Statement kind.
    pub statement_type: StatementType,
    /// Fiscal year, if known.
    pub fiscal_year: Option<i32>,
    /// Reporting period, if known.
    pub period: Option<String>,
}

impl StatementKey {
    /// Canonical string form, unique per key.
    ///
    /// Encoded as a JSON array so that an absent year (`null`) and year zero
    /// (`0`) never produce the same string.
    #[must_use]
    pub fn encode(&self) -> String {
        serde_json::json!([
            self.symbol.as_str(),
            self.statement_type.as_str(),
            self.fiscal_year,
            self.period,
        ])
        .to_string()
    }
}

impl fmt::Display for StatementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// The singleton document of accumulated user-submitted fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserInput {
    /// Store identifier.
    #[serde(rename = "_id")]
    pub id: RecordId,
    /// Merged user fields.
    #[serde(flatten)]
    pub fields: Fields,
}
