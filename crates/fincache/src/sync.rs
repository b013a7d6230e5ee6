//! Statement synchronizer.
//!
//! Financial statements are cached forever: once any row exists for a
//! `(symbol, statementType)` pair the stored rows are returned as they are.
//! Otherwise the provider is asked for the statements, every raw record is
//! normalized into a [`FinancialStatement`] and upserted by its composite key.

use serde_json::Value;
use tracing::{debug, info};

use fincache_core::types::ID_FIELD;
use fincache_core::{
    DocumentStore, Fields, FinancialStatement, FundamentalsProvider, Result, StatementType, Symbol,
};

/// Parse a provider `calendarYear` into a fiscal year.
///
/// Only a non-empty string made of ASCII digits that fits an `i32` counts;
/// numbers, signs, whitespace and anything else yield `None`.
#[must_use]
pub fn parse_fiscal_year(value: Option<&Value>) -> Option<i32> {
    let raw = value?.as_str()?;
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Turn one raw provider record into a statement row for `symbol`.
///
/// The requested symbol and statement type always win over whatever the
/// provider put in the record. `calendarYear` is kept as a provider field.
#[must_use]
pub fn normalize_record(
    symbol: &Symbol,
    statement_type: StatementType,
    mut fields: Fields,
) -> FinancialStatement {
    let fiscal_year = parse_fiscal_year(fields.get("calendarYear"));
    let period = match fields.remove("period") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    };

    for key in ["symbol", "statementType", "fiscalYear", ID_FIELD] {
        fields.remove(key);
    }

    FinancialStatement {
        symbol: symbol.clone(),
        statement_type,
        fiscal_year,
        period,
        fields,
    }
}

/// Return the statements of one type for `symbol`, fetching them on first
/// request.
///
/// Rows come back in insertion order when cached and in provider order when
/// freshly fetched. A failed upsert aborts the call; rows written before the
/// failure stay in the store.
pub async fn sync_statements(
    store: &dyn DocumentStore,
    provider: &dyn FundamentalsProvider,
    symbol: &Symbol,
    statement_type: StatementType,
) -> Result<Vec<FinancialStatement>> {
    let cached = store.find_statements(symbol, Some(statement_type)).await?;
    if !cached.is_empty() {
        debug!(
            symbol = %symbol,
            statement_type = %statement_type,
            rows = cached.len(),
            "Cache hit for statements"
        );
        return Ok(cached);
    }

    info!(
        provider = provider.name(),
        symbol = %symbol,
        statement_type = %statement_type,
        "Fetching statements"
    );
    let records = provider.fetch_statement(symbol, statement_type).await?;

    let mut statements = Vec::with_capacity(records.len());
    for record in records {
        let statement = normalize_record(symbol, statement_type, record);
        store.upsert_statement(&statement).await?;
        statements.push(statement);
    }
    debug!(
        symbol = %symbol,
        statement_type = %statement_type,
        rows = statements.len(),
        "Stored fetched statements"
    );

    Ok(statements)
}
