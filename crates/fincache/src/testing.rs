//! Provider and store doubles for cache tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use fincache_core::{
    CompanyProfile, DataError, DocumentStore, Fields, FinancialStatement, FundamentalsProvider,
    RecordId, ReferenceItem, Result, StatementType, Symbol, UserInput,
};

pub(crate) fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

/// Serves canned responses and counts every upstream call.
#[derive(Debug, Default)]
pub(crate) struct ScriptedProvider {
    profiles: HashMap<Symbol, Fields>,
    statements: HashMap<StatementType, Vec<Fields>>,
    failing: Option<StatementType>,
    traded: Vec<ReferenceItem>,
    profile_calls: AtomicUsize,
    statement_log: Mutex<Vec<StatementType>>,
}

impl ScriptedProvider {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_profile(mut self, symbol: &str, value: Value) -> Self {
        self.profiles.insert(Symbol::new(symbol), fields(value));
        self
    }

    pub(crate) fn with_statements(mut self, kind: StatementType, rows: Vec<Fields>) -> Self {
        self.statements.insert(kind, rows);
        self
    }

    /// Make every fetch of `kind` fail with an upstream error.
    pub(crate) fn failing_on(mut self, kind: StatementType) -> Self {
        self.failing = Some(kind);
        self
    }

    pub(crate) fn with_traded(mut self, items: Vec<ReferenceItem>) -> Self {
        self.traded = items;
        self
    }

    pub(crate) fn profile_calls(&self) -> usize {
        self.profile_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn statement_calls(&self) -> usize {
        self.statement_log().len()
    }

    pub(crate) fn statement_log(&self) -> Vec<StatementType> {
        self.statement_log
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl FundamentalsProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "Scripted"
    }

    fn description(&self) -> &str {
        "Canned responses for tests"
    }

    async fn fetch_profile(&self, symbol: &Symbol) -> Result<CompanyProfile> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        self.profiles
            .get(symbol)
            .map(|f| CompanyProfile::from_provider(symbol.clone(), f.clone()))
            .ok_or_else(|| DataError::NotFound(format!("No profile data for {symbol}")))
    }

    async fn fetch_statement(
        &self,
        symbol: &Symbol,
        statement_type: StatementType,
    ) -> Result<Vec<Fields>> {
        self.statement_log
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(statement_type);

        if self.failing == Some(statement_type) {
            return Err(DataError::Upstream(format!(
                "{statement_type} statement unavailable"
            )));
        }
        match self.statements.get(&statement_type) {
            Some(rows) if !rows.is_empty() => Ok(rows.clone()),
            _ => Err(DataError::NotFound(format!(
                "No {statement_type} statement data for {symbol}"
            ))),
        }
    }

    async fn fetch_traded_list(&self) -> Result<Vec<ReferenceItem>> {
        Ok(self.traded.clone())
    }
}

/// Store whose every operation fails as if the database were down.
#[derive(Debug, Default)]
pub(crate) struct UnavailableStore;

fn down<T>() -> Result<T> {
    Err(DataError::StoreUnavailable("database is down".to_string()))
}

#[async_trait]
impl DocumentStore for UnavailableStore {
    async fn ping(&self) -> Result<()> {
        down()
    }

    async fn insert_reference_item(&self, _item: &ReferenceItem) -> Result<ReferenceItem> {
        down()
    }

    async fn upsert_reference_item(&self, _item: &ReferenceItem) -> Result<()> {
        down()
    }

    async fn find_reference_item(&self, _symbol: &Symbol) -> Result<Option<ReferenceItem>> {
        down()
    }

    async fn list_reference_items(&self) -> Result<Vec<ReferenceItem>> {
        down()
    }

    async fn find_profile(&self, _symbol: &Symbol) -> Result<Option<CompanyProfile>> {
        down()
    }

    async fn upsert_profile(&self, _profile: &CompanyProfile) -> Result<DateTime<Utc>> {
        down()
    }

    async fn find_statements(
        &self,
        _symbol: &Symbol,
        _statement_type: Option<StatementType>,
    ) -> Result<Vec<FinancialStatement>> {
        down()
    }

    async fn upsert_statement(&self, _statement: &FinancialStatement) -> Result<()> {
        down()
    }

    async fn push_user_input(&self, _fields: &Fields) -> Result<RecordId> {
        down()
    }

    async fn get_user_input(&self) -> Result<Option<UserInput>> {
        down()
    }
}
