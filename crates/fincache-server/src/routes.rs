//! HTTP routes.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use fincache::{
    CompanyProfile, Fields, FinancialStatement, ReadThroughCache, ReferenceItem, StatementType,
    Symbol,
};

use crate::error::ApiError;

type ApiResult<T> = Result<T, ApiError>;

/// State shared by all handlers.
#[derive(Debug, Clone)]
pub(crate) struct AppState {
    pub(crate) cache: Arc<ReadThroughCache>,
}

#[derive(Debug, Deserialize)]
struct FinancialsQuery {
    statement_type: Option<String>,
}

/// Build the API router.
pub(crate) fn router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/items", get(list_items).post(create_item))
        .route("/items/{symbol}", get(get_item))
        .route("/profiles/{symbol}", get(get_profile))
        .route("/financials/{symbol}", get(get_financials))
        .route("/user_input", get(get_user_input).post(push_user_input))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> Json<Value> {
    Json(json!({"message": "Welcome to the fincache API"}))
}

async fn health(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    state.cache.ping().await?;
    Ok(Json(json!({"status": "ok"})))
}

async fn list_items(State(state): State<AppState>) -> ApiResult<Json<Vec<ReferenceItem>>> {
    Ok(Json(state.cache.list_reference_items().await?))
}

async fn get_item(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> ApiResult<Json<ReferenceItem>> {
    let symbol = Symbol::new(symbol);
    state
        .cache
        .find_reference_item(&symbol)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Item {symbol} not found")))
}

async fn create_item(
    State(state): State<AppState>,
    payload: Result<Json<ReferenceItem>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(mut item) = payload?;
    item.id = None;
    let stored = state.cache.insert_reference_item(&item).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

async fn get_profile(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> ApiResult<Json<CompanyProfile>> {
    let profile = state.cache.get_profile(&Symbol::new(symbol)).await?;
    Ok(Json(profile))
}

async fn get_financials(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<FinancialsQuery>,
) -> ApiResult<Json<Vec<FinancialStatement>>> {
    let statement_type = query
        .statement_type
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<StatementType>())
        .transpose()?;

    let statements = state
        .cache
        .get_statement(&Symbol::new(symbol), statement_type)
        .await?;
    Ok(Json(statements))
}

async fn push_user_input(
    State(state): State<AppState>,
    payload: Result<Json<Fields>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(fields) = payload?;
    let id = state.cache.push_user_input(&fields).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({"message": "User input stored successfully", "id": id})),
    ))
}

async fn get_user_input(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let doc = match state.cache.get_user_input().await? {
        Some(doc) => serde_json::to_value(doc)
            .map_err(|e| ApiError::from(fincache::DataError::Parse(e.to_string())))?,
        None => json!({}),
    };
    Ok(Json(doc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request};
    use fincache::{DataError, FundamentalsProvider, InMemoryStore, Result};
    use tower::ServiceExt;

    #[derive(Debug)]
    struct StubProvider;

    fn object(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[async_trait]
    impl FundamentalsProvider for StubProvider {
        fn name(&self) -> &str {
            "Stub"
        }

        fn description(&self) -> &str {
            "Fixed AAPL data"
        }

        async fn fetch_profile(&self, symbol: &Symbol) -> Result<CompanyProfile> {
            if symbol.as_str() != "AAPL" {
                return Err(DataError::NotFound(format!("No profile data for {symbol}")));
            }
            Ok(CompanyProfile::from_provider(
                symbol.clone(),
                object(json!({"companyName": "Apple Inc."})),
            ))
        }

        async fn fetch_statement(
            &self,
            symbol: &Symbol,
            statement_type: StatementType,
        ) -> Result<Vec<Fields>> {
            if symbol.as_str() != "AAPL" {
                return Err(DataError::NotFound(format!(
                    "No {statement_type} statement data for {symbol}"
                )));
            }
            Ok(vec![object(json!({"calendarYear": "2023", "period": "FY"}))])
        }

        async fn fetch_traded_list(&self) -> Result<Vec<ReferenceItem>> {
            Err(DataError::Upstream("not available".into()))
        }
    }

    fn app() -> Router {
        let cache = ReadThroughCache::new(Arc::new(InMemoryStore::new()), Arc::new(StubProvider));
        let state = AppState {
            cache: Arc::new(cache),
        };
        router(state, &["http://localhost:3000".to_string()])
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_root_and_health() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].is_string());

        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_items_crud() {
        let app = app();
        let item = json!({
            "symbol": "aapl",
            "exchange": "NASDAQ Global Select",
            "exchangeShortName": "NASDAQ",
            "name": "Apple Inc.",
            "type": "stock"
        });

        let (status, created) = send(&app, Method::POST, "/items", Some(item.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["symbol"], "AAPL");
        assert!(created["_id"].is_string());

        let (status, body) = send(&app, Method::POST, "/items", Some(item)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "ALREADY_EXISTS");

        let (status, found) = send(&app, Method::GET, "/items/AAPL", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found, created);

        let (status, list) = send(&app, Method::GET, "/items", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().map(Vec::len), Some(1));

        let (status, body) = send(&app, Method::GET, "/items/MSFT", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_create_item_rejects_bad_body() {
        let app = app();
        let (status, body) =
            send(&app, Method::POST, "/items", Some(json!({"symbol": "AAPL"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_ARGUMENT");
    }

    #[tokio::test]
    async fn test_profile() {
        let app = app();
        let (status, first) = send(&app, Method::GET, "/profiles/aapl", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["symbol"], "AAPL");
        assert_eq!(first["companyName"], "Apple Inc.");
        assert!(first["modified_at"].is_string());

        let (_, second) = send(&app, Method::GET, "/profiles/AAPL", None).await;
        assert_eq!(first, second);

        let (status, body) = send(&app, Method::GET, "/profiles/ZZZZ", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_financials() {
        let app = app();
        let (status, rows) =
            send(&app, Method::GET, "/financials/AAPL?statement_type=income", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rows[0]["statementType"], "income");
        assert_eq!(rows[0]["fiscalYear"], 2023);

        let (status, rows) = send(&app, Method::GET, "/financials/AAPL", None).await;
        assert_eq!(status, StatusCode::OK);
        let kinds: Vec<_> = rows
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["statementType"].clone())
            .collect();
        assert_eq!(kinds, vec![json!("income"), json!("balance"), json!("cash_flow")]);

        let (status, body) =
            send(&app, Method::GET, "/financials/AAPL?statement_type=cashflow", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_ARGUMENT");
    }

    #[tokio::test]
    async fn test_user_input() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/user_input", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({}));

        let (status, body) =
            send(&app, Method::POST, "/user_input", Some(json!({"theme": "dark"}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "User input stored successfully");
        let id = body["id"].clone();
        assert!(id.is_string());

        send(&app, Method::POST, "/user_input", Some(json!({"risk": 3}))).await;
        let (_, doc) = send(&app, Method::GET, "/user_input", None).await;
        assert_eq!(doc, json!({"_id": id, "theme": "dark", "risk": 3}));
    }
}
