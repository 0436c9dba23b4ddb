use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::DateTime;
use pricewatch_core::currencies::normalize_symbol;
use serde::Deserialize;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::Price,
};

const DEFAULT_HISTORY_LIMIT: usize = 100;

#[derive(Deserialize)]
struct PriceAtQuery {
    coin: String,
    /// Unix seconds
    timestamp: i64,
}

#[derive(Deserialize)]
struct CoinQuery {
    coin: String,
}

#[derive(Deserialize)]
struct HistoryQuery {
    coin: String,
    limit: Option<usize>,
}

/// Price closest in time to the requested timestamp.
async fn get_price(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PriceAtQuery>,
) -> ApiResult<Json<Price>> {
    let symbol = normalize_symbol(&query.coin);
    let target = DateTime::from_timestamp(query.timestamp, 0)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid timestamp {}", query.timestamp)))?;

    state
        .price_service
        .get_price_at_time(&symbol, target)?
        .map(|observation| Json(Price::new(symbol.as_str(), observation)))
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "Price not found for {} at {}",
                symbol,
                target.to_rfc3339()
            ))
        })
}

async fn get_latest_price(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CoinQuery>,
) -> ApiResult<Json<Price>> {
    let symbol = normalize_symbol(&query.coin);
    state
        .price_service
        .get_latest_price(&symbol)?
        .map(|observation| Json(Price::new(symbol.as_str(), observation)))
        .ok_or_else(|| ApiError::NotFound(format!("No prices recorded for {}", symbol)))
}

async fn get_price_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<Vec<Price>>> {
    let symbol = normalize_symbol(&query.coin);
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let prices = state
        .price_service
        .get_price_history(&symbol, limit)?
        .into_iter()
        .map(|observation| Price::new(symbol.as_str(), observation))
        .collect();
    Ok(Json(prices))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/currency/price", get(get_price))
        .route("/currency/price/latest", get(get_latest_price))
        .route("/currency/price/history", get(get_price_history))
}
