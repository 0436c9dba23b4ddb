use std::sync::Arc;

use axum::{
    extract::State,
    routing::{delete, get, post},
    Json, Router,
};
use pricewatch_core::currencies::{normalize_symbol, Currency};
use serde::{Deserialize, Serialize};

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Deserialize)]
struct AddCurrencyRequest {
    symbol: String,
    name: String,
}

#[derive(Deserialize)]
struct RemoveCurrencyRequest {
    symbol: String,
}

#[derive(Serialize)]
struct RemoveCurrencyResponse {
    message: &'static str,
    symbol: String,
}

async fn add_currency(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AddCurrencyRequest>,
) -> ApiResult<Json<Currency>> {
    let currency = state
        .currency_service
        .add_currency(&body.symbol, &body.name)
        .await?;
    Ok(Json(currency))
}

/// Soft-disables a currency; its prices are kept.
async fn remove_currency(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RemoveCurrencyRequest>,
) -> ApiResult<Json<RemoveCurrencyResponse>> {
    state.currency_service.remove_currency(&body.symbol).await?;
    Ok(Json(RemoveCurrencyResponse {
        message: "Currency successfully removed",
        symbol: normalize_symbol(&body.symbol),
    }))
}

async fn list_currencies(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Currency>>> {
    Ok(Json(state.currency_service.get_active_currencies()?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/currency/add", post(add_currency))
        .route("/currency/remove", delete(remove_currency))
        .route("/currency/list", get(list_currencies))
}
