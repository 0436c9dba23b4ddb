use chrono::{DateTime, Utc};
use pricewatch_core::prices::PriceObservation;
use serde::{Deserialize, Serialize};

/// Price observation as returned by the HTTP API.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub id: i64,
    pub currency_id: i64,
    pub symbol: String,
    pub price: f64,
    pub timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Price {
    pub fn new(symbol: impl Into<String>, observation: PriceObservation) -> Self {
        Self {
            id: observation.id,
            currency_id: observation.currency_id,
            symbol: symbol.into(),
            price: observation.price,
            timestamp: observation.timestamp,
            created_at: observation.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WatcherStatus {
    pub state: String,
    pub poll_interval_secs: u64,
    pub completed_ticks: u64,
}
