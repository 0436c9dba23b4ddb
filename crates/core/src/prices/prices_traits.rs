//! Price storage and service traits.
//!
//! The store is append-only. Observation timestamps are not assumed to arrive
//! in order, so every read is answered over the full set of rows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::prices_model::{NewPriceObservation, PriceObservation};
use crate::errors::Result;

/// Storage interface for price observations.
///
/// Lookups by symbol return `Ok(None)` (or an empty list) when the symbol is
/// unknown or has no observations.
#[async_trait]
pub trait PriceStore: Send + Sync {
    /// Inserts one observation. Identical observations are all kept.
    async fn append(&self, observation: NewPriceObservation) -> Result<PriceObservation>;

    /// Observation minimising `|timestamp - target|`, lowest id on ties.
    fn nearest(&self, symbol: &str, target: DateTime<Utc>) -> Result<Option<PriceObservation>>;

    /// Observation with the greatest timestamp, latest written on ties.
    fn latest(&self, symbol: &str) -> Result<Option<PriceObservation>>;

    /// Up to `limit` observations, newest timestamp first.
    fn history(&self, symbol: &str, limit: usize) -> Result<Vec<PriceObservation>>;

    /// All observations of a currency, newest timestamp first.
    fn list_for_currency(&self, currency_id: i64) -> Result<Vec<PriceObservation>>;
}

/// Trait defining the contract for price operations.
#[async_trait]
pub trait PriceServiceTrait: Send + Sync {
    /// Records a price for a currency.
    async fn save_price(
        &self,
        currency_id: i64,
        price: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<PriceObservation>;

    fn get_price_at_time(
        &self,
        symbol: &str,
        target: DateTime<Utc>,
    ) -> Result<Option<PriceObservation>>;

    fn get_latest_price(&self, symbol: &str) -> Result<Option<PriceObservation>>;

    fn get_price_history(&self, symbol: &str, limit: usize) -> Result<Vec<PriceObservation>>;

    fn get_prices_by_currency_id(&self, currency_id: i64) -> Result<Vec<PriceObservation>>;
}
