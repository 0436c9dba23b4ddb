use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use log::debug;
use std::sync::Arc;

use super::prices_model::{NewPriceObservation, PriceObservation};
use super::prices_traits::{PriceServiceTrait, PriceStore};
use crate::currencies::normalize_symbol;
use crate::errors::Result;

/// Upper bound for a single history page.
pub const MAX_HISTORY_LIMIT: usize = 1000;

/// Service for recording and querying price observations
pub struct PriceService {
    store: Arc<dyn PriceStore>,
}

impl PriceService {
    pub fn new(store: Arc<dyn PriceStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PriceServiceTrait for PriceService {
    async fn save_price(
        &self,
        currency_id: i64,
        price: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<PriceObservation> {
        // Storage keeps microsecond precision
        let observation = NewPriceObservation {
            currency_id,
            price,
            timestamp: timestamp.trunc_subsecs(6),
        };
        observation.validate()?;

        let saved = self.store.append(observation).await?;
        debug!(
            "Recorded price {} for currency {} at {}",
            saved.price, saved.currency_id, saved.timestamp
        );
        Ok(saved)
    }

    fn get_price_at_time(
        &self,
        symbol: &str,
        target: DateTime<Utc>,
    ) -> Result<Option<PriceObservation>> {
        self.store.nearest(&normalize_symbol(symbol), target)
    }

    fn get_latest_price(&self, symbol: &str) -> Result<Option<PriceObservation>> {
        self.store.latest(&normalize_symbol(symbol))
    }

    fn get_price_history(&self, symbol: &str, limit: usize) -> Result<Vec<PriceObservation>> {
        let limit = limit.clamp(1, MAX_HISTORY_LIMIT);
        self.store.history(&normalize_symbol(symbol), limit)
    }

    fn get_prices_by_currency_id(&self, currency_id: i64) -> Result<Vec<PriceObservation>> {
        self.store.list_for_currency(currency_id)
    }
}
