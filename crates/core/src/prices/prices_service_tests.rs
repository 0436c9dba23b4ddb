//! Tests for PriceService contracts.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{
    pick_nearest, NewPriceObservation, PriceObservation, PriceService, PriceServiceTrait,
    PriceStore, MAX_HISTORY_LIMIT,
};
use crate::errors::Result;

// =========================================================================
// Mock PriceStore
// =========================================================================

/// In-memory store keyed by currency id, answering reads with full scans.
struct MockPriceStore {
    symbols: HashMap<String, i64>,
    rows: Mutex<Vec<PriceObservation>>,
    last_history_limit: Mutex<Option<usize>>,
}

impl MockPriceStore {
    fn new(symbols: &[(&str, i64)]) -> Self {
        Self {
            symbols: symbols
                .iter()
                .map(|(s, id)| (s.to_string(), *id))
                .collect(),
            rows: Mutex::new(Vec::new()),
            last_history_limit: Mutex::new(None),
        }
    }

    fn rows_for(&self, symbol: &str) -> Vec<PriceObservation> {
        let Some(currency_id) = self.symbols.get(symbol) else {
            return Vec::new();
        };
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.currency_id == *currency_id)
            .cloned()
            .collect()
    }

    fn newest_first(mut rows: Vec<PriceObservation>) -> Vec<PriceObservation> {
        rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        rows
    }
}

#[async_trait]
impl PriceStore for MockPriceStore {
    async fn append(&self, observation: NewPriceObservation) -> Result<PriceObservation> {
        let mut rows = self.rows.lock().unwrap();
        let saved = PriceObservation {
            id: rows.len() as i64 + 1,
            currency_id: observation.currency_id,
            price: observation.price,
            timestamp: observation.timestamp,
            created_at: Utc::now(),
        };
        rows.push(saved.clone());
        Ok(saved)
    }

    fn nearest(&self, symbol: &str, target: DateTime<Utc>) -> Result<Option<PriceObservation>> {
        Ok(pick_nearest(self.rows_for(symbol), target))
    }

    fn latest(&self, symbol: &str) -> Result<Option<PriceObservation>> {
        Ok(Self::newest_first(self.rows_for(symbol)).into_iter().next())
    }

    fn history(&self, symbol: &str, limit: usize) -> Result<Vec<PriceObservation>> {
        *self.last_history_limit.lock().unwrap() = Some(limit);
        Ok(Self::newest_first(self.rows_for(symbol))
            .into_iter()
            .take(limit)
            .collect())
    }

    fn list_for_currency(&self, currency_id: i64) -> Result<Vec<PriceObservation>> {
        let rows = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.currency_id == currency_id)
            .cloned()
            .collect();
        Ok(Self::newest_first(rows))
    }
}

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

fn service() -> (PriceService, Arc<MockPriceStore>) {
    let store = Arc::new(MockPriceStore::new(&[("BTC", 1), ("ETH", 2)]));
    (PriceService::new(store.clone()), store)
}

#[tokio::test]
async fn test_save_price_is_additive() {
    let (service, store) = service();

    service.save_price(1, 100.0, at(100)).await.unwrap();
    service.save_price(1, 100.0, at(100)).await.unwrap();

    assert_eq!(store.rows_for("BTC").len(), 2);
}

#[tokio::test]
async fn test_save_price_rejects_invalid_price() {
    let (service, store) = service();

    assert!(service.save_price(1, 0.0, at(100)).await.is_err());
    assert!(service.save_price(1, f64::NAN, at(100)).await.is_err());
    assert!(store.rows_for("BTC").is_empty());
}

#[tokio::test]
async fn test_save_price_truncates_to_microseconds() {
    let (service, _) = service();
    let ts = at(100) + Duration::nanoseconds(1_234_567);

    let saved = service.save_price(1, 1.0, ts).await.unwrap();

    assert_eq!(saved.timestamp, at(100) + Duration::microseconds(1_234));
}

#[tokio::test]
async fn test_price_at_time_picks_nearest() {
    let (service, _) = service();
    service.save_price(1, 10.0, at(100)).await.unwrap();
    service.save_price(1, 20.0, at(200)).await.unwrap();

    let early = service.get_price_at_time("btc", at(130)).unwrap().unwrap();
    let late = service.get_price_at_time("BTC", at(170)).unwrap().unwrap();

    assert_eq!(early.timestamp, at(100));
    assert_eq!(late.timestamp, at(200));
}

#[tokio::test]
async fn test_latest_ignores_insertion_order() {
    let (service, _) = service();
    service.save_price(1, 20.0, at(200)).await.unwrap();
    service.save_price(1, 10.0, at(100)).await.unwrap();

    let latest = service.get_latest_price("BTC").unwrap().unwrap();

    assert_eq!(latest.timestamp, at(200));
    assert_eq!(latest.price, 20.0);
}

#[tokio::test]
async fn test_queries_without_observations_are_none() {
    let (service, _) = service();
    service.save_price(1, 10.0, at(100)).await.unwrap();

    assert!(service.get_latest_price("ETH").unwrap().is_none());
    assert!(service.get_price_at_time("ETH", at(100)).unwrap().is_none());
    assert!(service.get_latest_price("DOGE").unwrap().is_none());
    assert!(service.get_price_history("DOGE", 10).unwrap().is_empty());
}

#[tokio::test]
async fn test_history_limit_is_clamped() {
    let (service, store) = service();
    for i in 0..5 {
        service.save_price(1, 1.0 + i as f64, at(100 + i)).await.unwrap();
    }

    let page = service.get_price_history("BTC", 0).unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].timestamp, at(104));

    service.get_price_history("BTC", 50_000).unwrap();
    assert_eq!(*store.last_history_limit.lock().unwrap(), Some(MAX_HISTORY_LIMIT));
}

#[tokio::test]
async fn test_prices_by_currency_id_newest_first() {
    let (service, _) = service();
    service.save_price(2, 1.0, at(100)).await.unwrap();
    service.save_price(2, 3.0, at(300)).await.unwrap();
    service.save_price(2, 2.0, at(200)).await.unwrap();
    service.save_price(1, 9.0, at(400)).await.unwrap();

    let prices: Vec<f64> = service
        .get_prices_by_currency_id(2)
        .unwrap()
        .iter()
        .map(|p| p.price)
        .collect();

    assert_eq!(prices, vec![3.0, 2.0, 1.0]);
}
