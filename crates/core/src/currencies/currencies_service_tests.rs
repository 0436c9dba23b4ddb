//! Tests for CurrencyService contracts.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex};

use super::{Currency, CurrencyRepositoryTrait, CurrencyService, CurrencyServiceTrait, NewCurrency};
use crate::errors::Result;

// =========================================================================
// Mock CurrencyRepository
// =========================================================================

#[derive(Default)]
struct MockCurrencyRepository {
    currencies: Mutex<Vec<Currency>>,
}

impl MockCurrencyRepository {
    fn all(&self) -> Vec<Currency> {
        self.currencies.lock().unwrap().clone()
    }
}

#[async_trait]
impl CurrencyRepositoryTrait for MockCurrencyRepository {
    async fn upsert_active(&self, new_currency: NewCurrency) -> Result<Currency> {
        let mut currencies = self.currencies.lock().unwrap();
        let now = Utc::now().naive_utc();
        if let Some(existing) = currencies
            .iter_mut()
            .find(|c| c.symbol == new_currency.symbol)
        {
            existing.is_active = true;
            existing.updated_at = now;
            return Ok(existing.clone());
        }
        let currency = Currency {
            id: currencies.len() as i64 + 1,
            symbol: new_currency.symbol,
            name: new_currency.name,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        currencies.push(currency.clone());
        Ok(currency)
    }

    async fn deactivate(&self, symbol: &str) -> Result<usize> {
        let mut currencies = self.currencies.lock().unwrap();
        let mut affected = 0;
        for currency in currencies.iter_mut().filter(|c| c.symbol == symbol) {
            currency.is_active = false;
            affected += 1;
        }
        Ok(affected)
    }

    fn list_active(&self) -> Result<Vec<Currency>> {
        let mut active: Vec<Currency> = self
            .currencies
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.is_active)
            .cloned()
            .collect();
        active.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        Ok(active)
    }

    fn get_by_symbol(&self, symbol: &str) -> Result<Option<Currency>> {
        Ok(self
            .currencies
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.symbol == symbol)
            .cloned())
    }
}

fn service() -> (CurrencyService, Arc<MockCurrencyRepository>) {
    let repo = Arc::new(MockCurrencyRepository::default());
    (CurrencyService::new(repo.clone()), repo)
}

#[tokio::test]
async fn test_add_currency_normalizes_symbol() {
    let (service, repo) = service();

    let currency = service.add_currency(" btc ", "Bitcoin").await.unwrap();

    assert_eq!(currency.symbol, "BTC");
    assert_eq!(currency.name, "Bitcoin");
    assert!(currency.is_active);
    assert_eq!(repo.all().len(), 1);
}

#[tokio::test]
async fn test_add_currency_rejects_invalid_symbol() {
    let (service, repo) = service();

    let result = service.add_currency("BTC/USDT", "Bitcoin").await;

    assert!(result.is_err());
    assert!(repo.all().is_empty());
}

#[tokio::test]
async fn test_remove_then_add_reactivates_same_row() {
    let (service, repo) = service();
    let first = service.add_currency("ETH", "Ether").await.unwrap();

    service.remove_currency("eth").await.unwrap();
    assert!(service.get_active_currencies().unwrap().is_empty());

    let again = service.add_currency("ETH", "Ether").await.unwrap();
    assert_eq!(again.id, first.id);
    assert!(again.is_active);
    assert_eq!(repo.all().len(), 1);
}

#[tokio::test]
async fn test_remove_unknown_currency_is_not_found() {
    let (service, _) = service();

    let err = service.remove_currency("DOGE").await.unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_active_currencies_sorted_by_symbol() {
    let (service, _) = service();
    service.add_currency("SOL", "Solana").await.unwrap();
    service.add_currency("BTC", "Bitcoin").await.unwrap();
    service.add_currency("ETH", "Ether").await.unwrap();
    service.remove_currency("SOL").await.unwrap();

    let symbols: Vec<String> = service
        .get_active_currencies()
        .unwrap()
        .into_iter()
        .map(|c| c.symbol)
        .collect();

    assert_eq!(symbols, vec!["BTC", "ETH"]);
}

#[tokio::test]
async fn test_get_currency_is_case_insensitive() {
    let (service, _) = service();
    service.add_currency("BTC", "Bitcoin").await.unwrap();

    assert!(service.get_currency("btc").unwrap().is_some());
    assert!(service.get_currency("xrp").unwrap().is_none());
}
