use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;

use super::currencies_model::{normalize_symbol, Currency, NewCurrency};
use super::currencies_traits::{CurrencyRepositoryTrait, CurrencyServiceTrait};
use crate::errors::{DatabaseError, Error, Result};

/// Service for managing the currency registry
pub struct CurrencyService {
    repository: Arc<dyn CurrencyRepositoryTrait>,
}

impl CurrencyService {
    /// Creates a new CurrencyService instance
    pub fn new(repository: Arc<dyn CurrencyRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl CurrencyServiceTrait for CurrencyService {
    async fn add_currency(&self, symbol: &str, name: &str) -> Result<Currency> {
        let new_currency = NewCurrency::new(symbol, name).normalized();
        new_currency.validate()?;

        let currency = self.repository.upsert_active(new_currency).await?;
        info!("Currency {} registered (id {})", currency.symbol, currency.id);
        Ok(currency)
    }

    async fn remove_currency(&self, symbol: &str) -> Result<()> {
        let symbol = normalize_symbol(symbol);
        let affected = self.repository.deactivate(&symbol).await?;
        if affected == 0 {
            return Err(Error::Database(DatabaseError::NotFound(format!(
                "Currency {}",
                symbol
            ))));
        }
        info!("Currency {} deactivated", symbol);
        Ok(())
    }

    fn get_active_currencies(&self) -> Result<Vec<Currency>> {
        let currencies = self.repository.list_active()?;
        debug!("{} active currencies", currencies.len());
        Ok(currencies)
    }

    fn get_currency(&self, symbol: &str) -> Result<Option<Currency>> {
        self.repository.get_by_symbol(&normalize_symbol(symbol))
    }
}
