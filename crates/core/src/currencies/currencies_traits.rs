//! Currency repository and service traits.
//!
//! These traits define the contract for currency registry operations without
//! any database-specific types.

use async_trait::async_trait;

use super::currencies_model::{Currency, NewCurrency};
use crate::errors::Result;

/// Trait defining the contract for Currency repository operations.
#[async_trait]
pub trait CurrencyRepositoryTrait: Send + Sync {
    /// Inserts the currency, or reactivates it when the symbol already exists.
    ///
    /// Expects validated, normalized input. Runs as one transaction.
    async fn upsert_active(&self, new_currency: NewCurrency) -> Result<Currency>;

    /// Marks a currency inactive. Returns the number of affected rows.
    async fn deactivate(&self, symbol: &str) -> Result<usize>;

    /// Active currencies ordered by symbol ascending.
    fn list_active(&self) -> Result<Vec<Currency>>;

    /// Retrieves a currency by symbol, active or not.
    fn get_by_symbol(&self, symbol: &str) -> Result<Option<Currency>>;
}

/// Trait defining the contract for Currency service operations.
///
/// This is the currency registry consumed by the price watcher.
#[async_trait]
pub trait CurrencyServiceTrait: Send + Sync {
    /// Registers a currency for polling, reactivating it if it was removed.
    async fn add_currency(&self, symbol: &str, name: &str) -> Result<Currency>;

    /// Stops polling a currency. Existing prices are kept.
    async fn remove_currency(&self, symbol: &str) -> Result<()>;

    /// Currencies the watcher should poll, ordered by symbol.
    fn get_active_currencies(&self) -> Result<Vec<Currency>>;

    /// Looks a currency up by symbol (case-insensitive).
    fn get_currency(&self, symbol: &str) -> Result<Option<Currency>>;
}
