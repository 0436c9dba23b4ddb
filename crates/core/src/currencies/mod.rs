//! Currencies module - domain models, services, and traits.

mod currencies_model;
mod currencies_service;
mod currencies_traits;

#[cfg(test)]
mod currencies_service_tests;

// Re-export the public interface
pub use currencies_model::{normalize_symbol, Currency, NewCurrency, MAX_SYMBOL_LEN};
pub use currencies_service::CurrencyService;
pub use currencies_traits::{CurrencyRepositoryTrait, CurrencyServiceTrait};
