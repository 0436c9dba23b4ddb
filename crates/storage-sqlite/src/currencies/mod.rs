//! SQLite storage implementation for the currency registry.

mod model;
mod repository;

pub use model::{CurrencyDB, NewCurrencyDB};
pub use repository::CurrencyRepository;
