//! Prices module - time-series observations, storage traits, and the query service.
//!
//! ```text
//! PriceService → PriceStore (append-only, per currency)
//!                   ├─ nearest(symbol, T)
//!                   ├─ latest(symbol)
//!                   └─ history(symbol, limit)
//! ```

mod prices_model;
mod prices_service;
mod prices_traits;

#[cfg(test)]
mod prices_service_tests;

pub use prices_model::{pick_nearest, NewPriceObservation, PriceObservation};
pub use prices_service::{PriceService, MAX_HISTORY_LIMIT};
pub use prices_traits::{PriceServiceTrait, PriceStore};
