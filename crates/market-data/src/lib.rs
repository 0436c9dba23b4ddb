//! Pricewatch Market Data Crate
//!
//! This crate turns a currency symbol into a current price by calling an
//! external provider.
//!
//! # Overview
//!
//! ```text
//! symbol ("btc")
//!      |
//!      v
//! +------------------+
//! |   PriceSource    |  (trait, one attempt per call)
//! +------------------+
//!      |
//!      v
//! +------------------+
//! |  KucoinProvider  |  GET /api/v1/market/orderbook/level1?symbol=BTC-USDT
//! +------------------+
//!      |
//!      v
//! f64 price | FetchError
//! ```
//!
//! # Core Types
//!
//! - [`PriceSource`] - Provider abstraction used by the ingestion watcher
//! - [`KucoinProvider`] - KuCoin spot implementation
//! - [`FetchError`] - Typed failure of a single fetch

pub mod errors;
pub mod provider;

pub use errors::FetchError;
pub use provider::kucoin::{KucoinProvider, ProviderConfig};
pub use provider::PriceSource;
