//! Price source abstractions and implementations.
//!
//! This module contains:
//! - The `PriceSource` trait that all providers implement
//! - The KuCoin level-1 order book provider

mod traits;

pub mod kucoin;

pub use traits::PriceSource;
