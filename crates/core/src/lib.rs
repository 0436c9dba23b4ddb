//! Pricewatch Core - Domain entities, services, and traits.
//!
//! This crate contains the price ingestion watcher and the time-series query
//! services. It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod currencies;
pub mod errors;
pub mod prices;
pub mod watcher;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
