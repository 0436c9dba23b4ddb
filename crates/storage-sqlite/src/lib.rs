//! SQLite storage implementation for Pricewatch.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `pricewatch-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The single-writer actor that serialises all writes
//! - Repository implementations for currencies and prices
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//!
//! ```text
//!      core (domain, watcher)
//!               │
//!               ▼
//!   storage-sqlite (this crate)
//!               │
//!               ▼
//!           SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod currencies;
pub mod prices;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from pricewatch-core for convenience
pub use pricewatch_core::errors::{DatabaseError, Error, Result};
