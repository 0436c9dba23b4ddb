//! SQLite storage implementation for price observations.

mod model;
mod repository;

pub use model::{NewPriceDB, PriceDB};
pub use repository::PriceRepository;
