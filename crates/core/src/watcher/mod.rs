//! Price ingestion watcher.
//!
//! ```text
//! Watcher (periodic loop, Idle → Running → Stopping → Stopped)
//!    │ each tick
//!    ├─ CurrencyServiceTrait::get_active_currencies
//!    └─ FetchCoordinator::run ── one task per currency ──▶ PriceSource → PriceServiceTrait
//!                               (waits for every task)
//! ```

mod coordinator;
mod scheduler;


pub use coordinator::{BatchOutcome, FetchCoordinator, TaskError, TaskFailure};
pub use scheduler::{TickReport, Watcher, WatcherConfig, WatcherError, WatcherState};
