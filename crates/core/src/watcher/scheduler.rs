//! Periodic watcher loop and its lifecycle.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{watch, Mutex};

use super::coordinator::{BatchOutcome, FetchCoordinator};
use crate::currencies::CurrencyServiceTrait;
use crate::prices::PriceServiceTrait;
use pricewatch_market_data::PriceSource;

/// Default delay between the end of one tick and the start of the next.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Lifecycle of a [`Watcher`]. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WatcherState {
    Idle,
    Running,
    Stopping,
    Stopped,
}

impl fmt::Display for WatcherState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WatcherState::Idle => "idle",
            WatcherState::Running => "running",
            WatcherState::Stopping => "stopping",
            WatcherState::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum WatcherError {
    #[error("cannot move watcher from {from} to {to}")]
    InvalidTransition {
        from: WatcherState,
        to: WatcherState,
    },
}

#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Delay measured from the completion of the previous tick
    pub poll_interval: Duration,
    /// Deadline for each currency's fetch and persist; `None` waits forever
    pub fetch_timeout: Option<Duration>,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            fetch_timeout: None,
        }
    }
}

/// What a single tick did.
#[derive(Debug)]
pub enum TickReport {
    /// The coordinator ran (possibly over zero currencies).
    Completed(BatchOutcome),
    /// The active currency list could not be read; nothing was fetched.
    Aborted(String),
}

/// Polls the active currencies on a fixed delay and records their prices.
///
/// At most one tick is in flight, whether it comes from the loop or from
/// [`Watcher::tick`]. `stop` is cooperative: it is observed between ticks, so
/// a running tick always finishes its barrier first.
pub struct Watcher {
    inner: Arc<WatcherInner>,
}

struct WatcherInner {
    config: WatcherConfig,
    registry: Arc<dyn CurrencyServiceTrait>,
    coordinator: FetchCoordinator,
    state: watch::Sender<WatcherState>,
    shutdown: watch::Sender<bool>,
    completed_ticks: watch::Sender<u64>,
    tick_lock: Mutex<()>,
}

impl Watcher {
    pub fn new(
        config: WatcherConfig,
        registry: Arc<dyn CurrencyServiceTrait>,
        source: Arc<dyn PriceSource>,
        prices: Arc<dyn PriceServiceTrait>,
    ) -> Self {
        let coordinator = FetchCoordinator::new(source, prices, config.fetch_timeout);
        let (state, _) = watch::channel(WatcherState::Idle);
        let (shutdown, _) = watch::channel(false);
        let (completed_ticks, _) = watch::channel(0);

        Self {
            inner: Arc::new(WatcherInner {
                config,
                registry,
                coordinator,
                state,
                shutdown,
                completed_ticks,
                tick_lock: Mutex::new(()),
            }),
        }
    }

    pub fn config(&self) -> &WatcherConfig {
        &self.inner.config
    }

    pub fn state(&self) -> WatcherState {
        *self.inner.state.borrow()
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<WatcherState> {
        self.inner.state.subscribe()
    }

    /// Number of ticks finished since construction.
    pub fn completed_ticks(&self) -> u64 {
        *self.inner.completed_ticks.borrow()
    }

    /// Receiver that observes the tick counter.
    pub fn subscribe_ticks(&self) -> watch::Receiver<u64> {
        self.inner.completed_ticks.subscribe()
    }

    /// Spawns the background loop. Only valid from `Idle`.
    ///
    /// The first tick runs immediately. Must be called inside a Tokio runtime.
    pub fn start(&self) -> Result<(), WatcherError> {
        let mut from = WatcherState::Idle;
        let started = self.inner.state.send_if_modified(|state| {
            from = *state;
            if *state == WatcherState::Idle {
                *state = WatcherState::Running;
                true
            } else {
                false
            }
        });
        if !started {
            return Err(WatcherError::InvalidTransition {
                from,
                to: WatcherState::Running,
            });
        }

        info!(
            "Price watcher started (interval {:?}, fetch timeout {:?})",
            self.inner.config.poll_interval, self.inner.config.fetch_timeout
        );
        // A stop racing with this spawn is seen by the loop before its first tick.
        tokio::spawn(self.inner.clone().run_loop());
        Ok(())
    }

    /// Requests a stop and waits until the watcher is `Stopped`.
    ///
    /// Safe to call from several tasks and more than once, and safe to cancel:
    /// the loop publishes `Stopped` itself when it exits. A watcher that was
    /// never started goes straight to `Stopped`.
    pub async fn stop(&self) {
        let mut previous = WatcherState::Idle;
        self.inner.state.send_if_modified(|state| {
            previous = *state;
            match *state {
                WatcherState::Idle => *state = WatcherState::Stopped,
                WatcherState::Running => *state = WatcherState::Stopping,
                WatcherState::Stopping | WatcherState::Stopped => return false,
            }
            true
        });
        self.inner.shutdown.send_replace(true);

        if previous == WatcherState::Running {
            info!("Price watcher stopping, waiting for the current tick");
        }

        let mut state = self.inner.state.subscribe();
        // The sender lives in `inner`, so this only ends once `Stopped` is seen.
        let _ = state.wait_for(|s| *s == WatcherState::Stopped).await;
    }

    /// Runs one tick in the caller's task, outside the periodic loop.
    ///
    /// Waits for any tick already in flight to finish first.
    pub async fn tick(&self) -> TickReport {
        self.inner.tick().await
    }
}

impl Drop for Watcher {
    fn drop(&mut self) {
        self.inner.shutdown.send_replace(true);
    }
}

impl WatcherInner {
    async fn run_loop(self: Arc<Self>) {
        let _stopped = PublishStopped(&self.state);
        let mut shutdown = self.shutdown.subscribe();

        loop {
            if *shutdown.borrow() {
                break;
            }

            self.tick().await;

            tokio::select! {
                _ = tokio::time::sleep(self.config.poll_interval) => {}
                _ = shutdown.changed() => break,
            }
        }

        debug!("Price watcher loop exited");
    }

    async fn tick(&self) -> TickReport {
        let _guard = self.tick_lock.lock().await;
        let report = match self.registry.get_active_currencies() {
            Ok(currencies) if currencies.is_empty() => {
                debug!("No active currencies, nothing to fetch");
                TickReport::Completed(BatchOutcome::default())
            }
            Ok(currencies) => {
                let outcome = self.coordinator.run(currencies).await;
                if outcome.failed() > 0 {
                    warn!(
                        "Price tick finished: {} attempted, {} succeeded, {} failed",
                        outcome.attempted,
                        outcome.succeeded,
                        outcome.failed()
                    );
                } else {
                    info!(
                        "Price tick finished: {} attempted, {} succeeded",
                        outcome.attempted, outcome.succeeded
                    );
                }
                TickReport::Completed(outcome)
            }
            Err(e) => {
                error!("Price tick aborted, active currencies unavailable: {}", e);
                TickReport::Aborted(e.to_string())
            }
        };

        self.completed_ticks.send_modify(|n| *n += 1);
        report
    }
}

/// Publishes `Stopped` when the loop exits, including by panic.
struct PublishStopped<'a>(&'a watch::Sender<WatcherState>);

impl Drop for PublishStopped<'_> {
    fn drop(&mut self) {
        let previous = self.0.send_replace(WatcherState::Stopped);
        if previous == WatcherState::Running {
            warn!("Price watcher loop exited without a stop request");
        } else {
            info!("Price watcher stopped");
        }
    }
}
