//! Fan-out/fan-in of fetch-and-persist tasks for one tick.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, warn};
use pricewatch_market_data::{FetchError, PriceSource};
use thiserror::Error;

use crate::currencies::Currency;
use crate::errors::Error;
use crate::prices::{PriceObservation, PriceServiceTrait};

/// Why a single currency's task did not record a price.
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("persist failed: {0}")]
    Persist(Error),

    #[error("timed out after {0:?}")]
    TimedOut(Duration),

    #[error("task panicked: {0}")]
    Panicked(String),
}

impl TaskError {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            TaskError::Fetch(e) => e.kind(),
            TaskError::Persist(_) => "persist",
            TaskError::TimedOut(_) => "timeout",
            TaskError::Panicked(_) => "panic",
        }
    }
}

#[derive(Debug)]
pub struct TaskFailure {
    pub symbol: String,
    pub error: TaskError,
}

/// Aggregate result of one coordinator run.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub attempted: usize,
    pub succeeded: usize,
    pub failures: Vec<TaskFailure>,
}

impl BatchOutcome {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Runs one fetch-and-persist task per currency and waits for all of them.
pub struct FetchCoordinator {
    source: Arc<dyn PriceSource>,
    prices: Arc<dyn PriceServiceTrait>,
    fetch_timeout: Option<Duration>,
}

impl FetchCoordinator {
    pub fn new(
        source: Arc<dyn PriceSource>,
        prices: Arc<dyn PriceServiceTrait>,
        fetch_timeout: Option<Duration>,
    ) -> Self {
        Self {
            source,
            prices,
            fetch_timeout,
        }
    }

    /// Returns only after every spawned task has reported, whatever the order.
    ///
    /// A failing or panicking task is recorded in the outcome and never
    /// affects its siblings.
    pub async fn run(&self, currencies: Vec<Currency>) -> BatchOutcome {
        if currencies.is_empty() {
            return BatchOutcome::default();
        }

        let mut pending = FuturesUnordered::new();
        for currency in currencies {
            let symbol = currency.symbol.clone();
            let handle = tokio::spawn(fetch_and_persist(
                self.source.clone(),
                self.prices.clone(),
                currency,
                self.fetch_timeout,
            ));
            pending.push(async move { (symbol, handle.await) });
        }

        let mut outcome = BatchOutcome {
            attempted: pending.len(),
            ..Default::default()
        };

        while let Some((symbol, joined)) = pending.next().await {
            let result = joined.unwrap_or_else(|e| Err(TaskError::Panicked(e.to_string())));
            match result {
                Ok(observation) => {
                    debug!(
                        "{} price {} recorded at {}",
                        symbol, observation.price, observation.timestamp
                    );
                    outcome.succeeded += 1;
                }
                Err(error) => {
                    warn!("{} price not recorded [{}]: {}", symbol, error.kind(), error);
                    outcome.failures.push(TaskFailure { symbol, error });
                }
            }
        }

        outcome
    }
}

async fn fetch_and_persist(
    source: Arc<dyn PriceSource>,
    prices: Arc<dyn PriceServiceTrait>,
    currency: Currency,
    fetch_timeout: Option<Duration>,
) -> Result<PriceObservation, TaskError> {
    let work = async {
        let price = source.fetch_price(&currency.symbol).await?;
        let fetched_at = Utc::now();
        prices
            .save_price(currency.id, price, fetched_at)
            .await
            .map_err(TaskError::Persist)
    };

    match fetch_timeout {
        Some(limit) => tokio::time::timeout(limit, work)
            .await
            .map_err(|_| TaskError::TimedOut(limit))?,
        None => work.await,
    }
}
