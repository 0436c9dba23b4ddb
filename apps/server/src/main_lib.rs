use std::sync::Arc;

use crate::config::Config;
use pricewatch_core::{
    currencies::{CurrencyService, CurrencyServiceTrait},
    prices::{PriceService, PriceServiceTrait},
    watcher::{Watcher, WatcherConfig},
};
use pricewatch_market_data::{KucoinProvider, ProviderConfig};
use pricewatch_storage_sqlite::{
    currencies::CurrencyRepository,
    db::{self, write_actor},
    prices::PriceRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub currency_service: Arc<dyn CurrencyServiceTrait>,
    pub price_service: Arc<dyn PriceServiceTrait>,
    pub watcher: Arc<Watcher>,
}

pub fn init_tracing() {
    let log_format = std::env::var("PW_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

/// Opens the database and wires services and the watcher. Does not start polling.
pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Using database at {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer((*pool).clone());

    let currency_repository = Arc::new(CurrencyRepository::new(pool.clone(), writer.clone()));
    let price_repository = Arc::new(PriceRepository::new(pool.clone(), writer));

    let currency_service: Arc<dyn CurrencyServiceTrait> =
        Arc::new(CurrencyService::new(currency_repository));
    let price_service: Arc<dyn PriceServiceTrait> =
        Arc::new(PriceService::new(price_repository));

    let provider = Arc::new(KucoinProvider::with_config(ProviderConfig {
        base_url: config.provider_base_url.clone(),
        quote_currency: config.quote_currency.clone(),
    }));

    let watcher = Arc::new(Watcher::new(
        WatcherConfig {
            poll_interval: config.poll_interval,
            fetch_timeout: config.fetch_timeout,
        },
        currency_service.clone(),
        provider,
        price_service.clone(),
    ));

    Ok(Arc::new(AppState {
        currency_service,
        price_service,
        watcher,
    }))
}
