use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use pricewatch_market_data::provider::kucoin::{DEFAULT_BASE_URL, DEFAULT_QUOTE_CURRENCY};

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_PATH: &str = "./db/pricewatch.db";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub poll_interval: Duration,
    /// `None` when `PW_FETCH_TIMEOUT_SECS=0`
    pub fetch_timeout: Option<Duration>,
    pub provider_base_url: String,
    pub quote_currency: String,
}

impl Config {
    /// Reads `PW_*` variables, loading `.env` first when present.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        // Unparsable or zero values fall back to the default
        let positive = |key: &str, default: u64| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(default)
        };

        let listen_addr: SocketAddr = var("PW_LISTEN_ADDR", DEFAULT_LISTEN_ADDR)
            .parse()
            .context("Invalid PW_LISTEN_ADDR")?;
        let db_path = var("PW_DB_PATH", DEFAULT_DB_PATH);
        let cors_allow = var("PW_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let fetch_timeout = match lookup("PW_FETCH_TIMEOUT_SECS").map(|v| v.trim().parse::<u64>()) {
            Some(Ok(0)) => None,
            Some(Ok(secs)) => Some(Duration::from_secs(secs)),
            _ => Some(Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS)),
        };

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(positive(
                "PW_REQUEST_TIMEOUT_MS",
                DEFAULT_REQUEST_TIMEOUT_MS,
            )),
            poll_interval: Duration::from_secs(positive(
                "PW_POLL_INTERVAL_SECS",
                DEFAULT_POLL_INTERVAL_SECS,
            )),
            fetch_timeout,
            provider_base_url: var("PW_PROVIDER_BASE_URL", DEFAULT_BASE_URL),
            quote_currency: var("PW_QUOTE_CURRENCY", DEFAULT_QUOTE_CURRENCY),
        })
    }
}
