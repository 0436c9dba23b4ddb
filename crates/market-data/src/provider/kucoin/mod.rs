//! KuCoin price provider.
//!
//! Reads the best price from the public level-1 order book endpoint:
//! `GET {base_url}/api/v1/market/orderbook/level1?symbol=BTC-USDT`.
//!
//! The endpoint needs no API key. A successful answer looks like
//! `{"code":"200000","data":{"price":"65000.12", ...}}`; failures carry a
//! different `code` (and usually a `msg`), sometimes with HTTP 200.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::errors::FetchError;
use crate::provider::PriceSource;

/// Default public API host.
pub const DEFAULT_BASE_URL: &str = "https://api.kucoin.com";
/// Default quote currency appended to every symbol.
pub const DEFAULT_QUOTE_CURRENCY: &str = "USDT";

const PROVIDER_ID: &str = "KUCOIN";
const LEVEL1_PATH: &str = "/api/v1/market/orderbook/level1";
const SUCCESS_CODE: &str = "200000";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// API Response Structures
// ============================================================================

/// Envelope returned by every KuCoin REST endpoint.
#[derive(Debug, Deserialize)]
struct Level1Response {
    /// Application status, "200000" on success
    code: String,
    /// Present on success; null for unknown pairs
    #[serde(default)]
    data: Option<Level1Data>,
    /// Error description on failure
    #[serde(default)]
    msg: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Level1Data {
    /// Last traded price as a decimal string
    price: Option<String>,
}

// ============================================================================
// KucoinProvider
// ============================================================================

/// Connection settings for [`KucoinProvider`].
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Scheme and host of the API, without trailing slash
    pub base_url: String,
    /// Quote currency used to build the trading pair (e.g. "USDT")
    pub quote_currency: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            quote_currency: DEFAULT_QUOTE_CURRENCY.to_string(),
        }
    }
}

/// KuCoin spot price provider.
pub struct KucoinProvider {
    client: Client,
    config: ProviderConfig,
}

impl KucoinProvider {
    /// Create a provider against the public KuCoin API quoting in USDT.
    pub fn new() -> Self {
        Self::with_config(ProviderConfig::default())
    }

    /// Create a provider with a custom base URL and quote currency.
    pub fn with_config(config: ProviderConfig) -> Self {
        // Only connection setup is bounded; the overall deadline belongs to the caller.
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        let config = ProviderConfig {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            quote_currency: config.quote_currency.trim().to_uppercase(),
        };

        Self { client, config }
    }

    /// Build the trading pair identifier, e.g. `btc` -> `BTC-USDT`.
    pub fn trading_pair(&self, symbol: &str) -> String {
        format!(
            "{}-{}",
            symbol.trim().to_uppercase(),
            self.config.quote_currency
        )
    }

    fn level1_url(&self) -> String {
        format!("{}{}", self.config.base_url, LEVEL1_PATH)
    }
}

impl Default for KucoinProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceSource for KucoinProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_price(&self, symbol: &str) -> Result<f64, FetchError> {
        let pair = self.trading_pair(symbol);
        debug!("KuCoin level1 request for {}", pair);

        let response = self
            .client
            .get(self.level1_url())
            .query(&[("symbol", pair.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        parse_level1(status, &body)
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Classify a level-1 response into a price or a typed failure.
///
/// Checks run in order: HTTP status, body structure, application code, price value.
fn parse_level1(status: StatusCode, body: &str) -> Result<f64, FetchError> {
    if status != StatusCode::OK {
        return Err(FetchError::UpstreamStatus {
            code: status.as_u16(),
        });
    }

    let response: Level1Response = serde_json::from_str(body)
        .map_err(|e| FetchError::MalformedResponse(format!("Failed to parse body: {}", e)))?;

    if response.code != SUCCESS_CODE {
        if let Some(msg) = &response.msg {
            debug!("KuCoin error {}: {}", response.code, msg);
        }
        return Err(FetchError::UpstreamApp {
            code: response.code,
        });
    }

    let raw_price = response
        .data
        .and_then(|d| d.price)
        .ok_or_else(|| FetchError::MalformedResponse("Missing data.price".to_string()))?;

    match raw_price.trim().parse::<f64>() {
        Ok(price) if price.is_finite() => Ok(price),
        _ => Err(FetchError::PriceFormat(raw_price)),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const OK_BODY: &str = r#"{
        "code": "200000",
        "data": {
            "time": 1729000000000,
            "sequence": "1550467636704",
            "price": "65000.12",
            "size": "0.0014",
            "bestBid": "65000.11",
            "bestBidSize": "0.2",
            "bestAsk": "65000.12",
            "bestAskSize": "1.1"
        }
    }"#;

    #[test]
    fn test_provider_id() {
        let provider = KucoinProvider::new();
        assert_eq!(provider.id(), "KUCOIN");
    }

    #[test]
    fn test_trading_pair_uppercases_symbol() {
        let provider = KucoinProvider::new();
        assert_eq!(provider.trading_pair("btc"), "BTC-USDT");
        assert_eq!(provider.trading_pair(" Eth "), "ETH-USDT");
    }

    #[test]
    fn test_trading_pair_custom_quote() {
        let provider = KucoinProvider::with_config(ProviderConfig {
            base_url: "http://localhost:9999/".to_string(),
            quote_currency: "usdc".to_string(),
        });
        assert_eq!(provider.trading_pair("SOL"), "SOL-USDC");
        assert_eq!(
            provider.level1_url(),
            "http://localhost:9999/api/v1/market/orderbook/level1"
        );
    }

    #[test]
    fn test_parse_success() {
        let price = parse_level1(StatusCode::OK, OK_BODY).unwrap();
        assert!((price - 65000.12).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_non_ok_status() {
        let err = parse_level1(StatusCode::SERVICE_UNAVAILABLE, "").unwrap_err();
        assert!(matches!(err, FetchError::UpstreamStatus { code: 503 }));

        // Even a valid body does not rescue a non-200 status
        let err = parse_level1(StatusCode::CREATED, OK_BODY).unwrap_err();
        assert!(matches!(err, FetchError::UpstreamStatus { code: 201 }));
    }

    #[test]
    fn test_parse_application_error() {
        let body = r#"{"code":"400100","msg":"Unsupported trading pair"}"#;
        let err = parse_level1(StatusCode::OK, body).unwrap_err();
        match err {
            FetchError::UpstreamApp { code } => assert_eq!(code, "400100"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_malformed_body() {
        let err = parse_level1(StatusCode::OK, "<html>gateway</html>").unwrap_err();
        assert!(matches!(err, FetchError::MalformedResponse(_)));

        let err = parse_level1(StatusCode::OK, r#"{"data":{"price":"1"}}"#).unwrap_err();
        assert!(matches!(err, FetchError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_null_data_for_unknown_pair() {
        let body = r#"{"code":"200000","data":null}"#;
        let err = parse_level1(StatusCode::OK, body).unwrap_err();
        assert!(matches!(err, FetchError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_invalid_price() {
        let body = r#"{"code":"200000","data":{"price":"not-a-number"}}"#;
        let err = parse_level1(StatusCode::OK, body).unwrap_err();
        match err {
            FetchError::PriceFormat(raw) => assert_eq!(raw, "not-a-number"),
            other => panic!("unexpected error: {:?}", other),
        }

        let body = r#"{"code":"200000","data":{"price":"NaN"}}"#;
        let err = parse_level1(StatusCode::OK, body).unwrap_err();
        assert!(matches!(err, FetchError::PriceFormat(_)));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host_is_transport_error() {
        // Grab a free port, then release it so nothing is listening there
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let provider = KucoinProvider::with_config(ProviderConfig {
            base_url: format!("http://{}", addr),
            quote_currency: DEFAULT_QUOTE_CURRENCY.to_string(),
        });

        let err = provider.fetch_price("BTC").await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
        assert_eq!(err.kind(), "transport");
    }
}
