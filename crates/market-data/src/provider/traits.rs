//! Price source trait definition.

use async_trait::async_trait;

use crate::errors::FetchError;

/// Trait for external price providers.
///
/// Implementations translate a currency symbol into one request against the
/// provider and parse the answer into a price. A single call is a single
/// attempt: no retries, no caching.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use pricewatch_market_data::{FetchError, PriceSource};
///
/// struct FixedSource;
///
/// #[async_trait]
/// impl PriceSource for FixedSource {
///     fn id(&self) -> &'static str {
///         "FIXED"
///     }
///
///     async fn fetch_price(&self, _symbol: &str) -> Result<f64, FetchError> {
///         Ok(1.0)
///     }
/// }
/// ```
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Unique identifier for this provider, used in logs.
    fn id(&self) -> &'static str;

    /// Fetch the current price of `symbol` quoted in the provider's quote currency.
    async fn fetch_price(&self, symbol: &str) -> Result<f64, FetchError>;
}
