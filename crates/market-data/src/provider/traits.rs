//! Source adapter trait definitions.
//!
//! The quote service only sees these traits, so tests and alternative sources
//! can stand in for the HTTP adapters.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{OfferBatch, RateQuote};

/// Source of the informal-market buy/sell quote.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use cotizador_market_data::{BlueRateProvider, MarketDataError, RateQuote};
///
/// struct FixedRate;
///
/// #[async_trait]
/// impl BlueRateProvider for FixedRate {
///     fn id(&self) -> &'static str {
///         "FIXED"
///     }
///
///     async fn fetch_blue_rate(&self) -> Result<RateQuote, MarketDataError> {
///         Ok(RateQuote::new(1480.0, 1500.0, "fixed"))
///     }
/// }
/// ```
#[async_trait]
pub trait BlueRateProvider: Send + Sync {
    /// Constant identifier used in logs.
    fn id(&self) -> &'static str;

    /// Fetch the current quote.
    ///
    /// Returns [`MarketDataError::SourceUnavailable`] when no source could be
    /// read; implementations never fall back to a cached or default value.
    async fn fetch_blue_rate(&self) -> Result<RateQuote, MarketDataError>;
}

/// Source of P2P sell offer prices.
#[async_trait]
pub trait OfferProvider: Send + Sync {
    /// Constant identifier used in logs.
    fn id(&self) -> &'static str;

    /// Fetch one page of offers.
    ///
    /// The returned batch is never empty; an empty market is an error.
    async fn fetch_offers(&self) -> Result<OfferBatch, MarketDataError>;
}
