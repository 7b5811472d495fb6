use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Informal-market two-sided quote.
///
/// Both sides are positive. `sell >= buy` is the usual shape but the source
/// does not guarantee it, so nothing downstream relies on it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RateQuote {
    /// Price the market pays for one dollar ("compra")
    pub buy: f64,

    /// Price the market asks for one dollar ("venta")
    pub sell: f64,

    /// Candidate URL the quote was scraped from
    pub source: String,

    /// When the page was fetched
    pub fetched_at: DateTime<Utc>,
}

impl RateQuote {
    /// Create a quote fetched now.
    pub fn new(buy: f64, sell: f64, source: impl Into<String>) -> Self {
        Self {
            buy,
            sell,
            source: source.into(),
            fetched_at: Utc::now(),
        }
    }

    /// True when the sell side is below the buy side.
    pub fn is_inverted(&self) -> bool {
        self.sell < self.buy
    }
}

/// Prices of the P2P sell offers retrieved in one query, in response order.
///
/// Never empty: the only constructor rejects an empty list. Repeated prices
/// are kept.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OfferBatch {
    prices: Vec<f64>,
}

impl OfferBatch {
    /// Wrap a list of prices; `None` if it is empty.
    pub fn new(prices: Vec<f64>) -> Option<Self> {
        if prices.is_empty() {
            return None;
        }
        Some(Self { prices })
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Always false, kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Lowest offer price.
    pub fn low(&self) -> f64 {
        self.prices.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Highest offer price.
    pub fn high(&self) -> f64 {
        self.prices.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}
