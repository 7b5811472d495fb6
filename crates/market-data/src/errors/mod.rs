//! Error types for the market data crate.
//!
//! Every variant except [`MarketDataError::InvalidAmount`] is terminal for the
//! run: a stale or guessed rate is worse than no rate, so no caller swaps in a
//! default value. The P2P variants are kept distinct so an operator can tell
//! "source changed shape" from "source returned nothing" from "source returned
//! garbage prices".

use thiserror::Error;

use crate::amount::AmountParseError;

/// Errors that can occur while acquiring market data.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// Every attempt of a single request failed.
    /// Final for that call, callers must not retry it.
    #[error("Request to {url} failed after {attempts} attempts: {message}")]
    FetchExhausted {
        /// The requested URL
        url: String,
        /// Number of attempts made
        attempts: u32,
        /// The last underlying error
        message: String,
    },

    /// No blue-rate candidate page yielded a quote.
    #[error("Blue rate unavailable: all {candidates} candidate sources failed")]
    SourceUnavailable {
        /// Number of candidate URLs tried
        candidates: usize,
    },

    /// The P2P response body is not valid JSON.
    #[error("Malformed P2P response: {message}")]
    MalformedResponse {
        /// The JSON parser error
        message: String,
    },

    /// The P2P response holds no offer records.
    #[error("P2P market returned no offers")]
    EmptyMarket,

    /// Offer records were returned but none carried a usable price.
    #[error("None of the {records} P2P offers had a parseable price")]
    UnparsablePrices {
        /// Number of records in the response
        records: usize,
    },

    /// A scraped amount could not be parsed.
    #[error(transparent)]
    InvalidAmount(#[from] AmountParseError),

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Whether the failure came from the network rather than from the payload.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::FetchExhausted { .. } | Self::Client(_))
    }
}
