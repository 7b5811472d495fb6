//! Cotizador Market Data Crate
//!
//! Acquisition and normalization of the two reference prices the quoter
//! works from:
//! - the informal-market ("blue") buy/sell quote, scraped from candidate pages
//! - a batch of peer-to-peer sell offers from a P2P market API
//!
//! # Architecture
//!
//! ```text
//! +---------------------+     +---------------------+
//! |  BlueRateProvider   |     |    OfferProvider    |   (source adapters)
//! +---------------------+     +---------------------+
//!            |                           |
//!            +-------------+-------------+
//!                          v
//!                +--------------------+
//!                |  ResilientFetcher  |   (retry + uniform timeout)
//!                +--------------------+
//!                          |
//!                          v
//!                +--------------------+
//!                |   reqwest::Client  |
//!                +--------------------+
//! ```
//!
//! Raw payloads that fail to parse are written through the
//! [`DiagnosticSink`] before the error is returned.
//!
//! # Core Types
//!
//! - [`RateQuote`] - Two-sided blue-market quote
//! - [`OfferBatch`] - Non-empty list of P2P offer prices
//! - [`MarketDataError`] - Failure taxonomy of the acquisition layer

pub mod amount;
pub mod diagnostics;
pub mod errors;
pub mod fetcher;
pub mod models;
pub mod provider;

pub use amount::{format_amount, parse_amount, AmountParseError};
pub use diagnostics::DiagnosticSink;
pub use errors::MarketDataError;
pub use fetcher::{FetchOptions, FetchedResponse, ResilientFetcher, RetryPolicy};
pub use models::{OfferBatch, RateQuote};
pub use provider::blue_rate::{extract_blue_rate, BlueRateScraper};
pub use provider::p2p::{extract_offer_prices, P2pMarketProvider, P2pQuery};
pub use provider::{BlueRateProvider, OfferProvider};
