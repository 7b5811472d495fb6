//! Source adapter abstractions and implementations.
//!
//! This module contains:
//! - The `BlueRateProvider` and `OfferProvider` traits the quote service
//!   depends on
//! - `blue_rate`: candidate-page scraper for the informal-market quote
//! - `p2p`: P2P market API client for sell offers
//!
//! Both adapters share one [`ResilientFetcher`](crate::fetcher::ResilientFetcher)
//! and one [`DiagnosticSink`](crate::diagnostics::DiagnosticSink).

mod traits;

pub mod blue_rate;
pub mod p2p;

pub use traits::{BlueRateProvider, OfferProvider};
