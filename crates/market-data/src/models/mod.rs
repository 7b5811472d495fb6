//! Market data models
//!
//! - `quote` - Blue-market two-sided quote (RateQuote) and P2P offer prices (OfferBatch)

mod quote;

pub use quote::{OfferBatch, RateQuote};
