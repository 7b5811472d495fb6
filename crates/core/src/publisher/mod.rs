//! Result publishing.
//!
//! A finished run is rendered as console report lines and, optionally, handed
//! to an external [`ResultSink`] as a flat [`ResultRecord`].

mod form_sink;
mod record;
mod report;

pub use form_sink::{FormSink, ResultSink};
pub use record::ResultRecord;
pub use report::{render_report, PriceTier, PAYONEER_TIERS, PRICE_TIER_GROUPS};

use cotizador_market_data::MarketDataError;
use thiserror::Error;

/// Failure to deliver a record to a result sink.
///
/// Never fatal: the quote service logs it and keeps the computed result.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Sink {sink} rejected the record: {source}")]
    Delivery {
        sink: &'static str,
        #[source]
        source: MarketDataError,
    },
}
