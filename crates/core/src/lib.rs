//! Cotizador Core - rate model, configuration, publishing and the run service.
//!
//! The acquisition of raw prices lives in the `cotizador-market-data` crate;
//! this crate turns a blue quote and a batch of P2P offers into a
//! [`SettlementResult`] and hands it to the publishers.

pub mod calculator;
pub mod config;
pub mod errors;
pub mod publisher;
pub mod service;

pub use calculator::{compute_final_rate, compute_real_value, SettlementResult};
pub use config::Config;
pub use publisher::{render_report, FormSink, PublishError, ResultRecord, ResultSink};
pub use service::{QuoteService, QuoteServiceTrait};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
