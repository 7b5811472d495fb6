//! Settlement rate model.
//!
//! Two configuration values feed the model and must not be confused:
//! - `commission_factor`: share of the P2P spread midpoint that survives the
//!   settlement channel (Wise/Payoneer fees), e.g. `0.96`
//! - `commission_rate`: operator margin applied to the lowest P2P offer to
//!   produce the quoted resale rate, e.g. `0.85`

use cotizador_market_data::{OfferBatch, RateQuote};
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

/// Real value left per dollar after settlement:
/// `round(((high - low) / 2 + low) * commission_factor, 2)`.
///
/// The rounding runs on the exact binary value in decimal arithmetic, so
/// `1497.5 * 0.96` comes out as `1437.60` and not `1437.6000000000001`.
pub fn compute_real_value(low: f64, high: f64, commission_factor: f64) -> f64 {
    let midpoint = (high - low) / 2.0 + low;
    round_to_cents(midpoint * commission_factor)
}

/// Quoted resale rate: `floor(low * commission_rate)`.
///
/// Truncates, never rounds: `1500.4 * 0.87 = 1305.348` quotes `1305`.
pub fn compute_final_rate(low: f64, commission_rate: f64) -> i64 {
    (low * commission_rate).floor() as i64
}

fn round_to_cents(value: f64) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp(2))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// Every value of one run, derived from the two sources.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SettlementResult {
    pub blue_buy: f64,
    pub blue_sell: f64,
    /// Lowest P2P offer
    pub market_low: f64,
    /// Highest P2P offer
    pub market_high: f64,
    pub real_value: f64,
    pub final_rate: i64,
}

impl SettlementResult {
    pub fn compute(
        quote: &RateQuote,
        offers: &OfferBatch,
        commission_factor: f64,
        commission_rate: f64,
    ) -> Self {
        let market_low = offers.low();
        let market_high = offers.high();

        Self {
            blue_buy: quote.buy,
            blue_sell: quote.sell,
            market_low,
            market_high,
            real_value: compute_real_value(market_low, market_high, commission_factor),
            final_rate: compute_final_rate(market_low, commission_rate),
        }
    }
}
