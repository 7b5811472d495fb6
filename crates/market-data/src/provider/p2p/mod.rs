//! P2P market offers provider.
//!
//! Queries one page of sell offers from a P2P market search API:
//!
//! ```text
//! POST {endpoint}
//! {"page":1,"rows":20,"payTypes":[],"asset":"USDT","fiat":"ARS","tradeType":"SELL"}
//!
//! {"code":"000000","data":[{"adv":{"price":"1495.50",...},"advertiser":{...}},...]}
//! ```
//!
//! The response is walked as untyped JSON so that one odd record cannot sink
//! the whole batch: records without a usable `adv.price` are skipped. Each
//! shape failure saves the raw body through the [`DiagnosticSink`] before the
//! error is returned.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::diagnostics::{DiagnosticSink, P2P_EMPTY, P2P_MALFORMED, P2P_UNPARSABLE};
use crate::errors::MarketDataError;
use crate::fetcher::{FetchOptions, ResilientFetcher};
use crate::models::OfferBatch;
use crate::provider::OfferProvider;

/// Provider ID constant
const PROVIDER_ID: &str = "P2P_MARKET";

/// Default search endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://p2p.binance.com/bapi/c2c/v2/friendly/c2c/adv/search";

/// Fixed parameters of the offer search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct P2pQuery {
    pub page: u32,
    pub rows: u32,
    pub asset: String,
    pub fiat: String,
    pub trade_type: String,
}

impl Default for P2pQuery {
    fn default() -> Self {
        Self {
            page: 1,
            rows: 20,
            asset: "USDT".to_string(),
            fiat: "ARS".to_string(),
            trade_type: "SELL".to_string(),
        }
    }
}

impl P2pQuery {
    /// JSON body sent to the search endpoint.
    pub fn to_body(&self) -> Value {
        json!({
            "page": self.page,
            "rows": self.rows,
            "payTypes": [],
            "asset": self.asset,
            "fiat": self.fiat,
            "tradeType": self.trade_type,
        })
    }
}

/// Extract offer prices from a search response body.
///
/// - body not JSON: [`MarketDataError::MalformedResponse`]
/// - no records under `data`: [`MarketDataError::EmptyMarket`]
/// - records but no usable price: [`MarketDataError::UnparsablePrices`]
pub fn extract_offer_prices(body: &str) -> Result<OfferBatch, MarketDataError> {
    let payload: Value =
        serde_json::from_str(body).map_err(|e| MarketDataError::MalformedResponse {
            message: e.to_string(),
        })?;

    let records = match payload.get("data").and_then(Value::as_array) {
        Some(records) if !records.is_empty() => records,
        _ => return Err(MarketDataError::EmptyMarket),
    };

    let mut prices = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        match offer_price(record) {
            Some(price) => prices.push(price),
            None => debug!(
                index,
                price = ?record.pointer("/adv/price"),
                "Skipping offer without a usable price"
            ),
        }
    }

    let skipped = records.len() - prices.len();
    if skipped > 0 && !prices.is_empty() {
        warn!(
            skipped,
            total = records.len(),
            "Some P2P offers had no usable price"
        );
    }

    OfferBatch::new(prices).ok_or(MarketDataError::UnparsablePrices {
        records: records.len(),
    })
}

/// `adv.price` as a positive finite number; the API sends it as a string.
fn offer_price(record: &Value) -> Option<f64> {
    let price = match record.pointer("/adv/price")? {
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        Value::Number(number) => number.as_f64()?,
        _ => return None,
    };

    (price.is_finite() && price > 0.0).then_some(price)
}

/// P2P market search client.
pub struct P2pMarketProvider {
    fetcher: ResilientFetcher,
    endpoint: String,
    query: P2pQuery,
    diagnostics: DiagnosticSink,
}

impl P2pMarketProvider {
    pub fn new(
        fetcher: ResilientFetcher,
        endpoint: impl Into<String>,
        query: P2pQuery,
        diagnostics: DiagnosticSink,
    ) -> Self {
        Self {
            fetcher,
            endpoint: endpoint.into(),
            query,
            diagnostics,
        }
    }
}

#[async_trait]
impl OfferProvider for P2pMarketProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_offers(&self) -> Result<OfferBatch, MarketDataError> {
        debug!(
            endpoint = %self.endpoint,
            asset = %self.query.asset,
            fiat = %self.query.fiat,
            trade_type = %self.query.trade_type,
            rows = self.query.rows,
            "Querying P2P offers"
        );

        let options = FetchOptions::json(self.query.to_body());
        let response = self
            .fetcher
            .request(Method::POST, &self.endpoint, &options)
            .await?;

        match extract_offer_prices(&response.body) {
            Ok(batch) => {
                info!(
                    count = batch.len(),
                    low = batch.low(),
                    high = batch.high(),
                    "Fetched P2P offers"
                );
                Ok(batch)
            }
            Err(e) => {
                let capture = match &e {
                    MarketDataError::MalformedResponse { .. } => Some(P2P_MALFORMED),
                    MarketDataError::EmptyMarket => Some(P2P_EMPTY),
                    MarketDataError::UnparsablePrices { .. } => Some(P2P_UNPARSABLE),
                    _ => None,
                };
                if let Some(name) = capture {
                    self.diagnostics.capture(name, &response.body);
                }
                error!(endpoint = %self.endpoint, "P2P offers unusable: {}", e);
                Err(e)
            }
        }
    }
}
