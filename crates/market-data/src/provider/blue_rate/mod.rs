//! Blue-dollar quote scraper.
//!
//! Pages are treated as opaque text; there is no stable DOM to rely on. The
//! quote sits in markup shaped like:
//!
//! ```text
//! <div class="compra"><div class="topic">Compra</div><div class="val">$1480</div></div>
//! <div class="venta"><div class="topic">Venta</div><div class="val">$1500</div></div>
//! ```
//!
//! Extraction starts after the last occurrence of an anchor token ("Dólar
//! blue") so earlier boilerplate (stylesheets, other widgets) cannot produce a
//! false match. If either side is missing after the anchor, both patterns are
//! retried against the whole document.
//!
//! Candidate URLs are tried in order. Unreachable and unparseable candidates
//! are handled the same way: log and move on.

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::amount::{parse_amount, AmountParseError};
use crate::diagnostics::{DiagnosticSink, BLUE_RATE_PAGE};
use crate::errors::MarketDataError;
use crate::fetcher::ResilientFetcher;
use crate::models::RateQuote;
use crate::provider::BlueRateProvider;

/// Provider ID constant
const PROVIDER_ID: &str = "BLUE_RATE";

/// Default anchor token preceding the quote widget.
pub const DEFAULT_ANCHOR: &str = "Dólar blue";

lazy_static! {
    /// Opening marker of a buy or sell block.
    static ref SIDE_PATTERN: Regex =
        Regex::new(r#"(?is)class=["'][^"']*\b(compra|venta)\b[^"']*["']"#)
            .expect("valid side pattern");
    static ref VALUE_PATTERN: Regex = Regex::new(
        r#"(?is)class=["'][^"']*\bval\b[^"']*["'][^>]*>\s*([^<]+?)\s*<"#
    )
    .expect("valid value pattern");
}

/// Why a fetched candidate page did not yield a quote.
#[derive(Error, Debug)]
enum CandidateError {
    #[error("buy/sell values not found in page")]
    PatternNotFound,

    #[error(transparent)]
    InvalidAmount(#[from] AmountParseError),

    #[error("non-positive quote (buy {buy}, sell {sell})")]
    NonPositive { buy: f64, sell: f64 },
}

/// Extract the raw buy and sell tokens from a page.
///
/// Searches the text after the last case-insensitive occurrence of `anchor`
/// first, then the full document. Returns `None` when either side cannot be
/// found in both passes.
pub fn extract_blue_rate(document: &str, anchor: &str) -> Option<(String, String)> {
    if let Some(end) = last_anchor_end(document, anchor) {
        if let Some(pair) = match_pair(&document[end..]) {
            return Some(pair);
        }
        debug!("Quote not found after anchor '{}', searching full document", anchor);
    } else {
        debug!("Anchor '{}' not found, searching full document", anchor);
    }

    match_pair(document)
}

/// Byte offset just past the last occurrence of `anchor`, ignoring case.
fn last_anchor_end(document: &str, anchor: &str) -> Option<usize> {
    if anchor.trim().is_empty() {
        return None;
    }

    let pattern = RegexBuilder::new(&regex::escape(anchor))
        .case_insensitive(true)
        .build()
        .ok()?;

    pattern.find_iter(document).last().map(|m| m.end())
}

fn match_pair(text: &str) -> Option<(String, String)> {
    let buy = side_value(text, "compra")?;
    let sell = side_value(text, "venta")?;
    Some((buy, sell))
}

/// Value of the first `side` block that holds one.
///
/// A block spans from its marker to the next buy or sell marker, so a block
/// without a value never borrows the one of its neighbour.
fn side_value(text: &str, side: &str) -> Option<String> {
    let markers: Vec<_> = SIDE_PATTERN.captures_iter(text).collect();

    for (index, marker) in markers.iter().enumerate() {
        let (Some(whole), Some(name)) = (marker.get(0), marker.get(1)) else {
            continue;
        };
        if !name.as_str().eq_ignore_ascii_case(side) {
            continue;
        }

        let stop = markers
            .get(index + 1)
            .and_then(|next| next.get(0))
            .map_or(text.len(), |next| next.start());
        if let Some(value) = VALUE_PATTERN
            .captures(&text[whole.end()..stop])
            .and_then(|caps| caps.get(1))
        {
            return Some(value.as_str().trim().to_string());
        }
    }

    None
}

/// Scrapes the blue-dollar quote from an ordered list of candidate pages.
pub struct BlueRateScraper {
    fetcher: ResilientFetcher,
    candidates: Vec<String>,
    anchor: String,
    diagnostics: DiagnosticSink,
}

impl BlueRateScraper {
    pub fn new(
        fetcher: ResilientFetcher,
        candidates: Vec<String>,
        anchor: impl Into<String>,
        diagnostics: DiagnosticSink,
    ) -> Self {
        Self {
            fetcher,
            candidates,
            anchor: anchor.into(),
            diagnostics,
        }
    }

    fn parse_candidate(&self, url: &str, document: &str) -> Result<RateQuote, CandidateError> {
        let (raw_buy, raw_sell) =
            extract_blue_rate(document, &self.anchor).ok_or(CandidateError::PatternNotFound)?;
        debug!(url, raw_buy = %raw_buy, raw_sell = %raw_sell, "Matched blue rate tokens");

        let buy = parse_amount(&raw_buy)?;
        let sell = parse_amount(&raw_sell)?;
        if buy <= 0.0 || sell <= 0.0 {
            return Err(CandidateError::NonPositive { buy, sell });
        }

        Ok(RateQuote::new(buy, sell, url))
    }
}

#[async_trait]
impl BlueRateProvider for BlueRateScraper {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_blue_rate(&self) -> Result<RateQuote, MarketDataError> {
        let mut last_document: Option<String> = None;

        for url in &self.candidates {
            let response = match self.fetcher.get(url).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(url = %url, "Blue rate candidate unreachable, trying next: {}", e);
                    continue;
                }
            };

            match self.parse_candidate(url, &response.body) {
                Ok(quote) => {
                    if quote.is_inverted() {
                        warn!(
                            url = %url,
                            "Blue rate sell {} is below buy {}",
                            quote.sell,
                            quote.buy
                        );
                    }
                    info!(
                        url = %url,
                        buy = quote.buy,
                        sell = quote.sell,
                        "Fetched blue rate"
                    );
                    return Ok(quote);
                }
                Err(e) => {
                    warn!(url = %url, "Blue rate candidate unparseable, trying next: {}", e);
                    last_document = Some(response.body);
                }
            }
        }

        match &last_document {
            Some(document) => {
                self.diagnostics.capture(BLUE_RATE_PAGE, document);
            }
            None => warn!("No blue rate candidate could be fetched, nothing to capture"),
        }

        error!(
            candidates = self.candidates.len(),
            "All blue rate candidates failed"
        );
        Err(MarketDataError::SourceUnavailable {
            candidates: self.candidates.len(),
        })
    }
}
