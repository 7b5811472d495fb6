//! The single-pass quote run.

use std::sync::Arc;

use async_trait::async_trait;
use cotizador_market_data::{
    BlueRateProvider, BlueRateScraper, DiagnosticSink, MarketDataError, OfferProvider,
    P2pMarketProvider, ResilientFetcher,
};
use log::{error, info, warn};

use crate::calculator::SettlementResult;
use crate::config::Config;
use crate::errors::Result;
use crate::publisher::{FormSink, ResultRecord, ResultSink};

#[async_trait]
pub trait QuoteServiceTrait: Send + Sync {
    /// Fetch both sources and compute the settlement.
    ///
    /// Any source failure aborts the run. Nothing is published here, so the
    /// result can be displayed before a slow sink is contacted.
    async fn run(&self) -> Result<SettlementResult>;

    /// Hand a computed result to the configured sink, if any.
    ///
    /// Sink failures are logged and dropped.
    async fn publish(&self, result: &SettlementResult);
}

pub struct QuoteService {
    blue: Arc<dyn BlueRateProvider>,
    offers: Arc<dyn OfferProvider>,
    sink: Option<Arc<dyn ResultSink>>,
    commission_factor: f64,
    commission_rate: f64,
}

impl QuoteService {
    pub fn new(
        config: &Config,
        blue: Arc<dyn BlueRateProvider>,
        offers: Arc<dyn OfferProvider>,
        sink: Option<Arc<dyn ResultSink>>,
    ) -> Self {
        Self {
            blue,
            offers,
            sink,
            commission_factor: config.commission_factor,
            commission_rate: config.commission_rate,
        }
    }

    /// Wire the HTTP adapters described by `config` around one shared client.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let fetcher = ResilientFetcher::new(config.retry.clone())?;
        let diagnostics = DiagnosticSink::new(config.diagnostics_dir.clone());

        let blue = BlueRateScraper::new(
            fetcher.clone(),
            config.blue_rate_urls.clone(),
            config.blue_rate_anchor.clone(),
            diagnostics.clone(),
        );
        let offers = P2pMarketProvider::new(
            fetcher.clone(),
            config.p2p_endpoint.clone(),
            config.p2p_query.clone(),
            diagnostics,
        );
        let sink = config.form_url.as_ref().map(|url| {
            Arc::new(FormSink::new(fetcher.clone(), url.clone())) as Arc<dyn ResultSink>
        });

        Ok(Self::new(config, Arc::new(blue), Arc::new(offers), sink))
    }
}

fn log_source_error(source: &str, e: &MarketDataError) {
    if e.is_transport() {
        error!("{} unreachable: {}", source, e);
    } else {
        error!("{} returned unusable data: {}", source, e);
    }
}

#[async_trait]
impl QuoteServiceTrait for QuoteService {
    async fn run(&self) -> Result<SettlementResult> {
        let blue_fut = async {
            self.blue.fetch_blue_rate().await.inspect_err(|e| {
                log_source_error(self.blue.id(), e);
            })
        };
        let offers_fut = async {
            self.offers.fetch_offers().await.inspect_err(|e| {
                log_source_error(self.offers.id(), e);
            })
        };
        let (quote, batch) = tokio::try_join!(blue_fut, offers_fut)?;

        let result = SettlementResult::compute(
            &quote,
            &batch,
            self.commission_factor,
            self.commission_rate,
        );
        info!(
            "Settlement computed: low {} high {} real {} final {}",
            result.market_low, result.market_high, result.real_value, result.final_rate
        );
        Ok(result)
    }

    async fn publish(&self, result: &SettlementResult) {
        let Some(sink) = &self.sink else {
            return;
        };

        let record = ResultRecord::from_settlement(result, self.commission_rate);
        if let Err(e) = sink.publish(&record).await {
            warn!("Result sink {} failed, result kept: {}", sink.id(), e);
        }
    }
}
