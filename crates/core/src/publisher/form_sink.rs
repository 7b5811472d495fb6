use async_trait::async_trait;
use cotizador_market_data::{FetchOptions, ResilientFetcher};
use log::info;
use reqwest::Method;

use super::{PublishError, ResultRecord};

/// External consumer of a finished run.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Constant identifier used in logs.
    fn id(&self) -> &'static str;

    async fn publish(&self, record: &ResultRecord) -> Result<(), PublishError>;
}

/// Submits the record url-encoded to a web form endpoint.
pub struct FormSink {
    fetcher: ResilientFetcher,
    url: String,
}

impl FormSink {
    const ID: &'static str = "FORM";

    pub fn new(fetcher: ResilientFetcher, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
        }
    }
}

#[async_trait]
impl ResultSink for FormSink {
    fn id(&self) -> &'static str {
        Self::ID
    }

    async fn publish(&self, record: &ResultRecord) -> Result<(), PublishError> {
        let response = self
            .fetcher
            .request(Method::POST, &self.url, &FetchOptions::form(record.to_form()))
            .await
            .map_err(|source| PublishError::Delivery {
                sink: Self::ID,
                source,
            })?;

        info!("Result record submitted to {} (HTTP {})", self.url, response.status);
        Ok(())
    }
}
