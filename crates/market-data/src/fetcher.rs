//! Resilient HTTP fetcher shared by the source adapters.
//!
//! Every request gets the same per-attempt timeout and is retried up to
//! [`RetryPolicy::max_attempts`] times on transport errors and non-2xx
//! statuses. Exhaustion is final for that call.

use std::time::Duration;

use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::errors::MarketDataError;

/// Browser user agent; both sources serve bots a different page.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                          AppleWebKit/537.36 (KHTML, like Gecko) \
                          Chrome/131.0.0.0 Safari/537.36";

/// Default number of attempts per request.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default per-attempt timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(25);

/// Default base delay between attempts.
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(500);

/// Retry and timeout settings applied to every request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,

    /// Timeout applied to each attempt.
    pub timeout: Duration,

    /// Base delay between attempts, multiplied by the attempt number.
    /// Zero disables the delay.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            timeout: DEFAULT_TIMEOUT,
            backoff: DEFAULT_BACKOFF,
        }
    }
}

/// Per-request body and headers.
#[derive(Clone, Debug, Default)]
pub struct FetchOptions {
    pub json: Option<Value>,
    pub form: Option<Vec<(String, String)>>,
    pub headers: Vec<(String, String)>,
}

impl FetchOptions {
    pub fn json(body: Value) -> Self {
        Self {
            json: Some(body),
            ..Self::default()
        }
    }

    pub fn form(fields: Vec<(String, String)>) -> Self {
        Self {
            form: Some(fields),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// A successful (2xx) response with its body read as text.
#[derive(Clone, Debug)]
pub struct FetchedResponse {
    /// Requested URL
    pub url: String,
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: String,
}

/// HTTP client wrapper with bounded retry.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct ResilientFetcher {
    client: Client,
    policy: RetryPolicy,
}

impl ResilientFetcher {
    /// Build a fetcher with its own client.
    pub fn new(policy: RetryPolicy) -> Result<Self, MarketDataError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(policy.timeout)
            .build()?;
        Ok(Self { client, policy })
    }

    pub async fn get(&self, url: &str) -> Result<FetchedResponse, MarketDataError> {
        self.request(Method::GET, url, &FetchOptions::default()).await
    }

    /// Send a request, retrying failed attempts.
    ///
    /// Returns [`MarketDataError::FetchExhausted`] carrying the URL and the
    /// last underlying error once every attempt has failed.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        options: &FetchOptions,
    ) -> Result<FetchedResponse, MarketDataError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            debug!(%method, url, attempt, max_attempts, "Sending request");

            match self.attempt(&method, url, options).await {
                Ok(response) => {
                    debug!(url, attempt, status = response.status, "Request succeeded");
                    return Ok(response);
                }
                Err(message) => {
                    warn!(
                        %method,
                        url,
                        attempt,
                        max_attempts,
                        "Request attempt failed: {}",
                        message
                    );
                    last_error = message;
                }
            }

            if attempt < max_attempts && !self.policy.backoff.is_zero() {
                tokio::time::sleep(self.policy.backoff * attempt).await;
            }
        }

        error!(
            %method,
            url,
            attempts = max_attempts,
            "Request exhausted all attempts: {}",
            last_error
        );
        Err(MarketDataError::FetchExhausted {
            url: url.to_string(),
            attempts: max_attempts,
            message: last_error,
        })
    }

    async fn attempt(
        &self,
        method: &Method,
        url: &str,
        options: &FetchOptions,
    ) -> Result<FetchedResponse, String> {
        let mut builder = self
            .client
            .request(method.clone(), url)
            .timeout(self.policy.timeout);

        for (name, value) in &options.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &options.json {
            builder = builder.json(body);
        }
        if let Some(fields) = &options.form {
            builder = builder.form(fields);
        }

        let response = builder.send().await.map_err(|e| e.to_string())?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status));
        }

        let body = response.text().await.map_err(|e| e.to_string())?;
        Ok(FetchedResponse {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}
