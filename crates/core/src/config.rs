//! Run configuration.
//!
//! Read once at startup from `COTIZADOR_*` environment variables (a `.env`
//! file is honored) and never mutated afterwards. Unset variables take the
//! defaults below; set-but-invalid values are rejected rather than replaced.

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use cotizador_market_data::fetcher::{DEFAULT_BACKOFF, DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT};
use cotizador_market_data::provider::blue_rate::DEFAULT_ANCHOR;
use cotizador_market_data::provider::p2p::DEFAULT_ENDPOINT;
use cotizador_market_data::{P2pQuery, RetryPolicy};

use crate::errors::{Error, Result};

/// Operator margin applied to the lowest P2P offer.
pub const DEFAULT_COMMISSION_RATE: f64 = 0.85;

/// Share of the spread midpoint kept after settlement fees.
pub const DEFAULT_COMMISSION_FACTOR: f64 = 0.96;

/// Blue-rate candidate pages, tried in order.
pub const DEFAULT_BLUE_RATE_URLS: &[&str] = &[
    "https://dolarhoy.com/",
    "https://dolarhoy.com/cotizaciondolarblue",
];

pub const DEFAULT_DIAGNOSTICS_DIR: &str = "diagnostics";

/// Frozen run configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub commission_rate: f64,
    pub commission_factor: f64,
    pub blue_rate_urls: Vec<String>,
    pub blue_rate_anchor: String,
    pub p2p_endpoint: String,
    pub p2p_query: P2pQuery,
    pub retry: RetryPolicy,
    pub diagnostics_dir: PathBuf,
    /// Form endpoint receiving the result record; `None` disables the sink.
    pub form_url: Option<String>,
    /// Only print the Payoneer tiers of the advertisement block.
    pub only_payoneer: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            commission_rate: DEFAULT_COMMISSION_RATE,
            commission_factor: DEFAULT_COMMISSION_FACTOR,
            blue_rate_urls: DEFAULT_BLUE_RATE_URLS
                .iter()
                .map(|url| url.to_string())
                .collect(),
            blue_rate_anchor: DEFAULT_ANCHOR.to_string(),
            p2p_endpoint: DEFAULT_ENDPOINT.to_string(),
            p2p_query: P2pQuery::default(),
            retry: RetryPolicy::default(),
            diagnostics_dir: PathBuf::from(DEFAULT_DIAGNOSTICS_DIR),
            form_url: None,
            only_payoneer: false,
        }
    }
}

impl Config {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let blue_rate_urls = match get("COTIZADOR_BLUE_URLS") {
            Some(raw) => raw
                .split(',')
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty())
                .collect(),
            None => defaults.blue_rate_urls,
        };

        let p2p_query = P2pQuery {
            page: parse_or(
                "COTIZADOR_P2P_PAGE",
                get("COTIZADOR_P2P_PAGE"),
                defaults.p2p_query.page,
            )?,
            rows: parse_or(
                "COTIZADOR_P2P_ROWS",
                get("COTIZADOR_P2P_ROWS"),
                defaults.p2p_query.rows,
            )?,
            asset: get("COTIZADOR_P2P_ASSET").unwrap_or(defaults.p2p_query.asset),
            fiat: get("COTIZADOR_P2P_FIAT").unwrap_or(defaults.p2p_query.fiat),
            trade_type: get("COTIZADOR_P2P_TRADE_TYPE").unwrap_or(defaults.p2p_query.trade_type),
        };

        let retry = RetryPolicy {
            max_attempts: parse_or(
                "COTIZADOR_MAX_ATTEMPTS",
                get("COTIZADOR_MAX_ATTEMPTS"),
                DEFAULT_MAX_ATTEMPTS,
            )?,
            timeout: Duration::from_secs(parse_or(
                "COTIZADOR_TIMEOUT_SECS",
                get("COTIZADOR_TIMEOUT_SECS"),
                DEFAULT_TIMEOUT.as_secs(),
            )?),
            backoff: Duration::from_millis(parse_or(
                "COTIZADOR_BACKOFF_MS",
                get("COTIZADOR_BACKOFF_MS"),
                DEFAULT_BACKOFF.as_millis() as u64,
            )?),
        };

        let only_payoneer = match get("COTIZADOR_ONLY_PAYONEER") {
            Some(raw) => parse_bool("COTIZADOR_ONLY_PAYONEER", &raw)?,
            None => defaults.only_payoneer,
        };

        let config = Self {
            commission_rate: parse_or(
                "COTIZADOR_COMMISSION_RATE",
                get("COTIZADOR_COMMISSION_RATE"),
                defaults.commission_rate,
            )?,
            commission_factor: parse_or(
                "COTIZADOR_COMMISSION_FACTOR",
                get("COTIZADOR_COMMISSION_FACTOR"),
                defaults.commission_factor,
            )?,
            blue_rate_urls,
            blue_rate_anchor: get("COTIZADOR_BLUE_ANCHOR").unwrap_or(defaults.blue_rate_anchor),
            p2p_endpoint: get("COTIZADOR_P2P_URL").unwrap_or(defaults.p2p_endpoint),
            p2p_query,
            retry,
            diagnostics_dir: get("COTIZADOR_DIAGNOSTICS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.diagnostics_dir),
            form_url: get("COTIZADOR_FORM_URL"),
            only_payoneer,
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject values the rate model or the fetcher cannot work with.
    pub fn validate(&self) -> Result<()> {
        check_ratio("commission_rate", self.commission_rate)?;
        check_ratio("commission_factor", self.commission_factor)?;

        if self.blue_rate_urls.is_empty() {
            return Err(Error::InvalidConfigValue(
                "at least one blue rate URL is required".to_string(),
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(Error::InvalidConfigValue("max_attempts must be at least 1".to_string()));
        }
        if self.retry.timeout.is_zero() {
            return Err(Error::InvalidConfigValue("request timeout must be positive".to_string()));
        }
        if self.p2p_query.rows == 0 {
            return Err(Error::InvalidConfigValue("P2P rows must be at least 1".to_string()));
        }
        Ok(())
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match raw {
        Some(raw) => raw
            .parse()
            .map_err(|e| Error::InvalidConfigValue(format!("{}={}: {}", key, raw, e))),
        None => Ok(default),
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "si" | "y" => Ok(true),
        "0" | "false" | "no" | "n" => Ok(false),
        _ => Err(Error::InvalidConfigValue(format!("{}={}: expected yes or no", key, raw))),
    }
}

fn check_ratio(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfigValue(format!(
            "{} must be in (0, 1], got {}",
            name, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = from_pairs(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.commission_rate, 0.85);
        assert_eq!(config.commission_factor, 0.96);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.timeout, Duration::from_secs(25));
        assert_eq!(config.p2p_query.rows, 20);
        assert_eq!(config.blue_rate_urls.len(), 2);
        assert!(config.form_url.is_none());
        assert!(!config.only_payoneer);
    }

    #[test]
    fn test_overrides() {
        let config = from_pairs(&[
            ("COTIZADOR_COMMISSION_RATE", "0.87"),
            ("COTIZADOR_COMMISSION_FACTOR", " 0.95 "),
            ("COTIZADOR_BLUE_URLS", "https://a.example/, ,https://b.example/"),
            ("COTIZADOR_P2P_ROWS", "10"),
            ("COTIZADOR_P2P_FIAT", "VES"),
            ("COTIZADOR_MAX_ATTEMPTS", "5"),
            ("COTIZADOR_TIMEOUT_SECS", "10"),
            ("COTIZADOR_BACKOFF_MS", "0"),
            ("COTIZADOR_FORM_URL", "https://forms.example/submit"),
            ("COTIZADOR_ONLY_PAYONEER", "YES"),
            ("COTIZADOR_DIAGNOSTICS_DIR", "/tmp/cotizador"),
        ])
        .unwrap();

        assert_eq!(config.commission_rate, 0.87);
        assert_eq!(config.commission_factor, 0.95);
        assert_eq!(
            config.blue_rate_urls,
            vec!["https://a.example/".to_string(), "https://b.example/".to_string()]
        );
        assert_eq!(config.p2p_query.rows, 10);
        assert_eq!(config.p2p_query.fiat, "VES");
        assert_eq!(config.p2p_query.asset, "USDT");
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.timeout, Duration::from_secs(10));
        assert!(config.retry.backoff.is_zero());
        assert_eq!(
            config.form_url.as_deref(),
            Some("https://forms.example/submit")
        );
        assert!(config.only_payoneer);
        assert_eq!(config.diagnostics_dir, PathBuf::from("/tmp/cotizador"));
    }

    #[test]
    fn test_empty_values_use_defaults() {
        let config = from_pairs(&[
            ("COTIZADOR_FORM_URL", ""),
            ("COTIZADOR_MAX_ATTEMPTS", "  "),
        ])
        .unwrap();
        assert!(config.form_url.is_none());
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn test_invalid_number_is_rejected() {
        let err = from_pairs(&[("COTIZADOR_COMMISSION_RATE", "abc")]).unwrap_err();
        match err {
            Error::InvalidConfigValue(msg) => assert!(msg.starts_with("COTIZADOR_COMMISSION_RATE=abc")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_ratio_bounds() {
        assert!(from_pairs(&[("COTIZADOR_COMMISSION_RATE", "1.0")]).is_ok());
        assert!(from_pairs(&[("COTIZADOR_COMMISSION_RATE", "0")]).is_err());
        assert!(from_pairs(&[("COTIZADOR_COMMISSION_RATE", "1.2")]).is_err());
        assert!(from_pairs(&[("COTIZADOR_COMMISSION_FACTOR", "-0.5")]).is_err());
        assert!(from_pairs(&[("COTIZADOR_COMMISSION_FACTOR", "NaN")]).is_err());
    }

    #[test]
    fn test_structural_limits() {
        assert!(from_pairs(&[("COTIZADOR_MAX_ATTEMPTS", "0")]).is_err());
        assert!(from_pairs(&[("COTIZADOR_TIMEOUT_SECS", "0")]).is_err());
        assert!(from_pairs(&[("COTIZADOR_P2P_ROWS", "0")]).is_err());
        assert!(from_pairs(&[("COTIZADOR_BLUE_URLS", " , ")]).is_err());
        assert!(from_pairs(&[("COTIZADOR_MAX_ATTEMPTS", "-1")]).is_err());
    }

    #[test]
    fn test_invalid_bool() {
        let err = from_pairs(&[("COTIZADOR_ONLY_PAYONEER", "maybe")]).unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue(_)));
        assert!(!from_pairs(&[("COTIZADOR_ONLY_PAYONEER", "no")]).unwrap().only_payoneer);
    }
}
