//! Runtime configuration, read from the environment.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `PRODUCT_URL` | required |
//! | `PRODUCT_TOKEN` | `dev-token` |
//! | `PRODUCT_RETRIES` | 3 |
//! | `PRODUCT_RETRY_DELAY_MS` | 300 |
//! | `PRODUCT_TIMEOUT_MS` | 5000 |
//! | `CART_SHARDS` | 8 |
//! | `LOOKUP_CONCURRENCY` | 4 |
//! | `REQUEST_TIMEOUT_MS` | unset |
//! | `DATABASE_URL` | unset |

use crate::product::retry::{DEFAULT_ATTEMPTS, DEFAULT_DELAY};
use crate::product::transport::DEFAULT_HTTP_TIMEOUT;
use crate::product::RetryPolicy;
use crate::service::DEFAULT_LOOKUP_CONCURRENCY;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_PRODUCT_TOKEN: &str = "dev-token";
pub const DEFAULT_SHARDS: usize = 8;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing environment variable '{0}'")]
    Missing(&'static str),

    #[error("Invalid {name} value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    pub product_url: String,
    pub product_token: String,
    pub retry: RetryPolicy,
    pub product_timeout: Duration,
    pub shards: usize,
    pub lookup_concurrency: usize,
    pub request_timeout: Option<Duration>,
    pub database_url: Option<String>,
}

impl CartConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_env_file();
        let config = Self::from_source(|name| env::var(name).ok())?;
        info!("Configuration loaded");
        Ok(config)
    }

    /// Same parsing as [`CartConfig::from_env`], against any variable source.
    pub fn from_source<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &'static str| get(name).filter(|v| !v.trim().is_empty());

        let product_url = read("PRODUCT_URL").ok_or(ConfigError::Missing("PRODUCT_URL"))?;
        let product_token = read("PRODUCT_TOKEN").unwrap_or_else(|| DEFAULT_PRODUCT_TOKEN.to_string());

        let retries = parse_or("PRODUCT_RETRIES", read("PRODUCT_RETRIES"), DEFAULT_ATTEMPTS)?;
        let retries = at_least_one("PRODUCT_RETRIES", retries)?;
        let delay_ms = parse_or(
            "PRODUCT_RETRY_DELAY_MS",
            read("PRODUCT_RETRY_DELAY_MS"),
            DEFAULT_DELAY.as_millis() as u64,
        )?;
        let timeout_ms = parse_or(
            "PRODUCT_TIMEOUT_MS",
            read("PRODUCT_TIMEOUT_MS"),
            DEFAULT_HTTP_TIMEOUT.as_millis() as u64,
        )?;
        let timeout_ms = at_least_one("PRODUCT_TIMEOUT_MS", timeout_ms)?;

        let shards = parse_or("CART_SHARDS", read("CART_SHARDS"), DEFAULT_SHARDS)?;
        let shards = at_least_one("CART_SHARDS", shards)?;
        let lookup_concurrency = parse_or(
            "LOOKUP_CONCURRENCY",
            read("LOOKUP_CONCURRENCY"),
            DEFAULT_LOOKUP_CONCURRENCY,
        )?;
        let lookup_concurrency = at_least_one("LOOKUP_CONCURRENCY", lookup_concurrency)?;

        let request_timeout = match read("REQUEST_TIMEOUT_MS") {
            Some(raw) => {
                let ms = parse("REQUEST_TIMEOUT_MS", &raw)?;
                Some(Duration::from_millis(at_least_one("REQUEST_TIMEOUT_MS", ms)?))
            }
            None => None,
        };

        let config = Self {
            product_url,
            product_token,
            retry: RetryPolicy::new(retries, Duration::from_millis(delay_ms)),
            product_timeout: Duration::from_millis(timeout_ms),
            shards,
            lookup_concurrency,
            request_timeout,
            database_url: read("DATABASE_URL"),
        };
        debug!(
            product_url = %config.product_url,
            retries = config.retry.attempts(),
            shards = config.shards,
            lookup_concurrency = config.lookup_concurrency,
            "Configuration parsed"
        );
        Ok(config)
    }
}

fn parse<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn parse_or<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.map_or(Ok(default), |raw| parse(name, &raw))
}

fn at_least_one<T>(name: &'static str, value: T) -> Result<T, ConfigError>
where
    T: PartialEq + Default + ToString,
{
    if value == T::default() {
        return Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
            reason: "must be at least 1".into(),
        });
    }
    Ok(value)
}

/// Loads `.env` from the working directory into the process environment, if present.
///
/// Variables already set win. Call before anything else reads the environment.
pub fn load_env_file() {
    if let Ok(path) = dotenvy::dotenv() {
        debug!(path = %path.display(), "Loaded .env");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<CartConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CartConfig::from_source(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("PRODUCT_URL", "http://localhost:8081")]).unwrap();
        assert_eq!(config.product_token, "dev-token");
        assert_eq!(config.retry, RetryPolicy::new(3, Duration::from_millis(300)));
        assert_eq!(config.product_timeout, Duration::from_secs(5));
        assert_eq!(config.shards, 8);
        assert_eq!(config.lookup_concurrency, 4);
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.database_url, None);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("PRODUCT_URL", "http://products"),
            ("PRODUCT_TOKEN", "secret"),
            ("PRODUCT_RETRIES", "5"),
            ("PRODUCT_RETRY_DELAY_MS", "0"),
            ("CART_SHARDS", "2"),
            ("REQUEST_TIMEOUT_MS", "1500"),
            ("DATABASE_URL", "postgres://localhost/cart"),
        ])
        .unwrap();
        assert_eq!(config.product_token, "secret");
        assert_eq!(config.retry.attempts(), 5);
        assert_eq!(config.retry.delay(), Duration::ZERO);
        assert_eq!(config.shards, 2);
        assert_eq!(config.request_timeout, Some(Duration::from_millis(1500)));
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/cart"));
    }

    #[test]
    fn test_missing_url() {
        assert_eq!(load(&[]), Err(ConfigError::Missing("PRODUCT_URL")));
        assert_eq!(load(&[("PRODUCT_URL", "  ")]), Err(ConfigError::Missing("PRODUCT_URL")));
    }

    #[test]
    fn test_invalid_values() {
        let bad_number = load(&[("PRODUCT_URL", "http://p"), ("PRODUCT_RETRIES", "three")]);
        assert!(matches!(
            bad_number,
            Err(ConfigError::Invalid { name: "PRODUCT_RETRIES", .. })
        ));

        let zero_shards = load(&[("PRODUCT_URL", "http://p"), ("CART_SHARDS", "0")]);
        assert!(matches!(
            zero_shards,
            Err(ConfigError::Invalid { name: "CART_SHARDS", .. })
        ));
    }
}
