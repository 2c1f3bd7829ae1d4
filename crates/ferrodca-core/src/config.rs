//! Advisor configuration.
//!
//! | Field | Default | Environment |
//! |-------|---------|-------------|
//! | `cache_ttl` | 3600 s | `FERRODCA_CACHE_TTL_SECS` |
//! | `price_timeout_ms` | 30000 | `FERRODCA_PRICE_TIMEOUT_MS` |
//! | `sentiment_timeout_ms` | 10000 | `FERRODCA_SENTIMENT_TIMEOUT_MS` |
//! | `chart_base_url` | Yahoo chart API | `FERRODCA_CHART_URL` |
//! | `sentiment_url` | CNN Fear & Greed | `FERRODCA_SENTIMENT_URL` |
//! | `max_retries` | 2 | `FERRODCA_MAX_RETRIES` |

use std::str::FromStr;
use std::time::Duration;

use crate::adapters::cnn::DEFAULT_FEAR_GREED_URL;
use crate::adapters::yahoo::DEFAULT_CHART_BASE_URL;
use crate::provider::DEFAULT_CACHE_TTL;
use crate::retry::RetryConfig;
use crate::ValidationError;

pub const ENV_CACHE_TTL_SECS: &str = "FERRODCA_CACHE_TTL_SECS";
pub const ENV_PRICE_TIMEOUT_MS: &str = "FERRODCA_PRICE_TIMEOUT_MS";
pub const ENV_SENTIMENT_TIMEOUT_MS: &str = "FERRODCA_SENTIMENT_TIMEOUT_MS";
pub const ENV_CHART_URL: &str = "FERRODCA_CHART_URL";
pub const ENV_SENTIMENT_URL: &str = "FERRODCA_SENTIMENT_URL";
pub const ENV_MAX_RETRIES: &str = "FERRODCA_MAX_RETRIES";

/// Days of history kept for trend display.
pub const DEFAULT_TREND_WINDOW_DAYS: u32 = 365;

#[derive(Debug, Clone, PartialEq)]
pub struct AdvisorConfig {
    pub cache_ttl: Duration,
    pub price_timeout_ms: u64,
    pub sentiment_timeout_ms: u64,
    pub chart_base_url: String,
    pub sentiment_url: String,
    pub max_retries: u32,
    pub trend_window_days: u32,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_CACHE_TTL,
            price_timeout_ms: 30_000,
            sentiment_timeout_ms: 10_000,
            chart_base_url: String::from(DEFAULT_CHART_BASE_URL),
            sentiment_url: String::from(DEFAULT_FEAR_GREED_URL),
            max_retries: 2,
            trend_window_days: DEFAULT_TREND_WINDOW_DAYS,
        }
    }
}

impl AdvisorConfig {
    /// Defaults overridden by `FERRODCA_*` environment variables.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each key.
    /// Blank values are ignored.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();

        if let Some(secs) = parse_var::<u64>(ENV_CACHE_TTL_SECS, lookup(ENV_CACHE_TTL_SECS))? {
            config.cache_ttl = Duration::from_secs(secs);
        }
        if let Some(ms) = parse_var::<u64>(ENV_PRICE_TIMEOUT_MS, lookup(ENV_PRICE_TIMEOUT_MS))? {
            config.price_timeout_ms = positive(ENV_PRICE_TIMEOUT_MS, ms)?;
        }
        if let Some(ms) =
            parse_var::<u64>(ENV_SENTIMENT_TIMEOUT_MS, lookup(ENV_SENTIMENT_TIMEOUT_MS))?
        {
            config.sentiment_timeout_ms = positive(ENV_SENTIMENT_TIMEOUT_MS, ms)?;
        }
        if let Some(url) = lookup(ENV_CHART_URL) {
            config.chart_base_url = http_url(ENV_CHART_URL, url)?;
        }
        if let Some(url) = lookup(ENV_SENTIMENT_URL) {
            config.sentiment_url = http_url(ENV_SENTIMENT_URL, url)?;
        }
        if let Some(retries) = parse_var::<u32>(ENV_MAX_RETRIES, lookup(ENV_MAX_RETRIES))? {
            config.max_retries = retries;
        }

        Ok(config)
    }

    pub fn retry(&self) -> RetryConfig {
        RetryConfig::exponential(self.max_retries)
    }
}

fn parse_var<T: FromStr>(key: &'static str, raw: Option<String>) -> Result<Option<T>, ValidationError> {
    raw.map(|value| {
        value
            .parse::<T>()
            .map_err(|_| ValidationError::InvalidConfig { key, value })
    })
    .transpose()
}

fn positive(key: &'static str, value: u64) -> Result<u64, ValidationError> {
    if value == 0 {
        return Err(ValidationError::InvalidConfig {
            key,
            value: value.to_string(),
        });
    }
    Ok(value)
}

fn http_url(key: &'static str, value: String) -> Result<String, ValidationError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(value)
    } else {
        Err(ValidationError::InvalidConfig { key, value })
    }
}
