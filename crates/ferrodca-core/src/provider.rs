//! Cached providers in front of the upstream sources.
//!
//! Providers never return errors. A failed price fetch yields an empty
//! [`PriceSeries`]; a failed sentiment fetch yields
//! [`SentimentReading::Unavailable`]. Only successful results are cached,
//! so the next call after an outage goes upstream again.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::CacheStore;
use crate::data_source::{PriceHistorySource, SentimentSource, SourceErrorKind};
use crate::{PriceSeries, SentimentReading, Symbol, UnavailableReason};

/// Default time-to-live for cached upstream results.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

const SENTIMENT_CACHE_KEY: &str = "sentiment:fear_greed";

/// Full daily price history, memoized per symbol.
#[derive(Clone)]
pub struct PriceHistoryProvider {
    source: Arc<dyn PriceHistorySource>,
    cache: CacheStore<PriceSeries>,
    ttl: Duration,
}

impl PriceHistoryProvider {
    pub fn new(source: Arc<dyn PriceHistorySource>) -> Self {
        Self::with_cache(source, CacheStore::new(), DEFAULT_CACHE_TTL)
    }

    pub fn with_cache(
        source: Arc<dyn PriceHistorySource>,
        cache: CacheStore<PriceSeries>,
        ttl: Duration,
    ) -> Self {
        Self { source, cache, ttl }
    }

    fn cache_key(symbol: &Symbol) -> String {
        format!("price_history:{symbol}")
    }

    /// Daily history for `symbol`, empty when the upstream is unreachable
    /// or has no data.
    pub async fn fetch_price_history(&self, symbol: &Symbol) -> PriceSeries {
        let key = Self::cache_key(symbol);
        let result = self
            .cache
            .get_or_try_fetch(&key, self.ttl, || async {
                tracing::info!(%symbol, upstream = self.source.name(), "fetching price history");
                self.source.fetch_history(symbol).await
            })
            .await;

        match result {
            Ok(series) => series,
            Err(error) => {
                tracing::warn!(
                    %symbol,
                    upstream = self.source.name(),
                    code = error.code(),
                    %error,
                    "price history unavailable"
                );
                PriceSeries::empty(symbol.clone())
            }
        }
    }

    /// Evict every cached series.
    pub async fn clear(&self) {
        self.cache.clear().await;
    }
}

/// Current Fear & Greed reading, memoized.
#[derive(Clone)]
pub struct SentimentProvider {
    source: Arc<dyn SentimentSource>,
    cache: CacheStore<SentimentReading>,
    ttl: Duration,
}

impl SentimentProvider {
    pub fn new(source: Arc<dyn SentimentSource>) -> Self {
        Self::with_cache(source, CacheStore::new(), DEFAULT_CACHE_TTL)
    }

    pub fn with_cache(
        source: Arc<dyn SentimentSource>,
        cache: CacheStore<SentimentReading>,
        ttl: Duration,
    ) -> Self {
        Self { source, cache, ttl }
    }

    /// Current reading, or [`SentimentReading::Unavailable`] on any
    /// failure.
    pub async fn fetch_sentiment(&self) -> SentimentReading {
        let result = self
            .cache
            .get_or_try_fetch(SENTIMENT_CACHE_KEY, self.ttl, || async {
                tracing::info!(upstream = self.source.name(), "fetching sentiment");
                self.source.fetch_current().await
            })
            .await;

        match result {
            Ok(reading) => reading,
            Err(error) => {
                let reason = match error.kind() {
                    SourceErrorKind::InvalidResponse | SourceErrorKind::NoData => {
                        UnavailableReason::Malformed
                    }
                    SourceErrorKind::Unavailable
                    | SourceErrorKind::RateLimited
                    | SourceErrorKind::InvalidRequest => UnavailableReason::FetchFailed,
                };
                tracing::warn!(
                    upstream = self.source.name(),
                    code = error.code(),
                    %error,
                    "sentiment unavailable"
                );
                SentimentReading::unavailable(reason)
            }
        }
    }

    /// Evict the cached reading.
    pub async fn clear(&self) {
        self.cache.clear().await;
    }
}
