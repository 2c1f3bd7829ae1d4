//! One recommendation computation: fetch, validate, compute, decide.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;

use crate::adapters::{CnnFearGreedAdapter, YahooChartAdapter};
use crate::cache::CacheStore;
use crate::config::AdvisorConfig;
use crate::data_source::{PriceHistorySource, SentimentSource};
use crate::decision::{decide, Recommendation};
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::metrics::{Metrics, MetricsError};
use crate::provider::{PriceHistoryProvider, SentimentProvider};
use crate::{MarketIndex, PriceSeries, SentimentReading, Symbol};

/// Failures that prevent a recommendation from being produced.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AdvisorError {
    #[error("no price history available for {symbol}")]
    DataUnavailable { symbol: Symbol },
    #[error("drawdown threshold must be a finite percentage within 0..=100, got {value}")]
    InvalidThreshold { value: f64 },
    #[error(transparent)]
    Metrics(#[from] MetricsError),
}

/// Everything a caller needs to present one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub symbol: Symbol,
    pub threshold_pct: f64,
    pub metrics: Metrics,
    pub sentiment: SentimentReading,
    pub recommendation: Recommendation,
    /// Records within the trend window ending at `metrics.as_of`.
    pub trend: PriceSeries,
    #[serde(with = "time::serde::rfc3339")]
    pub evaluated_at: OffsetDateTime,
}

/// Wires providers to the metrics calculator and decision engine.
#[derive(Clone)]
pub struct Advisor {
    prices: PriceHistoryProvider,
    sentiment: SentimentProvider,
    trend_window_days: u32,
}

impl Advisor {
    /// Advisor backed by the live Yahoo and CNN endpoints.
    pub fn new(config: &AdvisorConfig) -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::default()), config)
    }

    /// Live adapters over a caller-supplied transport.
    pub fn with_http_client(http_client: Arc<dyn HttpClient>, config: &AdvisorConfig) -> Self {
        let prices = YahooChartAdapter::new(Arc::clone(&http_client))
            .with_base_url(config.chart_base_url.as_str())
            .with_timeout_ms(config.price_timeout_ms)
            .with_retry(config.retry());
        let sentiment = CnnFearGreedAdapter::new(http_client)
            .with_url(config.sentiment_url.as_str())
            .with_timeout_ms(config.sentiment_timeout_ms)
            .with_retry(config.retry());

        Self::with_sources(Arc::new(prices), Arc::new(sentiment), config)
    }

    pub fn with_sources(
        prices: Arc<dyn PriceHistorySource>,
        sentiment: Arc<dyn SentimentSource>,
        config: &AdvisorConfig,
    ) -> Self {
        Self {
            prices: PriceHistoryProvider::with_cache(prices, CacheStore::new(), config.cache_ttl),
            sentiment: SentimentProvider::with_cache(
                sentiment,
                CacheStore::new(),
                config.cache_ttl,
            ),
            trend_window_days: config.trend_window_days,
        }
    }

    /// Evaluate `symbol` against `threshold_pct`.
    ///
    /// # Errors
    ///
    /// [`AdvisorError::InvalidThreshold`] for a threshold outside 0..=100,
    /// [`AdvisorError::DataUnavailable`] when no price history could be
    /// fetched. Sentiment failures are not errors; they degrade to an
    /// unavailable reading.
    pub async fn evaluate(
        &self,
        symbol: &Symbol,
        threshold_pct: f64,
    ) -> Result<Assessment, AdvisorError> {
        if !threshold_pct.is_finite() || !(0.0..=100.0).contains(&threshold_pct) {
            return Err(AdvisorError::InvalidThreshold {
                value: threshold_pct,
            });
        }

        let series = self.prices.fetch_price_history(symbol).await;
        if series.is_empty() {
            return Err(AdvisorError::DataUnavailable {
                symbol: symbol.clone(),
            });
        }

        let sentiment = self.sentiment.fetch_sentiment().await;
        let metrics = Metrics::compute(&series)?;
        let recommendation = decide(&metrics, &sentiment, threshold_pct);

        tracing::info!(
            %symbol,
            drawdown_pct = metrics.drawdown_pct,
            threshold_pct,
            sentiment = %sentiment,
            action = %recommendation.action,
            "evaluated"
        );

        Ok(Assessment {
            symbol: symbol.clone(),
            threshold_pct,
            metrics,
            sentiment,
            recommendation,
            trend: series.trailing_window(self.trend_window_days),
            evaluated_at: OffsetDateTime::now_utc(),
        })
    }

    pub async fn evaluate_index(
        &self,
        index: MarketIndex,
        threshold_pct: f64,
    ) -> Result<Assessment, AdvisorError> {
        self.evaluate(&index.symbol(), threshold_pct).await
    }

    /// Current sentiment reading, cached like any other fetch.
    pub async fn sentiment(&self) -> SentimentReading {
        self.sentiment.fetch_sentiment().await
    }

    /// The last `days` calendar days of history for `symbol`.
    pub async fn trend(&self, symbol: &Symbol, days: u32) -> Result<PriceSeries, AdvisorError> {
        let series = self.prices.fetch_price_history(symbol).await;
        if series.is_empty() {
            return Err(AdvisorError::DataUnavailable {
                symbol: symbol.clone(),
            });
        }
        Ok(series.trailing_window(days))
    }

    /// Drop every cached price series and sentiment reading.
    pub async fn clear_cache(&self) {
        self.prices.clear().await;
        self.sentiment.clear().await;
        tracing::debug!("advisor caches cleared");
    }
}
