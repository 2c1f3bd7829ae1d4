use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::data_source::{SentimentSource, SourceError};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::retry::RetryConfig;
use crate::{SentimentLabel, SentimentReading};

pub const DEFAULT_FEAR_GREED_URL: &str =
    "https://production.dataviz.cnn.io/index/fearandgreed/graphdata";
const CNN_REFERER: &str = "https://www.cnn.com/";

/// CNN Fear & Greed index adapter.
#[derive(Clone)]
pub struct CnnFearGreedAdapter {
    http_client: Arc<dyn HttpClient>,
    url: String,
    timeout_ms: u64,
    retry: RetryConfig,
}

impl Default for CnnFearGreedAdapter {
    fn default() -> Self {
        Self::new(Arc::new(ReqwestHttpClient::default()))
    }
}

impl CnnFearGreedAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            url: String::from(DEFAULT_FEAR_GREED_URL),
            timeout_ms: 10_000,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    async fn fetch_once(&self) -> Result<SentimentReading, SourceError> {
        let request = HttpRequest::get(self.url.as_str())
            .with_browser_headers(CNN_REFERER)
            .with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|error| {
            let message = format!("cnn transport error: {}", error.message());
            if error.retryable() {
                SourceError::unavailable(message)
            } else {
                SourceError::unavailable_permanent(message)
            }
        })?;

        if !response.is_success() {
            let message = format!("cnn returned status {}", response.status);
            return Err(match response.status {
                429 => SourceError::rate_limited(message),
                status if self.retry.should_retry_status(status) => {
                    SourceError::unavailable(message)
                }
                _ => SourceError::unavailable_permanent(message),
            });
        }

        parse_fear_greed(&response.body)
    }
}

impl SentimentSource for CnnFearGreedAdapter {
    fn name(&self) -> &'static str {
        "cnn_fear_greed"
    }

    fn fetch_current<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<SentimentReading, SourceError>> + Send + 'a>> {
        Box::pin(async move { self.retry.run(self.name(), || self.fetch_once()).await })
    }
}

/// Interpret a Fear & Greed graph payload.
///
/// `fear_and_greed.score` may be a JSON number (truncated toward zero) or
/// a string holding an integer. `fear_and_greed.rating` is mapped onto
/// [`SentimentLabel`].
pub fn parse_fear_greed(body: &str) -> Result<SentimentReading, SourceError> {
    let payload: FearGreedPayload = serde_json::from_str(body)
        .map_err(|e| SourceError::invalid_response(format!("failed to parse fear & greed: {e}")))?;

    let score = parse_score(&payload.fear_and_greed.score)?;
    let label = SentimentLabel::from_rating(&payload.fear_and_greed.rating);

    SentimentReading::available(score, label)
        .map_err(|e| SourceError::invalid_response(e.to_string()))
}

fn parse_score(value: &Value) -> Result<i64, SourceError> {
    let invalid = || SourceError::invalid_response(format!("unusable fear & greed score: {value}"));

    match value {
        Value::Number(number) => {
            if let Some(score) = number.as_i64() {
                return Ok(score);
            }
            let score = number.as_f64().filter(|v| v.is_finite()).ok_or_else(invalid)?;
            // Saturating cast; range is checked by the caller.
            Ok(score.trunc() as i64)
        }
        Value::String(text) => text.trim().parse::<i64>().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

#[derive(Debug, Deserialize)]
struct FearGreedPayload {
    fear_and_greed: FearGreedCurrent,
}

#[derive(Debug, Deserialize)]
struct FearGreedCurrent {
    score: Value,
    rating: String,
}
