use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crate::data_source::{PriceHistorySource, SourceError};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::retry::RetryConfig;
use crate::{PriceBar, PriceSeries, Symbol, TradingDate};

pub const DEFAULT_CHART_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const YAHOO_REFERER: &str = "https://finance.yahoo.com/";

/// Daily price history from the Yahoo Finance chart API.
#[derive(Clone)]
pub struct YahooChartAdapter {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
    retry: RetryConfig,
}

impl Default for YahooChartAdapter {
    fn default() -> Self {
        Self::new(Arc::new(ReqwestHttpClient::default()))
    }
}

impl YahooChartAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: String::from(DEFAULT_CHART_BASE_URL),
            timeout_ms: 30_000,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
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

    /// Chart endpoint for the full daily history of `symbol`.
    pub fn history_url(&self, symbol: &Symbol) -> String {
        format!(
            "{}/{}?range=max&interval=1d",
            self.base_url,
            urlencoding::encode(symbol.as_str())
        )
    }

    async fn fetch_once(&self, symbol: &Symbol) -> Result<PriceSeries, SourceError> {
        let request = HttpRequest::get(self.history_url(symbol))
            .with_browser_headers(YAHOO_REFERER)
            .with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|error| {
            let message = format!("yahoo transport error: {}", error.message());
            if error.retryable() {
                SourceError::unavailable(message)
            } else {
                SourceError::unavailable_permanent(message)
            }
        })?;

        if !response.is_success() {
            let message = format!("yahoo returned status {} for {symbol}", response.status);
            return Err(match response.status {
                429 => SourceError::rate_limited(message),
                400 => SourceError::invalid_request(message),
                404 => SourceError::no_data(message),
                status if self.retry.should_retry_status(status) => {
                    SourceError::unavailable(message)
                }
                _ => SourceError::unavailable_permanent(message),
            });
        }

        parse_chart(symbol, &response.body)
    }
}

impl PriceHistorySource for YahooChartAdapter {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    fn fetch_history<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            self.retry
                .run(self.name(), || self.fetch_once(symbol))
                .await
        })
    }
}

/// Normalize a chart response body into a [`PriceSeries`].
///
/// Rows with a missing or non-finite OHLC value are skipped. Rows whose open
/// or close falls outside the reported high/low are kept, with the range
/// widened to cover them.
pub fn parse_chart(symbol: &Symbol, body: &str) -> Result<PriceSeries, SourceError> {
    let chart_response: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::invalid_response(format!("failed to parse yahoo chart: {e}")))?;

    if let Some(error) = chart_response.chart.error {
        return Err(SourceError::no_data(format!(
            "yahoo chart API error for {symbol}: {}",
            error.describe()
        )));
    }

    let result = chart_response
        .chart
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::no_data(format!("no chart data for {symbol}")))?;

    let timestamps = result
        .timestamp
        .ok_or_else(|| SourceError::no_data(format!("no timestamps for {symbol}")))?;
    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::invalid_response("chart response has no quote block"))?;
    let gmt_offset = result.meta.and_then(|meta| meta.gmtoffset).unwrap_or(0);

    let mut bars = Vec::with_capacity(timestamps.len());
    let mut skipped = 0usize;
    for (i, &timestamp) in timestamps.iter().enumerate() {
        let row = (
            quote.open.get(i).copied().flatten(),
            quote.high.get(i).copied().flatten(),
            quote.low.get(i).copied().flatten(),
            quote.close.get(i).copied().flatten(),
        );
        let (Some(open), Some(high), Some(low), Some(close)) = row else {
            skipped += 1;
            continue;
        };

        let volume = quote
            .volume
            .get(i)
            .copied()
            .flatten()
            .and_then(|v| u64::try_from(v).ok());

        let bar = TradingDate::from_unix_timestamp(timestamp, gmt_offset)
            .and_then(|date| PriceBar::reconciled(date, open, high, low, close, volume));
        match bar {
            Ok(bar) => bars.push(bar),
            Err(_) => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::debug!(%symbol, skipped, "skipped incomplete chart rows");
    }

    if bars.is_empty() {
        return Err(SourceError::no_data(format!(
            "yahoo chart for {symbol} contained no usable rows"
        )));
    }

    Ok(PriceSeries::new(symbol.clone(), bars))
}

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooChartError>,
}

#[derive(Debug, Deserialize)]
struct YahooChartError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl YahooChartError {
    fn describe(&self) -> String {
        match (&self.code, &self.description) {
            (Some(code), Some(description)) => format!("{code}: {description}"),
            (Some(text), None) | (None, Some(text)) => text.clone(),
            (None, None) => String::from("unknown error"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    meta: Option<YahooChartMeta>,
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: YahooChartIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooChartMeta {
    #[serde(default)]
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::SourceErrorKind;
    use crate::http_client::{HttpError, HttpResponse};
    use std::sync::Mutex;
    use std::time::Duration;

    const CHART_BODY: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"symbol": "^GSPC", "gmtoffset": -18000},
                "timestamp": [1704292200, 1704205800, 1704378600, 1704465000],
                "indicators": {"quote": [{
                    "open":   [4725.07, 4745.20, 4697.42, null],
                    "high":   [4729.29, 4754.33, 4726.78, 4721.49],
                    "low":    [4699.71, 4722.67, 4687.53, 4682.11],
                    "close":  [4704.81, 4742.83, 4688.68, 4697.24],
                    "volume": [3950760000, 3743050000, 3715480000, null]
                }]}
            }],
            "error": null
        }
    }"#;

    #[derive(Debug)]
    struct RecordingHttpClient {
        responses: Mutex<Vec<Result<HttpResponse, HttpError>>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl RecordingHttpClient {
        fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn recorded_requests(&self) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .clone()
        }
    }

    impl HttpClient for RecordingHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let mut responses = self
                .responses
                .lock()
                .expect("response queue should not be poisoned");
            let response = if responses.len() > 1 {
                responses.remove(0)
            } else {
                responses[0].clone()
            };
            Box::pin(async move { response })
        }
    }

    fn gspc() -> Symbol {
        Symbol::parse("^GSPC").expect("valid symbol")
    }

    #[test]
    fn parses_chart_into_sorted_series_and_skips_incomplete_rows() {
        let series = parse_chart(&gspc(), CHART_BODY).expect("chart should parse");

        let dates: Vec<String> = series.bars().iter().map(|bar| bar.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-01-02", "2024-01-03", "2024-01-04"]);
        assert_eq!(series.last().map(|bar| bar.close), Some(4688.68));
        assert_eq!(series.first().and_then(|bar| bar.volume), Some(3_743_050_000));
    }

    #[test]
    fn keeps_latest_session_when_open_overshoots_high() {
        let body = r#"{
            "chart": {
                "result": [{
                    "meta": {"gmtoffset": -18000},
                    "timestamp": [1704205800, 1704292200, 1704378600],
                    "indicators": {"quote": [{
                        "open":   [99.0, 89.0, 85.00000001],
                        "high":   [100.0, 90.0, 85.0],
                        "low":    [98.0, 88.0, 81.5],
                        "close":  [99.0, 90.0, 82.0],
                        "volume": [1000, 1000, 1000]
                    }]}
                }],
                "error": null
            }
        }"#;

        let series = parse_chart(&gspc(), body).expect("chart should parse");
        assert_eq!(series.len(), 3);

        let latest = series.last().expect("latest session");
        assert_eq!(latest.date.to_string(), "2024-01-04");
        assert_eq!(latest.close, 82.0);
        assert_eq!(latest.high, 85.000_000_01);

        let metrics = crate::Metrics::compute(&series).expect("metrics");
        assert_eq!(metrics.current_price, 82.0);
        assert_eq!(metrics.previous_close, Some(90.0));
    }

    #[test]
    fn chart_error_object_maps_to_no_data() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let error = parse_chart(&gspc(), body).expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::NoData);
        assert!(error.message().contains("symbol may be delisted"));
    }

    #[test]
    fn malformed_body_maps_to_invalid_response() {
        let error = parse_chart(&gspc(), "<html>blocked</html>").expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::InvalidResponse);
        assert!(!error.retryable());
    }

    #[tokio::test]
    async fn requests_full_daily_range_with_encoded_symbol_and_timeout() {
        let client = Arc::new(RecordingHttpClient::new(vec![Ok(HttpResponse::ok_json(
            CHART_BODY,
        ))]));
        let adapter = YahooChartAdapter::new(client.clone())
            .with_base_url("https://chart.example.test/v8/finance/chart/")
            .with_timeout_ms(5_000);

        let series = adapter.fetch_history(&gspc()).await.expect("history");
        assert_eq!(series.len(), 3);

        let requests = client.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].url,
            "https://chart.example.test/v8/finance/chart/%5EGSPC?range=max&interval=1d"
        );
        assert_eq!(requests[0].timeout_ms, 5_000);
        assert!(requests[0].headers.contains_key("user-agent"));
    }

    #[tokio::test]
    async fn retries_transient_status_then_succeeds() {
        let client = Arc::new(RecordingHttpClient::new(vec![
            Ok(HttpResponse::with_status(503, "")),
            Ok(HttpResponse::ok_json(CHART_BODY)),
        ]));
        let adapter = YahooChartAdapter::new(client.clone())
            .with_retry(RetryConfig::fixed(Duration::from_millis(1), 2));

        let series = adapter.fetch_history(&gspc()).await.expect("history");
        assert_eq!(series.len(), 3);
        assert_eq!(client.recorded_requests().len(), 2);
    }

    #[tokio::test]
    async fn not_found_is_not_retried() {
        let client = Arc::new(RecordingHttpClient::new(vec![Ok(HttpResponse::with_status(
            404, "",
        ))]));
        let adapter = YahooChartAdapter::new(client.clone())
            .with_retry(RetryConfig::fixed(Duration::from_millis(1), 3));

        let error = adapter.fetch_history(&gspc()).await.expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::NoData);
        assert_eq!(client.recorded_requests().len(), 1);
    }

    #[tokio::test]
    async fn transport_timeout_is_reported_as_unavailable() {
        let client = Arc::new(RecordingHttpClient::new(vec![Err(HttpError::new(
            "request timeout",
        ))]));
        let adapter = YahooChartAdapter::new(client.clone()).with_retry(RetryConfig::no_retry());

        let error = adapter.fetch_history(&gspc()).await.expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::Unavailable);
        assert!(error.message().contains("request timeout"));
    }
}
