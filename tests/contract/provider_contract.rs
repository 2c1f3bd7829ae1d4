//! Contract tests for the upstream adapters.
//!
//! Every adapter is driven through its source trait over a scripted
//! transport, so these tests pin the wire-level behavior: the request that
//! goes out and the classification of what comes back.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ferrodca_core::{
    CnnFearGreedAdapter, HttpClient, HttpError, HttpRequest, HttpResponse, MarketIndex,
    PriceHistorySource, RetryConfig, SentimentLabel, SentimentSource, SourceErrorKind,
    YahooChartAdapter,
};

const CHART_BODY: &str = r#"{
    "chart": {
        "result": [{
            "meta": {"symbol": "^IXIC", "gmtoffset": -18000},
            "timestamp": [1704205800, 1704292200],
            "indicators": {"quote": [{
                "open":  [14873.70, 14641.47],
                "high":  [14887.72, 14665.73],
                "low":   [14682.00, 14565.85],
                "close": [14765.94, 14592.21],
                "volume": [5976890000, 5430790000]
            }]}
        }],
        "error": null
    }
}"#;

struct ScriptedHttpClient {
    response: Result<HttpResponse, HttpError>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    fn new(response: Result<HttpResponse, HttpError>) -> Arc<Self> {
        Arc::new(Self {
            response,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("request log").clone()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.requests.lock().expect("request log").push(request);
        let response = self.response.clone();
        Box::pin(async move { response })
    }
}

fn quick_retry() -> RetryConfig {
    RetryConfig::fixed(Duration::from_millis(1), 1)
}

// =============================================================================
// Price history source
// =============================================================================

#[tokio::test]
async fn price_source_requests_full_daily_history_for_every_index() {
    for index in MarketIndex::ALL {
        // Given: a transport that always answers with a valid chart
        let client = ScriptedHttpClient::new(Ok(HttpResponse::ok_json(CHART_BODY)));
        let adapter = YahooChartAdapter::new(client.clone());

        // When: the history for the index is fetched
        let series = adapter
            .fetch_history(&index.symbol())
            .await
            .unwrap_or_else(|error| panic!("{index}: {error}"));

        // Then: one request for the whole range went out, dates ascend
        let requests = client.requests();
        assert_eq!(requests.len(), 1, "{index}");
        assert!(requests[0].url.contains("range=max"), "{index}");
        assert!(requests[0].url.contains("interval=1d"), "{index}");
        assert!(requests[0].timeout_ms > 0, "{index}");
        assert_eq!(series.symbol(), &index.symbol());
        assert!(series
            .bars()
            .windows(2)
            .all(|pair| pair[0].date < pair[1].date));
    }
}

#[tokio::test]
async fn price_source_classifies_failures() {
    let cases = [
        (Ok(HttpResponse::with_status(429, "")), SourceErrorKind::RateLimited),
        (Ok(HttpResponse::with_status(404, "")), SourceErrorKind::NoData),
        (Ok(HttpResponse::with_status(502, "")), SourceErrorKind::Unavailable),
        (Ok(HttpResponse::ok_json("not json")), SourceErrorKind::InvalidResponse),
        (Err(HttpError::new("timed out")), SourceErrorKind::Unavailable),
    ];

    for (response, expected) in cases {
        let adapter = YahooChartAdapter::new(ScriptedHttpClient::new(response))
            .with_retry(quick_retry());

        let error = adapter
            .fetch_history(&MarketIndex::Sp500.symbol())
            .await
            .expect_err("must fail");
        assert_eq!(error.kind(), expected, "{error}");
    }
}

// =============================================================================
// Sentiment source
// =============================================================================

#[tokio::test]
async fn sentiment_source_sends_browser_like_headers() {
    // Given: an upstream that rejects nothing
    let client = ScriptedHttpClient::new(Ok(HttpResponse::ok_json(
        r#"{"fear_and_greed":{"score":71.4,"rating":"greed"}}"#,
    )));
    let adapter = CnnFearGreedAdapter::new(client.clone());

    // When: the current reading is fetched
    let reading = adapter.fetch_current().await.expect("reading");

    // Then: the score is truncated and the request looks like a browser's
    assert_eq!(reading.score(), Some(71));
    assert_eq!(reading.label(), Some(&SentimentLabel::Greed));

    let request = &client.requests()[0];
    for header in ["user-agent", "referer", "accept-language"] {
        assert!(request.headers.contains_key(header), "missing {header}");
    }
    assert_eq!(request.timeout_ms, 10_000);
}

#[tokio::test]
async fn sentiment_source_separates_transport_from_payload_failures() {
    let cases = [
        (Err(HttpError::new("connection reset")), SourceErrorKind::Unavailable),
        (Ok(HttpResponse::with_status(503, "")), SourceErrorKind::Unavailable),
        (Ok(HttpResponse::with_status(418, "")), SourceErrorKind::Unavailable),
        (Ok(HttpResponse::ok_json(r#"{"fear_and_greed":{}}"#)), SourceErrorKind::InvalidResponse),
        (
            Ok(HttpResponse::ok_json(r#"{"fear_and_greed":{"score":-3,"rating":"fear"}}"#)),
            SourceErrorKind::InvalidResponse,
        ),
    ];

    for (response, expected) in cases {
        let adapter =
            CnnFearGreedAdapter::new(ScriptedHttpClient::new(response)).with_retry(quick_retry());

        let error = adapter.fetch_current().await.expect_err("must fail");
        assert_eq!(error.kind(), expected, "{error}");
    }
}
