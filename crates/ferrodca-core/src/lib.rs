//! # Ferrodca Core
//!
//! Drawdown and sentiment signals for dollar-cost-averaging into a market
//! index.
//!
//! ## Overview
//!
//! This crate answers one question: should today's periodic purchase go
//! ahead? It combines two signals:
//!
//! - **Drawdown** of the index from its all-time high, computed from the
//!   full daily price history
//! - **Sentiment** from the CNN Fear & Greed index
//!
//! and applies a fixed rule set to produce a BUY or HOLD recommendation.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Upstream adapters (Yahoo chart API, CNN Fear & Greed) |
//! | [`advisor`] | One evaluation: fetch, compute, decide |
//! | [`cache`] | Keyed cache with per-entry time-to-live |
//! | [`config`] | Advisor configuration and environment overrides |
//! | [`data_source`] | Source traits and structured source errors |
//! | [`decision`] | Buy/hold rules |
//! | [`domain`] | Domain models (Symbol, PriceSeries, SentimentReading) |
//! | [`error`] | Validation errors |
//! | [`http_client`] | HTTP client abstraction |
//! | [`metrics`] | All-time high, drawdown and day-over-day change |
//! | [`provider`] | Cached providers that never fail |
//! | [`retry`] | Retry policy with exponential backoff |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ferrodca_core::{Advisor, AdvisorConfig, MarketIndex};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let advisor = Advisor::new(&AdvisorConfig::from_env()?);
//!     let assessment = advisor.evaluate_index(MarketIndex::Sp500, 10.0).await?;
//!
//!     println!("{}", assessment.recommendation.action);
//!     for reason in assessment.recommendation.messages() {
//!         println!("  - {reason}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / User     │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │    Advisor      │────▶│ Decision Engine  │
//! └────────┬────────┘     └──────────────────┘
//!          │                       ▲
//!          ▼                       │
//! ┌─────────────────┐     ┌──────────────────┐
//! │   Providers     │────▶│ Metrics          │
//! │ (CacheStore)    │     └──────────────────┘
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Source Adapters │────▶│ HTTP Client      │
//! │ (RetryConfig)   │     │ (reqwest)        │
//! └─────────────────┘     └──────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! A missing price history is fatal for an evaluation and surfaces as
//! [`AdvisorError::DataUnavailable`]. A missing sentiment reading is not:
//! it becomes [`SentimentReading::Unavailable`] and the decision proceeds
//! on drawdown alone.
//!
//! ```rust
//! use ferrodca_core::{SourceError, SourceErrorKind};
//!
//! fn describe(error: &SourceError) -> &'static str {
//!     match error.kind() {
//!         SourceErrorKind::RateLimited => "slow down",
//!         SourceErrorKind::InvalidResponse => "upstream changed its payload",
//!         _ => "upstream unavailable",
//!     }
//! }
//!
//! assert_eq!(describe(&SourceError::rate_limited("429")), "slow down");
//! ```

pub mod adapters;
pub mod advisor;
pub mod cache;
pub mod config;
pub mod data_source;
pub mod decision;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod metrics;
pub mod provider;
pub mod retry;

// Adapter implementations
pub use adapters::{CnnFearGreedAdapter, YahooChartAdapter};

// Orchestration
pub use advisor::{Advisor, AdvisorError, Assessment};

// Caching
pub use cache::CacheStore;

// Configuration
pub use config::AdvisorConfig;

// Source traits and errors
pub use data_source::{PriceHistorySource, SentimentSource, SourceError, SourceErrorKind};

// Decision engine
pub use decision::{decide, Action, Reason, Recommendation};

// Domain models
pub use domain::{
    MarketIndex, PriceBar, PriceSeries, SentimentLabel, SentimentReading, Symbol, TradingDate,
    UnavailableReason, EXTREME_FEAR_CEILING,
};

// Error types
pub use error::ValidationError;

// HTTP client types
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};

// Metrics
pub use metrics::{Metrics, MetricsError};

// Providers
pub use provider::{PriceHistoryProvider, SentimentProvider, DEFAULT_CACHE_TTL};

// Retry logic
pub use retry::{Backoff, RetryConfig};
