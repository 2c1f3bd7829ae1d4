//! # Domain Models
//!
//! Canonical domain types for ferrodca.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated ticker, index tickers included (`^GSPC`) |
//! | [`MarketIndex`] | The fixed set of indices the advisor evaluates |
//! | [`TradingDate`] | Calendar date of a daily record |
//! | [`PriceBar`] | Daily OHLCV record |
//! | [`PriceSeries`] | Date-ordered daily history for one symbol |
//! | [`SentimentReading`] | Fear & Greed score and label, or its absence |
//!
//! All types validate their invariants at construction time:
//!
//! ```rust,ignore
//! use ferrodca_core::{PriceBar, TradingDate, ValidationError};
//!
//! let date = TradingDate::parse("2024-01-02")?;
//! let bar = PriceBar::new(date, 100.0, 105.0, 95.0, 102.0, Some(1000))?;
//!
//! // high < low
//! let invalid = PriceBar::new(date, 100.0, 95.0, 105.0, 102.0, Some(1000));
//! assert!(matches!(invalid, Err(ValidationError::InvalidBarRange)));
//! ```

mod index;
mod models;
mod sentiment;
mod symbol;
mod trading_date;

pub use index::MarketIndex;
pub use models::{PriceBar, PriceSeries};
pub use sentiment::{SentimentLabel, SentimentReading, UnavailableReason, EXTREME_FEAR_CEILING};
pub use symbol::Symbol;
pub use trading_date::TradingDate;
