//! Upstream source contracts.
//!
//! | Trait | Output | Adapter |
//! |-------|--------|---------|
//! | [`PriceHistorySource`] | [`PriceSeries`] | [`YahooChartAdapter`](crate::adapters::YahooChartAdapter) |
//! | [`SentimentSource`] | [`SentimentReading`] | [`CnnFearGreedAdapter`](crate::adapters::CnnFearGreedAdapter) |
//!
//! Adapters report every failure as a [`SourceError`]. Turning those into
//! an empty series or an unavailable reading is the providers' job.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{PriceSeries, SentimentReading, Symbol};

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// Network failure, timeout or server-side error.
    Unavailable,
    RateLimited,
    InvalidRequest,
    /// The upstream answered with a payload that could not be interpreted.
    InvalidResponse,
    /// The upstream answered but holds no data for the request.
    NoData,
}

/// Structured source error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    /// A permanent upstream failure such as a 404 or a rejected request.
    pub fn unavailable_permanent(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidResponse,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn no_data(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::NoData,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::InvalidResponse => "source.invalid_response",
            SourceErrorKind::NoData => "source.no_data",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Full daily price history for a symbol.
///
/// Implementations request the maximum range the upstream offers and
/// return records in any order; [`PriceSeries::new`] sorts them.
pub trait PriceHistorySource: Send + Sync {
    /// Upstream name used in logs.
    fn name(&self) -> &'static str;

    fn fetch_history<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, SourceError>> + Send + 'a>>;
}

/// Current market sentiment score and label.
pub trait SentimentSource: Send + Sync {
    /// Upstream name used in logs.
    fn name(&self) -> &'static str;

    /// # Errors
    ///
    /// [`SourceErrorKind::InvalidResponse`] when the payload cannot be
    /// interpreted; any other kind for transport or status failures.
    fn fetch_current<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<SentimentReading, SourceError>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_kinds_are_retryable() {
        assert!(SourceError::unavailable("timeout").retryable());
        assert!(SourceError::rate_limited("429").retryable());
        assert!(!SourceError::unavailable_permanent("404").retryable());
        assert!(!SourceError::invalid_response("bad json").retryable());
        assert!(!SourceError::no_data("empty").retryable());
    }

    #[test]
    fn display_includes_code() {
        let error = SourceError::invalid_response("missing fear_and_greed");
        assert_eq!(
            error.to_string(),
            "missing fear_and_greed (source.invalid_response)"
        );
    }
}
