//! Derived price metrics.

use serde::Serialize;
use thiserror::Error;

use crate::{PriceSeries, TradingDate};

/// Precondition violations when computing [`Metrics`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MetricsError {
    #[error("cannot compute metrics for an empty series")]
    EmptySeries,
    #[error("all-time high must be positive")]
    NonPositiveHigh,
}

/// Drawdown and day-over-day figures for the latest record of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    pub as_of: TradingDate,
    pub all_time_high: f64,
    pub current_price: f64,
    /// Close of the record before the latest one. Absent for a
    /// single-record series.
    pub previous_close: Option<f64>,
    /// `(all_time_high - current_price) / all_time_high * 100`, never
    /// negative.
    pub drawdown_pct: f64,
}

impl Metrics {
    /// Compute metrics over the whole series.
    ///
    /// # Errors
    ///
    /// [`MetricsError::EmptySeries`] when the series has no records, and
    /// [`MetricsError::NonPositiveHigh`] when every high is zero.
    pub fn compute(series: &PriceSeries) -> Result<Self, MetricsError> {
        let bars = series.bars();
        let latest = bars.last().ok_or(MetricsError::EmptySeries)?;

        let all_time_high = bars
            .iter()
            .map(|bar| bar.high)
            .fold(f64::NEG_INFINITY, f64::max);
        if all_time_high <= 0.0 {
            return Err(MetricsError::NonPositiveHigh);
        }

        let current_price = latest.close;
        let previous_close = bars
            .len()
            .checked_sub(2)
            .and_then(|index| bars.get(index))
            .map(|bar| bar.close);

        // close <= high on every record, so the maximum high bounds the
        // latest close; the clamp absorbs float rounding only.
        let drawdown_pct = ((all_time_high - current_price) / all_time_high * 100.0).max(0.0);

        Ok(Self {
            as_of: latest.date,
            all_time_high,
            current_price,
            previous_close,
            drawdown_pct,
        })
    }

    /// Absolute change from the previous close.
    pub fn day_change(&self) -> Option<f64> {
        self.previous_close
            .map(|previous| self.current_price - previous)
    }

    /// Relative change from the previous close, in percent.
    pub fn day_change_pct(&self) -> Option<f64> {
        self.previous_close
            .filter(|previous| *previous > 0.0)
            .map(|previous| (self.current_price - previous) / previous * 100.0)
    }
}
