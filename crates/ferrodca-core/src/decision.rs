//! Buy/hold rules over drawdown and sentiment.
//!
//! Rule order, first match wins:
//!
//! 1. Drawdown at or above the threshold: BUY. Extreme fear, when present,
//!    is appended as a corroborating reason.
//! 2. Extreme fear on its own: BUY.
//! 3. Otherwise HOLD, with the current sentiment attached for context.
//!
//! An unavailable sentiment reading never produces a BUY by itself.

use std::fmt::{Display, Formatter};

use serde::{Serialize, Serializer};

use crate::metrics::Metrics;
use crate::{SentimentLabel, SentimentReading, UnavailableReason, EXTREME_FEAR_CEILING};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Hold,
}

impl Action {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Hold => "HOLD",
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One justification for a [`Recommendation`].
#[derive(Debug, Clone, PartialEq)]
pub enum Reason {
    DrawdownThresholdMet { drawdown_pct: f64, threshold_pct: f64 },
    ExtremeFearCorroborates { score: u8 },
    ExtremeFearSignal { score: u8 },
    DrawdownBelowThreshold { drawdown_pct: f64, threshold_pct: f64 },
    SentimentContext { label: SentimentLabel },
    SentimentUnavailable { reason: UnavailableReason },
}

impl Display for Reason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DrawdownThresholdMet {
                drawdown_pct,
                threshold_pct,
            } => write!(
                f,
                "drawdown threshold met: {drawdown_pct:.2}% from all-time high >= {threshold_pct:.2}%"
            ),
            Self::ExtremeFearCorroborates { score } => write!(
                f,
                "extreme fear corroborates: sentiment score {score} <= {EXTREME_FEAR_CEILING}"
            ),
            Self::ExtremeFearSignal { score } => write!(
                f,
                "extreme fear signal: sentiment score {score} <= {EXTREME_FEAR_CEILING}"
            ),
            Self::DrawdownBelowThreshold {
                drawdown_pct,
                threshold_pct,
            } => write!(
                f,
                "drawdown below threshold: {drawdown_pct:.2}% from all-time high < {threshold_pct:.2}%"
            ),
            Self::SentimentContext { label } => write!(f, "current sentiment: {label}"),
            Self::SentimentUnavailable { reason } => {
                write!(f, "current sentiment: unavailable ({})", reason.as_str())
            }
        }
    }
}

impl Serialize for Reason {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Buy/hold outcome with its ordered justifications.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub action: Action,
    pub reasons: Vec<Reason>,
}

impl Recommendation {
    pub fn is_buy(&self) -> bool {
        self.action == Action::Buy
    }

    /// Human-readable reasons, in order.
    pub fn messages(&self) -> Vec<String> {
        self.reasons.iter().map(ToString::to_string).collect()
    }
}

/// Apply the buy/hold rules. Pure; the same inputs always give the same
/// recommendation.
pub fn decide(metrics: &Metrics, sentiment: &SentimentReading, threshold_pct: f64) -> Recommendation {
    let drawdown_pct = metrics.drawdown_pct;
    let extreme_fear_score = sentiment
        .score()
        .filter(|score| *score <= EXTREME_FEAR_CEILING);

    if drawdown_pct >= threshold_pct {
        let mut reasons = vec![Reason::DrawdownThresholdMet {
            drawdown_pct,
            threshold_pct,
        }];
        if let Some(score) = extreme_fear_score {
            reasons.push(Reason::ExtremeFearCorroborates { score });
        }
        return Recommendation {
            action: Action::Buy,
            reasons,
        };
    }

    if let Some(score) = extreme_fear_score {
        return Recommendation {
            action: Action::Buy,
            reasons: vec![Reason::ExtremeFearSignal { score }],
        };
    }

    let context = match sentiment {
        SentimentReading::Available { label, .. } => Reason::SentimentContext {
            label: label.clone(),
        },
        SentimentReading::Unavailable { reason } => Reason::SentimentUnavailable { reason: *reason },
    };

    Recommendation {
        action: Action::Hold,
        reasons: vec![
            Reason::DrawdownBelowThreshold {
                drawdown_pct,
                threshold_pct,
            },
            context,
        ],
    }
}
