use std::fmt::{Display, Formatter};

use serde::{Serialize, Serializer};

use crate::ValidationError;

/// Highest score still counted as extreme fear.
pub const EXTREME_FEAR_CEILING: u8 = 25;

/// Five-bucket market mood vocabulary used by the Fear & Greed index.
///
/// Labels the upstream invents later are kept verbatim in
/// [`SentimentLabel::Unrecognized`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SentimentLabel {
    ExtremeFear,
    Fear,
    Neutral,
    Greed,
    ExtremeGreed,
    Unrecognized(String),
}

impl SentimentLabel {
    /// Map an upstream rating onto the fixed vocabulary, ignoring case and
    /// surrounding whitespace.
    pub fn from_rating(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "extreme fear" => Self::ExtremeFear,
            "fear" => Self::Fear,
            "neutral" => Self::Neutral,
            "greed" => Self::Greed,
            "extreme greed" => Self::ExtremeGreed,
            _ => Self::Unrecognized(raw.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::ExtremeFear => "Extreme Fear",
            Self::Fear => "Fear",
            Self::Neutral => "Neutral",
            Self::Greed => "Greed",
            Self::ExtremeGreed => "Extreme Greed",
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl Display for SentimentLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SentimentLabel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Why no sentiment reading could be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    /// Network failure, timeout or non-2xx response.
    FetchFailed,
    /// The upstream answered but the payload could not be interpreted.
    Malformed,
}

impl UnavailableReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FetchFailed => "fetch failed",
            Self::Malformed => "processing failed",
        }
    }
}

/// Current market sentiment, or the explicit absence of one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SentimentReading {
    Available { score: u8, label: SentimentLabel },
    Unavailable { reason: UnavailableReason },
}

impl SentimentReading {
    pub fn available(score: i64, label: SentimentLabel) -> Result<Self, ValidationError> {
        let score = u8::try_from(score)
            .ok()
            .filter(|score| *score <= 100)
            .ok_or(ValidationError::ScoreOutOfRange { value: score })?;
        Ok(Self::Available { score, label })
    }

    pub const fn unavailable(reason: UnavailableReason) -> Self {
        Self::Unavailable { reason }
    }

    pub fn score(&self) -> Option<u8> {
        match self {
            Self::Available { score, .. } => Some(*score),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn label(&self) -> Option<&SentimentLabel> {
        match self {
            Self::Available { label, .. } => Some(label),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }

    /// True only for an available score at or below
    /// [`EXTREME_FEAR_CEILING`]. An unavailable reading is never extreme fear.
    pub fn is_extreme_fear(&self) -> bool {
        self.score()
            .is_some_and(|score| score <= EXTREME_FEAR_CEILING)
    }
}

impl Display for SentimentReading {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available { score, label } => write!(f, "{label} ({score})"),
            Self::Unavailable { reason } => write!(f, "unavailable ({})", reason.as_str()),
        }
    }
}
