use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::{Date, Duration, Month, OffsetDateTime};

use crate::ValidationError;

/// Calendar date of a daily price record, rendered as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TradingDate(Date);

impl TradingDate {
    pub fn from_calendar(year: i32, month: u8, day: u8) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidDate {
            value: format!("{year:04}-{month:02}-{day:02}"),
        };
        let month = Month::try_from(month).map_err(|_| invalid())?;
        Date::from_calendar_date(year, month, day)
            .map(Self)
            .map_err(|_| invalid())
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidDate {
            value: input.to_owned(),
        };

        let mut parts = input.trim().splitn(3, '-');
        let (Some(year), Some(month), Some(day)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        if year.len() != 4 || month.len() != 2 || day.len() != 2 {
            return Err(invalid());
        }

        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u8>().map_err(|_| invalid())?;
        let day = day.parse::<u8>().map_err(|_| invalid())?;
        Self::from_calendar(year, month, day).map_err(|_| invalid())
    }

    /// Exchange-local date of a unix timestamp, given the exchange's offset
    /// from UTC in seconds.
    pub fn from_unix_timestamp(timestamp: i64, gmt_offset_secs: i64) -> Result<Self, ValidationError> {
        let shifted = timestamp.saturating_add(gmt_offset_secs);
        OffsetDateTime::from_unix_timestamp(shifted)
            .map(|value| Self(value.date()))
            .map_err(|_| ValidationError::InvalidDate {
                value: format!("unix:{timestamp}"),
            })
    }

    /// The date `days` calendar days earlier, saturating at the minimum
    /// representable date.
    pub fn days_before(self, days: u32) -> Self {
        self.0
            .checked_sub(Duration::days(i64::from(days)))
            .map(Self)
            .unwrap_or(Self(Date::MIN))
    }

    pub fn into_inner(self) -> Date {
        self.0
    }
}

impl Display for TradingDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day()
        )
    }
}

impl Serialize for TradingDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TradingDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_formats_iso_date() {
        let date = TradingDate::parse("2024-02-29").expect("leap day");
        assert_eq!(date.to_string(), "2024-02-29");
    }

    #[test]
    fn rejects_impossible_dates() {
        assert!(matches!(
            TradingDate::parse("2023-02-29"),
            Err(ValidationError::InvalidDate { .. })
        ));
        assert!(TradingDate::parse("2023-2-01").is_err());
        assert!(TradingDate::parse("yesterday").is_err());
    }

    #[test]
    fn unix_timestamp_uses_exchange_offset() {
        // 2024-01-02T03:00:00Z is still Jan 1st in New York (UTC-5).
        let date = TradingDate::from_unix_timestamp(1_704_164_400, -18_000).expect("valid");
        assert_eq!(date.to_string(), "2024-01-01");
    }

    #[test]
    fn days_before_crosses_year_boundary() {
        let date = TradingDate::parse("2024-01-10").expect("valid");
        assert_eq!(date.days_before(365).to_string(), "2023-01-10");
    }
}
