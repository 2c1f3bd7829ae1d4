use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Symbol, ValidationError};

/// Market indices the advisor knows how to evaluate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketIndex {
    #[default]
    Sp500,
    Nasdaq,
    DowJones,
}

impl MarketIndex {
    pub const ALL: [Self; 3] = [Self::Sp500, Self::Nasdaq, Self::DowJones];

    pub const fn ticker(self) -> &'static str {
        match self {
            Self::Sp500 => "^GSPC",
            Self::Nasdaq => "^IXIC",
            Self::DowJones => "^DJI",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Sp500 => "S&P 500",
            Self::Nasdaq => "Nasdaq Composite",
            Self::DowJones => "Dow Jones Industrial Average",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sp500 => "sp500",
            Self::Nasdaq => "nasdaq",
            Self::DowJones => "dow",
        }
    }

    pub fn symbol(self) -> Symbol {
        Symbol::from_static(self.ticker())
    }
}

impl Display for MarketIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for MarketIndex {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sp500" | "s&p500" | "s&p 500" | "^gspc" => Ok(Self::Sp500),
            "nasdaq" | "^ixic" => Ok(Self::Nasdaq),
            "dow" | "dowjones" | "dow_jones" | "^dji" => Ok(Self::DowJones),
            other => Err(ValidationError::InvalidIndex {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_index_has_a_valid_symbol() {
        for index in MarketIndex::ALL {
            assert_eq!(index.symbol().as_str(), index.ticker());
            assert!(index.symbol().is_index());
        }
    }

    #[test]
    fn parses_aliases_and_tickers() {
        assert_eq!(MarketIndex::from_str("SP500"), Ok(MarketIndex::Sp500));
        assert_eq!(MarketIndex::from_str("^ixic"), Ok(MarketIndex::Nasdaq));
        assert_eq!(MarketIndex::from_str("dow"), Ok(MarketIndex::DowJones));
    }

    #[test]
    fn rejects_unknown_index() {
        let err = MarketIndex::from_str("ftse").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidIndex { .. }));
    }
}
