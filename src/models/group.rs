use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Ticker universe the dashboard can display.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Group {
    #[serde(rename = "sp500")]
    Sp500,

    #[serde(rename = "nasdaq100")]
    Nasdaq100,
}

impl Group {
    pub const ALL: [Group; 2] = [Group::Sp500, Group::Nasdaq100];

    /// Identifier used on the wire (`?group=` query parameter, route paths).
    pub fn as_str(&self) -> &'static str {
        match self {
            Group::Sp500 => "sp500",
            Group::Nasdaq100 => "nasdaq100",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Group::Sp500 => "S&P 500",
            Group::Nasdaq100 => "NASDAQ 100",
        }
    }
}

impl Default for Group {
    fn default() -> Self {
        Group::Sp500
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Group {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sp500" | "s&p500" | "spx" => Ok(Group::Sp500),
            "nasdaq100" | "ndx" => Ok(Group::Nasdaq100),
            other => Err(format!(
                "Unknown group '{}'. Must be one of: {}",
                other,
                Group::ALL.iter().map(|g| g.as_str()).collect::<Vec<_>>().join(", ")
            )),
        }
    }
}
