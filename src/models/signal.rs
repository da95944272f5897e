use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Polarity of a single technical observation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SignalType {
    /// Bullish signal - expect price increase
    #[serde(rename = "bullish")]
    Bullish,

    /// Bearish signal - expect price decrease
    #[serde(rename = "bearish")]
    Bearish,

    /// Neutral signal - noteworthy but no clear direction
    #[serde(rename = "neutral")]
    Neutral,
}

impl std::fmt::Display for SignalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalType::Bullish => write!(f, "bullish"),
            SignalType::Bearish => write!(f, "bearish"),
            SignalType::Neutral => write!(f, "neutral"),
        }
    }
}

/// One discrete observation about a ticker (e.g. "RSI oversold at 28.4")
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Signal {
    #[serde(rename = "type")]
    pub signal_type: SignalType,

    /// Name of the indicator that produced it (e.g., "RSI", "MACD", "Volume")
    pub indicator: String,

    pub message: String,
}

/// Indicator name -> latest value. A value is `None` when the server could
/// not compute it (not enough history, division by zero, ...).
pub type IndicatorSet = BTreeMap<String, Option<f64>>;

/// Count of signals per polarity
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignalCounts {
    pub bullish: usize,
    pub bearish: usize,
    pub neutral: usize,
}

impl SignalCounts {
    pub fn tally(signals: &[Signal]) -> Self {
        signals.iter().fold(Self::default(), |mut acc, s| {
            match s.signal_type {
                SignalType::Bullish => acc.bullish += 1,
                SignalType::Bearish => acc.bearish += 1,
                SignalType::Neutral => acc.neutral += 1,
            }
            acc
        })
    }
}
