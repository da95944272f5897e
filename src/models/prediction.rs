use serde::{Deserialize, Deserializer, Serialize};

use super::price_point::PricePoint;
use super::sentiment::SentimentDetail;
use super::signal::{IndicatorSet, Signal, SignalCounts};
use super::summary::ScoreBand;

/// Surge prediction for a single ticker, exactly as produced by the
/// analysis API. The dashboard stores and displays it, never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockPrediction {
    pub ticker: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sector: String,
    #[serde(default)]
    pub current_price: f64,

    // Scores are 0-100. Rows served from the server's history table use
    // `score` and `ml_prediction`, and may carry null sub-scores.
    #[serde(alias = "score")]
    pub total_score: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub technical_score: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub sentiment_score: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub volume_score: f64,
    #[serde(default, alias = "ml_prediction")]
    pub ml_surge_probability: Option<f64>,

    #[serde(default)]
    pub signals: Vec<Signal>,
    #[serde(default)]
    pub indicators: IndicatorSet,
    #[serde(default)]
    pub sentiment_detail: SentimentDetail,
    #[serde(default)]
    pub price_history: Vec<PricePoint>,
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

impl StockPrediction {
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() { &self.ticker } else { &self.name }
    }

    pub fn band(&self) -> ScoreBand {
        ScoreBand::classify(self.total_score)
    }

    pub fn ml_probability_label(&self) -> String {
        match self.ml_surge_probability {
            Some(p) => format!("{:.1}%", p),
            None => "N/A".to_string(),
        }
    }

    pub fn signal_counts(&self) -> SignalCounts {
        SignalCounts::tally(&self.signals)
    }

    /// True when the server had nothing to analyze for this symbol.
    pub fn is_empty_analysis(&self) -> bool {
        self.current_price <= 0.0 && self.price_history.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn sample_prediction(ticker: &str, total_score: f64) -> StockPrediction {
    StockPrediction {
        ticker: ticker.to_string(),
        name: format!("{} Inc.", ticker),
        sector: "Technology".to_string(),
        current_price: 100.0,
        total_score,
        technical_score: total_score,
        sentiment_score: 50.0,
        volume_score: 50.0,
        ml_surge_probability: None,
        signals: Vec::new(),
        indicators: IndicatorSet::new(),
        sentiment_detail: SentimentDetail::default(),
        price_history: Vec::new(),
    }
}
