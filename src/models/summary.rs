use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::prediction::StockPrediction;

pub const STRONG_THRESHOLD: f64 = 70.0;
pub const MODERATE_THRESHOLD: f64 = 60.0;

/// Bucket a total score falls into. Same thresholds the analysis API uses
/// for its own `stats` block, so derived and server counts always agree.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Strong,   // >= 70
    Moderate, // >= 60 and < 70
    Weak,     // < 60
}

impl ScoreBand {
    pub fn classify(total_score: f64) -> Self {
        if total_score >= STRONG_THRESHOLD {
            ScoreBand::Strong
        } else if total_score >= MODERATE_THRESHOLD {
            ScoreBand::Moderate
        } else {
            ScoreBand::Weak
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Strong => "Strong surge signal",
            ScoreBand::Moderate => "Moderate surge signal",
            ScoreBand::Weak => "Weak surge signal",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct SummaryStats {
    pub strong: usize,
    pub moderate: usize,
    pub weak: usize,
    #[serde(alias = "top")]
    pub top_score: f64,
}

impl SummaryStats {
    /// Derive the counts locally when the server did not send a `stats` block.
    pub fn from_predictions(predictions: &[StockPrediction]) -> Self {
        let mut stats = predictions.iter().fold(Self::default(), |mut acc, p| {
            match ScoreBand::classify(p.total_score) {
                ScoreBand::Strong => acc.strong += 1,
                ScoreBand::Moderate => acc.moderate += 1,
                ScoreBand::Weak => acc.weak += 1,
            }
            acc.top_score = acc.top_score.max(p.total_score);
            acc
        });
        stats.top_score = (stats.top_score * 10.0).round() / 10.0;
        stats
    }

    pub fn total(&self) -> usize {
        self.strong + self.moderate + self.weak
    }
}

/// Metadata about the most recent forced rescan of a group.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScanInfo {
    #[serde(default)]
    pub total_candidates: usize,
    #[serde(default)]
    pub analyzed: usize,
    #[serde(default)]
    pub failed: usize,
    #[serde(default)]
    pub failed_tickers: Vec<String>,
    #[serde(default)]
    pub elapsed_seconds: f64,
    /// Screening source name -> number of candidates it contributed
    #[serde(default)]
    pub sources: BTreeMap<String, usize>,
}
