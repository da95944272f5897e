use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::prediction::StockPrediction;
use super::summary::{ScanInfo, SummaryStats};

/// Body returned by both `/predictions` and `/refresh`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PredictionsResponse {
    #[serde(default)]
    pub disclaimer: String,
    #[serde(default)]
    pub predictions: Vec<StockPrediction>,
    pub total_analyzed: Option<usize>,
    pub showing: Option<usize>,
    pub stats: Option<SummaryStats>,
    pub scan_info: Option<ScanInfo>,
    pub message: Option<String>,
    pub status: Option<String>,
}

/// Body returned by `/stock/<ticker>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAnalysisResponse {
    #[serde(default)]
    pub disclaimer: String,
    pub analysis: StockPrediction,
}

/// Body returned by `/screener-info`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScreenerInfo {
    #[serde(default)]
    pub sources_description: BTreeMap<String, String>,
    /// Either the last scan's `ScanInfo`-like object or a plain message
    /// ("No refresh yet") depending on server state.
    pub last_refresh: Option<serde_json::Value>,
}

/// Body returned by `/train`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainResult {
    pub status: Option<String>,
    #[serde(default)]
    pub details: serde_json::Value,
}
