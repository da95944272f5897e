use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Group, PredictionsResponse, ScreenerInfo, StockPrediction, TrainResult};

#[derive(Debug, Error)]
pub enum ApiError {
    /// Network failure, timeout or non-2xx status
    #[error("transport error: {0}")]
    Transport(String),

    /// The symbol is unknown or could not be analyzed
    #[error("not found: {0}")]
    NotFound(String),

    #[error("parse error: {0}")]
    Parse(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

/// Typed access to the remote surge-analysis API.
///
/// Implementations do not retry and do not cache; the dashboard service owns
/// both concerns.
#[async_trait]
pub trait PredictionApi: Send + Sync {
    /// Cached predictions for a group, at most `limit` entries, best first.
    async fn list_predictions(
        &self,
        group: Group,
        limit: u32,
        min_score: f64,
    ) -> Result<PredictionsResponse, ApiError>;

    /// Forces the server to rescan the group. Can take minutes.
    async fn force_refresh(
        &self,
        group: Group,
        workers: u32,
    ) -> Result<PredictionsResponse, ApiError>;

    async fn analyze_ticker(&self, symbol: &str) -> Result<StockPrediction, ApiError>;

    async fn screener_info(&self) -> Result<ScreenerInfo, ApiError>;

    async fn train_model(&self) -> Result<TrainResult, ApiError>;
}
