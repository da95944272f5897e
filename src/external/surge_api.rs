use crate::external::prediction_api::{ApiError, PredictionApi};
use crate::models::{
    Group, PredictionsResponse, ScreenerInfo, StockAnalysisResponse, StockPrediction, TrainResult,
};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// reqwest-backed client for the surge-analysis HTTP API.
pub struct HttpPredictionApi {
    base_url: Url,
    client: reqwest::Client,
    // Rescans of a large universe run for minutes; they get their own client
    // so the short request timeout never applies to them.
    refresh_client: reqwest::Client,
}

impl HttpPredictionApi {
    pub fn new(
        base_url: &str,
        request_timeout: Duration,
        refresh_timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let refresh_client = reqwest::Client::builder()
            .timeout(refresh_timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::Transport(format!("invalid base URL {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Transport(format!("{} cannot be a base URL", base_url)));
        }

        Ok(Self {
            base_url,
            client,
            refresh_client,
        })
    }

    /// Appends `segments` to the base path, percent-encoding each one so a
    /// ticker can never spill into the query or fragment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Transport(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Transport(format!("HTTP {}: {}", status, body)));
        }

        resp.json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

fn send_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Transport(format!("request timed out: {}", e))
    } else {
        ApiError::Transport(e.to_string())
    }
}

#[async_trait]
impl PredictionApi for HttpPredictionApi {
    async fn list_predictions(
        &self,
        group: Group,
        limit: u32,
        min_score: f64,
    ) -> Result<PredictionsResponse, ApiError> {
        debug!("GET /predictions group={} limit={} min_score={}", group, limit, min_score);

        let resp = self
            .client
            .get(self.endpoint(&["predictions"])?)
            .query(&[
                ("group", group.as_str().to_string()),
                ("limit", limit.to_string()),
                ("min_score", min_score.to_string()),
            ])
            .send()
            .await
            .map_err(send_error)?;

        Self::read_json(resp).await
    }

    async fn force_refresh(
        &self,
        group: Group,
        workers: u32,
    ) -> Result<PredictionsResponse, ApiError> {
        info!("🔄 GET /refresh group={} workers={} (may take several minutes)", group, workers);

        let resp = self
            .refresh_client
            .get(self.endpoint(&["refresh"])?)
            .query(&[
                ("group", group.as_str().to_string()),
                ("workers", workers.to_string()),
            ])
            .send()
            .await
            .map_err(send_error)?;

        Self::read_json(resp).await
    }

    async fn analyze_ticker(&self, symbol: &str) -> Result<StockPrediction, ApiError> {
        debug!("GET /stock/{}", symbol);

        let resp = self
            .client
            .get(self.endpoint(&["stock", symbol])?)
            .send()
            .await
            .map_err(send_error)?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(symbol.to_string()));
        }

        let body: StockAnalysisResponse = Self::read_json(resp).await?;

        // Unknown symbols come back as an empty shell rather than a 404
        if body.analysis.is_empty_analysis() {
            return Err(ApiError::NotFound(symbol.to_string()));
        }

        Ok(body.analysis)
    }

    async fn screener_info(&self) -> Result<ScreenerInfo, ApiError> {
        let resp = self
            .client
            .get(self.endpoint(&["screener-info"])?)
            .send()
            .await
            .map_err(send_error)?;

        Self::read_json(resp).await
    }

    async fn train_model(&self) -> Result<TrainResult, ApiError> {
        info!("🧠 GET /train");

        // Training pulls history for a basket of tickers; give it the long budget
        let resp = self
            .refresh_client
            .get(self.endpoint(&["train"])?)
            .send()
            .await
            .map_err(send_error)?;

        Self::read_json(resp).await
    }
}
