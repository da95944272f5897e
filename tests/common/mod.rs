//! Scripted `PredictionApi` double shared by the integration tests.
//!
//! In immediate mode every call answers straight away from canned data. In
//! held mode every call parks until the test resolves it, which lets a test
//! complete requests in any order it likes.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

use surge_dashboard::config::DashboardSettings;
use surge_dashboard::external::prediction_api::{ApiError, PredictionApi};
use surge_dashboard::models::{
    Group, PredictionsResponse, ScanInfo, ScreenerInfo, StockPrediction, TrainResult,
};
use surge_dashboard::services::dashboard_service::DashboardService;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List(Group),
    Refresh(Group),
    Analyze(String),
}

type PredictionsResult = Result<PredictionsResponse, ApiError>;
type StockResult = Result<StockPrediction, ApiError>;

enum Responder {
    Predictions(oneshot::Sender<PredictionsResult>),
    Stock(oneshot::Sender<StockResult>),
}

struct Parked {
    call: Call,
    responder: Responder,
}

pub struct ScriptedApi {
    hold: bool,
    fail: AtomicBool,
    log: Mutex<Vec<Call>>,
    parked: Mutex<Vec<Parked>>,
    lists: Mutex<HashMap<Group, PredictionsResponse>>,
    unknown: Mutex<HashSet<String>>,
}

impl ScriptedApi {
    pub fn immediate() -> Arc<Self> {
        Arc::new(Self::with_hold(false))
    }

    pub fn held() -> Arc<Self> {
        Arc::new(Self::with_hold(true))
    }

    fn with_hold(hold: bool) -> Self {
        Self {
            hold,
            fail: AtomicBool::new(false),
            log: Mutex::new(Vec::new()),
            parked: Mutex::new(Vec::new()),
            lists: Mutex::new(HashMap::new()),
            unknown: Mutex::new(HashSet::new()),
        }
    }

    /// Every immediate call fails with a transport error while set
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    pub fn set_list(&self, group: Group, resp: PredictionsResponse) {
        self.lists.lock().insert(group, resp);
    }

    pub fn mark_unknown(&self, symbol: &str) {
        self.unknown.lock().insert(symbol.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.lock().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.calls().iter().filter(|c| matches!(c, Call::List(_))).count()
    }

    pub fn parked_calls(&self) -> Vec<Call> {
        self.parked.lock().iter().map(|p| p.call.clone()).collect()
    }

    /// Yield to the runtime until at least `n` calls are parked
    pub async fn wait_for_parked(&self, n: usize) {
        for _ in 0..10_000 {
            if self.parked.lock().len() >= n {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("expected {} parked calls, have {:?}", n, self.parked_calls());
    }

    fn take(&self, call: &Call) -> Responder {
        let mut parked = self.parked.lock();
        let idx = parked
            .iter()
            .position(|p| &p.call == call)
            .unwrap_or_else(|| panic!("no parked call {:?}", call));
        parked.remove(idx).responder
    }

    pub fn resolve(&self, call: Call, result: PredictionsResult) {
        match self.take(&call) {
            Responder::Predictions(tx) => {
                let _ = tx.send(result);
            }
            Responder::Stock(_) => panic!("{:?} is not a predictions call", call),
        }
    }

    /// Resolve the `index`-th parked call (in parking order)
    pub fn resolve_at(&self, index: usize, result: PredictionsResult) {
        let parked = self.parked.lock().remove(index);
        match parked.responder {
            Responder::Predictions(tx) => {
                let _ = tx.send(result);
            }
            Responder::Stock(_) => panic!("{:?} is not a predictions call", parked.call),
        }
    }

    pub fn resolve_stock(&self, symbol: &str, result: StockResult) {
        match self.take(&Call::Analyze(symbol.to_string())) {
            Responder::Stock(tx) => {
                let _ = tx.send(result);
            }
            Responder::Predictions(_) => unreachable!(),
        }
    }

    fn transport_error() -> ApiError {
        ApiError::Transport("connection refused".into())
    }

    async fn park_predictions(&self, call: Call) -> PredictionsResult {
        let (tx, rx) = oneshot::channel();
        self.parked.lock().push(Parked { call, responder: Responder::Predictions(tx) });
        rx.await.unwrap_or_else(|_| Err(Self::transport_error()))
    }
}

#[async_trait]
impl PredictionApi for ScriptedApi {
    async fn list_predictions(&self, group: Group, _limit: u32, _min_score: f64) -> PredictionsResult {
        self.log.lock().push(Call::List(group));
        if self.hold {
            return self.park_predictions(Call::List(group)).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(Self::transport_error());
        }
        let canned = self.lists.lock().get(&group).cloned();
        let ticker = format!("{}-TOP", group);
        Ok(canned.unwrap_or_else(|| response(&[(ticker.as_str(), 72.0)])))
    }

    async fn force_refresh(&self, group: Group, _workers: u32) -> PredictionsResult {
        self.log.lock().push(Call::Refresh(group));
        if self.hold {
            return self.park_predictions(Call::Refresh(group)).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(ApiError::Transport("request timed out".into()));
        }
        let ticker = format!("{}-FRESH", group);
        Ok(with_scan(response(&[(ticker.as_str(), 81.0)]), 120))
    }

    async fn analyze_ticker(&self, symbol: &str) -> StockResult {
        self.log.lock().push(Call::Analyze(symbol.to_string()));
        if self.hold {
            let (tx, rx) = oneshot::channel();
            self.parked.lock().push(Parked {
                call: Call::Analyze(symbol.to_string()),
                responder: Responder::Stock(tx),
            });
            return rx.await.unwrap_or_else(|_| Err(Self::transport_error()));
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(Self::transport_error());
        }
        if self.unknown.lock().contains(symbol) {
            return Err(ApiError::NotFound(symbol.to_string()));
        }
        Ok(prediction(symbol, 64.0))
    }

    async fn screener_info(&self) -> Result<ScreenerInfo, ApiError> {
        let mut info = ScreenerInfo::default();
        info.sources_description
            .insert("unusual_volume".into(), "Relative volume > 2x average".into());
        info.last_refresh = Some(json!("No refresh yet"));
        Ok(info)
    }

    async fn train_model(&self) -> Result<TrainResult, ApiError> {
        Ok(TrainResult {
            status: Some("success".into()),
            details: json!({"status": "success", "accuracy": 0.71}),
        })
    }
}

pub fn prediction(ticker: &str, total_score: f64) -> StockPrediction {
    serde_json::from_value(json!({
        "ticker": ticker,
        "name": format!("{} Corp", ticker),
        "sector": "Technology",
        "current_price": 123.45,
        "total_score": total_score,
        "technical_score": total_score,
        "sentiment_score": 50.0,
        "volume_score": 50.0,
        "ml_surge_probability": null,
        "signals": [],
        "indicators": {},
        "sentiment_detail": {"score": 50.0},
        "price_history": [{"date": "2024-05-01", "close": 120.0, "volume": 1000000}]
    }))
    .expect("valid prediction fixture")
}

pub fn response(entries: &[(&str, f64)]) -> PredictionsResponse {
    PredictionsResponse {
        disclaimer: "For educational purposes only. NOT investment advice.".into(),
        predictions: entries.iter().map(|(t, s)| prediction(t, *s)).collect(),
        ..Default::default()
    }
}

pub fn with_scan(mut resp: PredictionsResponse, analyzed: usize) -> PredictionsResponse {
    resp.scan_info = Some(ScanInfo {
        total_candidates: analyzed + 3,
        analyzed,
        failed: 3,
        failed_tickers: vec!["BAD1".into(), "BAD2".into(), "BAD3".into()],
        elapsed_seconds: 95.4,
        sources: [("unusual_volume".to_string(), 40), ("default_list".to_string(), analyzed)]
            .into_iter()
            .collect(),
    });
    resp.status = Some("refreshed".into());
    resp
}

pub fn tickers(service: &DashboardService, group: Group) -> Vec<String> {
    service
        .group_snapshot(group)
        .predictions
        .iter()
        .map(|p| p.ticker.clone())
        .collect()
}

pub fn settings() -> DashboardSettings {
    DashboardSettings {
        auto_refresh_period: Duration::from_secs(300),
        ..DashboardSettings::default()
    }
}

pub fn service(api: &Arc<ScriptedApi>) -> DashboardService {
    DashboardService::new(api.clone(), settings())
}
