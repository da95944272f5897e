use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{ScreenerInfo, TrainResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/screener-info", get(get_screener_info))
        .route("/train", post(train_model))
}

pub async fn get_screener_info(State(state): State<AppState>) -> Result<Json<ScreenerInfo>, AppError> {
    info!("GET /screener-info");
    let info = state.api.screener_info().await.map_err(|e| {
        error!("Failed to fetch screener info: {}", e);
        e
    })?;
    Ok(Json(info))
}

pub async fn train_model(State(state): State<AppState>) -> Result<Json<TrainResult>, AppError> {
    info!("POST /train - Retraining surge model");
    let result = state.api.train_model().await.map_err(|e| {
        error!("Model training failed: {}", e);
        e
    })?;
    Ok(Json(result))
}
