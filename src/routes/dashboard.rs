use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use http::StatusCode;
use tracing::info;

use crate::errors::AppError;
use crate::models::Group;
use crate::services::dashboard_service::DashboardView;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/groups/:group/select", post(select_group))
        .route("/refresh", post(force_refresh))
}

pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardView> {
    Json(state.dashboard.view())
}

/// Switches the active tab. The load runs in the background; the returned
/// view already shows whatever was cached for the group.
pub async fn select_group(
    Path(group): Path<String>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<DashboardView>), AppError> {
    let group: Group = group.parse().map_err(AppError::Validation)?;
    info!("POST /groups/{}/select", group);

    if state.dashboard.switch_to(group) {
        let dashboard = state.dashboard.clone();
        tokio::spawn(async move { dashboard.load_group(group).await });
    }

    let view = state.dashboard.view();
    Ok((StatusCode::ACCEPTED, Json(view)))
}

/// Starts a forced rescan of the active group in the background.
pub async fn force_refresh(State(state): State<AppState>) -> (StatusCode, Json<DashboardView>) {
    info!("POST /refresh - Rescanning {}", state.dashboard.active_group());

    let dashboard = state.dashboard.clone();
    tokio::spawn(async move { dashboard.force_refresh().await });

    (StatusCode::ACCEPTED, Json(state.dashboard.view()))
}
