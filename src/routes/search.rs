use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use crate::services::search::SearchState;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub ticker: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search", get(search).delete(clear_search))
}

/// Waits for the analysis and returns the updated search state. Errors are
/// part of the state, not an HTTP failure.
pub async fn search(
    Query(params): Query<SearchParams>,
    State(state): State<AppState>,
) -> Json<SearchState> {
    info!("GET /search?ticker={}", params.ticker);
    state.dashboard.search(&params.ticker).await;
    Json(state.dashboard.search_state())
}

pub async fn clear_search(State(state): State<AppState>) -> Json<SearchState> {
    info!("DELETE /search");
    state.dashboard.clear_search();
    Json(state.dashboard.search_state())
}
