use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{dashboard, health, screener, search};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    let api = dashboard::router()
        .merge(search::router())
        .merge(screener::router());

    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api", api)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
