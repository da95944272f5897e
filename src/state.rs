use std::sync::Arc;

use crate::external::prediction_api::PredictionApi;
use crate::services::dashboard_service::DashboardService;

#[derive(Clone)]
pub struct AppState {
    pub dashboard: DashboardService,
    pub api: Arc<dyn PredictionApi>,
}
