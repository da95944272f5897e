use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use surge_dashboard::app;
use surge_dashboard::config::DashboardConfig;
use surge_dashboard::external::prediction_api::PredictionApi;
use surge_dashboard::external::surge_api::HttpPredictionApi;
use surge_dashboard::logging::{init_logging, LoggingConfig};
use surge_dashboard::services::dashboard_service::DashboardService;
use surge_dashboard::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env())
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    let config = DashboardConfig::from_env();
    config.validate().map_err(anyhow::Error::msg)?;
    tracing::info!("📊 Using analysis API at {}", config.api_base_url);

    let api: Arc<dyn PredictionApi> = Arc::new(
        HttpPredictionApi::new(
            &config.api_base_url,
            config.request_timeout(),
            config.refresh_timeout(),
        )
        .context("failed to build HTTP client")?,
    );

    let dashboard = DashboardService::new(api.clone(), config.settings());
    dashboard.start();

    let state = AppState {
        dashboard: dashboard.clone(),
        api,
    };
    let app = app::create_app(state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("🚀 Surge dashboard running at http://{}/", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    dashboard.shutdown();
    Ok(())
}
