use anyhow::Context;
use std::sync::Arc;
use tokio::net::TcpListener;

use indexcast_backend::app;
use indexcast_backend::config::AppConfig;
use indexcast_backend::logging::{init_logging, LoggingConfig};
use indexcast_backend::services::bootstrap::bootstrap;
use indexcast_backend::services::ets_engine::AutoEtsEngine;
use indexcast_backend::services::forecast_engine::FitOptions;
use indexcast_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(&LoggingConfig::from_env()?)?;

    let config = AppConfig::from_env()?;
    let options = FitOptions {
        season_length: config.season_length,
    };

    // Load and train every dataset before accepting queries
    let datasets = config.datasets.clone();
    let report = tokio::task::spawn_blocking(move || {
        bootstrap(&datasets, &AutoEtsEngine::new(), &options)
    })
    .await
    .context("bootstrap task panicked")?;

    if report.cache.is_empty() {
        tracing::warn!("No index could be loaded; every forecast query will return 'Invalid index'");
    }

    let state = AppState {
        cache: Arc::new(report.cache),
    };
    let app = app::create_app(state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("🚀 Indexcast backend running at http://{}/", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
