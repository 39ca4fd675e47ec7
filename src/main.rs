// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use weather_dashboard::application::dashboard_service::DashboardService;
use weather_dashboard::application::dataset_service::DatasetService;
use weather_dashboard::domain::analytics::AnalyticsEngine;
use weather_dashboard::infrastructure::config::load_config;
use weather_dashboard::infrastructure::file_cache::FileDatasetCache;
use weather_dashboard::infrastructure::open_meteo_repository::OpenMeteoRepository;
use weather_dashboard::presentation::app_state::AppState;
use weather_dashboard::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_config()?;

    // Create adapters (infrastructure layer)
    let repository = Arc::new(OpenMeteoRepository::new(config.open_meteo.clone())?);
    let cache = Arc::new(FileDatasetCache::new(config.cache.dir.clone()));

    // Create services (application layer)
    let dataset_service = DatasetService::new(repository, cache);
    let engine = AnalyticsEngine::new(config.analytics.calendar());
    let dashboard_service = DashboardService::new(dataset_service.clone(), engine);

    let state = Arc::new(AppState {
        dataset_service,
        dashboard_service,
    });

    // Build router (presentation layer)
    let router = build_router(state);

    let addr: SocketAddr = config
        .server
        .bind_addr
        .parse()
        .with_context(|| format!("Invalid bind address: {}", config.server.bind_addr))?;
    tracing::info!(
        "Starting weather-dashboard on {} (cache: {}, calendar: {:?})",
        addr,
        config.cache.dir.display(),
        config.analytics.calendar()
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
