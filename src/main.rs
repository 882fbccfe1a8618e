// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};
use anyhow::Context;
use tracing_subscriber::EnvFilter;

use metro_pipeline_dashboard::application::dashboard_service::DashboardService;
use metro_pipeline_dashboard::application::metro_loader::MetroDataLoader;
use metro_pipeline_dashboard::domain::metro::MetroCatalog;
use metro_pipeline_dashboard::infrastructure::config::load_dashboard_config;
use metro_pipeline_dashboard::infrastructure::http_repository::HttpMetroRepository;
use metro_pipeline_dashboard::presentation::app_state::AppState;
use metro_pipeline_dashboard::presentation::routes::create_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_dashboard_config()?;
    let catalog = Arc::new(MetroCatalog::new(config.metros.clone())?);
    let initial = match &config.default_metro {
        Some(id) => catalog
            .get(id)
            .cloned()
            .with_context(|| format!("default_metro '{}' is not in the metro catalog", id))?,
        None => catalog.first().clone(),
    };

    // Create repository (infrastructure layer)
    let repository = Arc::new(HttpMetroRepository::new(
        config.data.base_url.clone(),
        config.data.path_template.clone(),
        Duration::from_secs(config.data.request_timeout_secs),
    )?);

    // Create services (application layer)
    let loader = MetroDataLoader::new(repository);
    let dashboard_service = DashboardService::new(catalog, loader, initial);

    // Create application state
    let state = Arc::new(AppState {
        dashboard_service: dashboard_service.clone(),
    });

    // Build router (presentation layer)
    let router = create_router(state, config.data.directory.as_ref().map(PathBuf::from));

    let addr: SocketAddr = config
        .server
        .bind_address
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind_address))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Starting metro-pipeline-dashboard on {}", addr);

    // The first load may fetch from this same server, so start it once bound
    let _ = dashboard_service.start().await;

    axum::serve(listener, router).await?;

    Ok(())
}
