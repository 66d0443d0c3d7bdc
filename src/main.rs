/// Main application entry point
use dso_ranker::catalog::Catalog;
use dso_ranker::clients::WeatherClient;
use dso_ranker::config::AppConfig;
use dso_ranker::handlers::AppState;
use dso_ranker::routes::build_router;
use dso_ranker::services::PlannerService;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    // Load configuration
    let config = AppConfig::from_env()?;
    info!("Configuration loaded successfully");

    // Load catalog
    let catalog = match &config.catalog_path {
        Some(path) => Catalog::from_json_file(path)?,
        None => Catalog::builtin(),
    };
    if catalog.is_empty() {
        warn!("Catalog is empty; every ranking will be empty");
    }
    info!("Catalog ready with {} objects", catalog.len());

    // Initialize clients
    let weather = if config.weather.enabled {
        let timeout = Duration::from_secs(config.weather.timeout_seconds);
        Some(WeatherClient::new(config.weather.url.clone(), timeout)?)
    } else {
        info!("Weather lookups disabled");
        None
    };

    // Initialize services
    let service = Arc::new(PlannerService::new(
        Arc::new(catalog),
        config.observer,
        weather,
        config.result_limit,
    ));

    // Build router
    let app = build_router(AppState { service });

    // Start server
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("dso_ranker listening on {}", config.bind_addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
