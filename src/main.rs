use actix_web::{App, HttpServer, web};
use anyhow::Context;
use krishi_setu::config::AppConfig;
use krishi_setu::service::MarketService;
use krishi_setu::web::{AppState, configure_app_routes};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting Krishi Setu server...");

    let config = AppConfig::from_env()
        .inspect_err(|e| tracing::error!(error = %e, "Failed to load application configuration."))?;

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating database directory {}", parent.display()))?;
    }
    let db = sled::open(&config.database_path)
        .with_context(|| format!("opening sled database at {}", config.database_path.display()))?;
    tracing::info!(path = %config.database_path.display(), "Database opened.");

    let service = MarketService::new(Arc::new(db))?;
    let address = config.bind_address();
    let state = AppState::new(service, config);
    let shutdown_state = state.clone();

    tracing::info!("Attempting to bind server to {}...", address);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(configure_app_routes)
    })
    .bind(&address)?
    .run()
    .await?;

    shutdown_state.service.flush()?;
    tracing::info!("Server stopped, database flushed.");
    Ok(())
}
