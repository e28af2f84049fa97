// CCA Allocation Service - HTTP entry point

use std::path::PathBuf;

use anyhow::{Context, Result};
use cca_allocation::models::settings::ConfigOverrides;
use cca_allocation::storage::{ConfigService, Database};
use cca_allocation::{build_router, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,cca_allocation=info")),
        )
        .init();

    let mut config_service = match std::env::var("CCA_CONFIG") {
        Ok(path) => ConfigService::load(&PathBuf::from(path)),
        Err(_) => ConfigService::new(),
    }
    .context("loading configuration")?;
    config_service.apply_overrides(ConfigOverrides::from_env()?)?;
    let config = config_service.get_config_clone();

    let database = match &config.database_path {
        Some(path) => Database::open(path),
        None => Database::new(),
    }
    .context("opening database")?;

    let addr = config.bind_addr.clone();
    tracing::info!(
        run_mode = config.run_mode.as_str(),
        config = %config_service.path().display(),
        "configuration loaded"
    );
    let app = build_router(AppState::new(database, config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("cca allocation server listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
