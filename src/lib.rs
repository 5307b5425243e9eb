pub mod analysis_tracker;
pub mod api;
pub mod config;
pub mod core_state; // Shared application state
pub mod dashboard;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod store;
pub mod trends;

use std::sync::Arc;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::ServiceConfig;
use crate::core_state::{CoreError, CoreState};

#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Server(#[from] api::ServerError),
}

/// Install the global tracing subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Serve the API until Ctrl-C.
pub async fn run() -> Result<(), StartupError> {
    init_tracing();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = ServiceConfig::from_env();
    if config::api_key_from_env().is_none() {
        tracing::warn!("No API key set; insights will use the fallback text");
    }
    let bind_addr = config.bind_addr;
    tracing::info!(
        %bind_addr,
        model = %config.insight_model,
        reports_dir = %config.reports_dir.display(),
        "Configuration loaded"
    );

    let core = Arc::new(CoreState::from_config(config)?);
    let server = api::start_api_server(core, bind_addr).await?;

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for shutdown signal: {e}");
    }

    server.stop().await;
    tracing::info!("{} stopped", config::APP_NAME);
    Ok(())
}
