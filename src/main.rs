use anyhow::Context;
use census_employment::api::{self, AppState};
use census_employment::core::ConfigProvider;
use census_employment::utils::{logger, validation::Validate};
use census_employment::{CliConfig, EmploymentAggregator};
use clap::Parser;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting census-employment");

    let config = match config.resolve().and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    tracing::debug!(
        bind = %config.bind,
        census_base_url = %config.census_base_url,
        concurrent_requests = config.concurrent_requests,
        request_timeout_secs = config.request_timeout_secs,
        state_count = config.states().len(),
        "configuration loaded"
    );

    let aggregator = EmploymentAggregator::from_config(&config)
        .context("failed to build Census HTTP client")?;
    let state = AppState::new(Arc::new(aggregator), config.states().to_vec());
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    tracing::info!("📡 Listening on http://{}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("✅ Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
}
