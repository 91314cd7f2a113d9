//! Cruddur server binary

use std::net::SocketAddr;

use anyhow::Context;

use cruddur::api::{create_router, AppState};
use cruddur::config::AppConfig;
use cruddur::observability::{build_reporter, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;

    init_tracing(&config)?;

    tracing::info!(
        service = %config.tracing.service_name,
        span_export = config.tracing.collector_endpoint.is_some(),
        error_reporting = config.reporting.endpoint.is_some(),
        "Starting cruddur backend"
    );

    let reporter = build_reporter(&config);
    let state = AppState::from_config(&config, reporter).context("invalid configuration")?;
    let router = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    tracing::info!(%addr, "Listening for HTTP traffic");

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
