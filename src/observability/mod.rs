//! Logging, span export and error reporting
//!
//! Everything here is built once at startup from [`AppConfig`] and handed to
//! the router and services explicitly. The only process-wide registration is
//! the `tracing` subscriber installed by [`init_tracing`].

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{AppConfig, LogFormat};

pub mod access_log;
pub mod export;
pub mod reporter;
pub mod shipper;

pub use access_log::access_log;
pub use export::{SpanExportLayer, SpanRecord};
pub use reporter::{ErrorEvent, ErrorReporter, HttpReporter, Severity, TracingReporter};
pub use shipper::{Shipper, ShipperConfig};

/// Install the global subscriber: env filter, fmt output and, when a
/// collector is configured, the span exporter.
///
/// Must be called from within a tokio runtime when span export is enabled.
pub fn init_tracing(config: &AppConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.logging.level.clone()))
        .unwrap_or_else(|_| EnvFilter::new("cruddur=info"));

    let exporter = build_span_exporter(config);
    let registry = tracing_subscriber::registry().with(env_filter).with(exporter);

    match config.logging.format {
        LogFormat::Json => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()?;
        }
        LogFormat::Text => {
            registry.with(tracing_subscriber::fmt::layer()).try_init()?;
        }
    }

    Ok(())
}

fn build_span_exporter(config: &AppConfig) -> Option<SpanExportLayer> {
    let tracing_config = &config.tracing;
    let endpoint = tracing_config.collector_endpoint.clone()?;
    let api_key = tracing_config.api_key.clone().unwrap_or_default();

    let shipper = Shipper::spawn(ShipperConfig {
        endpoint,
        auth_header: "x-api-key",
        token: api_key,
        batch_size: tracing_config.batch_size,
        flush_interval: Duration::from_millis(tracing_config.flush_interval_ms),
    });

    Some(SpanExportLayer::new(
        tracing_config.service_name.clone(),
        resolve_host(),
        shipper,
    ))
}

fn resolve_host() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "cruddur-node".to_string())
}

/// Error reporter for the configured tracker, falling back to log-only reporting.
///
/// Must be called from within a tokio runtime when a tracker is configured.
pub fn build_reporter(config: &AppConfig) -> Arc<dyn ErrorReporter> {
    let reporting = &config.reporting;
    match (&reporting.endpoint, &reporting.access_token) {
        (Some(endpoint), Some(token)) => {
            tracing::info!(%endpoint, environment = %reporting.environment, "Error reporting enabled");
            let shipper = Shipper::spawn(ShipperConfig {
                endpoint: endpoint.clone(),
                auth_header: "x-access-token",
                token: token.clone(),
                batch_size: 1,
                flush_interval: Duration::from_secs(1),
            });
            Arc::new(HttpReporter::new(reporting.environment.clone(), shipper))
        }
        (None, Some(_)) => {
            tracing::warn!("reporting.access_token set without reporting.endpoint; reports are logged only");
            Arc::new(TracingReporter)
        }
        _ => Arc::new(TracingReporter),
    }
}

/// Turn a caught panic into a reported event and a 500 response.
pub fn panic_response(reporter: &dyn ErrorReporter, payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };

    tracing::error!(panic = %message, "request handler panicked");
    reporter.report(ErrorEvent::new(Severity::Critical, "panic", message));

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": "internal server error" })),
    )
        .into_response()
}
