//! CORS policy for the API routes

use anyhow::{Context, Result};
use axum::http::{HeaderName, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::AppConfig;

/// Build the CORS layer from the configured origins, headers and methods.
///
/// Only listed origins are echoed back in `Access-Control-Allow-Origin`; with no
/// origins configured every cross-origin request is refused.
pub fn build_cors_layer(config: &AppConfig) -> Result<CorsLayer> {
    let origins = config.cors_origins()?;
    if origins.is_empty() {
        tracing::warn!("No CORS origins configured; cross-origin API calls will be refused");
    }

    let methods = config
        .cors
        .methods
        .iter()
        .map(|m| {
            Method::from_bytes(m.trim().to_ascii_uppercase().as_bytes())
                .with_context(|| format!("invalid cors method '{m}'"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(methods)
        .allow_headers(header_names("allow_headers", &config.cors.allow_headers)?)
        .expose_headers(header_names("expose_headers", &config.cors.expose_headers)?))
}

fn header_names(field: &str, names: &[String]) -> Result<Vec<HeaderName>> {
    names
        .iter()
        .map(|name| {
            HeaderName::from_bytes(name.trim().as_bytes())
                .with_context(|| format!("invalid cors.{field} entry '{name}'"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_header_names() {
        let mut config = AppConfig::default();
        config.cors.allow_headers.push("bad header".to_string());
        assert!(build_cors_layer(&config).is_err());
    }

    #[test]
    fn builds_with_defaults() {
        let mut config = AppConfig::default();
        config.cors.frontend_url = Some("https://app.example.com/".to_string());
        assert!(build_cors_layer(&config).is_ok());
    }
}
