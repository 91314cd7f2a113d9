use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use axum::http::HeaderValue;
use serde::Deserialize;

const ENV_PREFIX: &str = "CRUDDUR";
const ENV_SEPARATOR: &str = "__";

/// Plain environment variables honoured for keys the layered sources left unset.
const FRONTEND_URL: &str = "FRONTEND_URL";
const BACKEND_URL: &str = "BACKEND_URL";
const TRACING_COLLECTOR_ENDPOINT: &str = "TRACING_COLLECTOR_ENDPOINT";
const TRACING_API_KEY: &str = "TRACING_API_KEY";
const ERROR_REPORTING_ACCESS_TOKEN: &str = "ERROR_REPORTING_ACCESS_TOKEN";
const ROLLBAR_ACCESS_TOKEN: &str = "ROLLBAR_ACCESS_TOKEN";

/// Top-level application configuration loaded from file + environment.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub cors: CorsSection,
    pub logging: LoggingSection,
    pub tracing: TracingSection,
    pub reporting: ReportingSection,
    pub auth: AuthSection,
}

impl AppConfig {
    /// Load configuration from disk and the process environment.
    pub fn load() -> Result<Self> {
        let config_path = env::var("CRUDDUR_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
        let path = PathBuf::from(&config_path);
        let file = path.exists().then_some(path.as_path());

        Self::from_sources(file, env::vars().collect())
    }

    /// Build configuration from an optional TOML file and a set of environment variables.
    pub fn from_sources(file: Option<&Path>, vars: HashMap<String, String>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path.to_path_buf()));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator(ENV_SEPARATOR)
                .try_parsing(true)
                .source(Some(vars.clone())),
        );

        let settings = builder.build().context("failed to read configuration sources")?;
        let mut config: Self = settings
            .try_deserialize()
            .context("failed to deserialize configuration")?;

        config.apply_fallbacks(&vars);

        if config.logging.level.trim().is_empty() {
            config.logging.level = "info".to_string();
        }

        config.validate()?;
        Ok(config)
    }

    fn apply_fallbacks(&mut self, vars: &HashMap<String, String>) {
        let lookup = |key: &str| {
            vars.get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        fill(&mut self.cors.frontend_url, lookup(FRONTEND_URL));
        fill(&mut self.cors.backend_url, lookup(BACKEND_URL));
        fill(
            &mut self.tracing.collector_endpoint,
            lookup(TRACING_COLLECTOR_ENDPOINT),
        );
        fill(&mut self.tracing.api_key, lookup(TRACING_API_KEY));
        fill(
            &mut self.reporting.access_token,
            lookup(ERROR_REPORTING_ACCESS_TOKEN).or_else(|| lookup(ROLLBAR_ACCESS_TOKEN)),
        );
    }

    /// Semantic checks that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        self.cors_origins()?;

        if let Some(endpoint) = &self.tracing.collector_endpoint {
            ensure_http_url("tracing.collector_endpoint", endpoint)?;
            if self.tracing.api_key.as_deref().map_or(true, str::is_empty) {
                bail!("tracing.api_key must be specified when tracing.collector_endpoint is set");
            }
        }
        if self.tracing.batch_size == 0 {
            bail!("tracing.batch_size must be at least 1");
        }
        if self.tracing.flush_interval_ms == 0 {
            bail!("tracing.flush_interval_ms must be at least 1");
        }
        if let Some(endpoint) = &self.reporting.endpoint {
            ensure_http_url("reporting.endpoint", endpoint)?;
        }
        if self.auth.default_handle.trim().is_empty() {
            bail!("auth.default_handle must not be empty");
        }

        Ok(())
    }

    /// Origins allowed to call `/api/*`, normalised without a trailing slash.
    pub fn cors_origins(&self) -> Result<Vec<HeaderValue>> {
        let configured = [&self.cors.frontend_url, &self.cors.backend_url]
            .into_iter()
            .flatten()
            .chain(self.cors.extra_origins.iter());

        let mut origins = Vec::new();
        for origin in configured {
            let origin = origin.trim().trim_end_matches('/');
            if origin.is_empty() {
                continue;
            }
            ensure_http_url("cors origin", origin)?;
            let value = HeaderValue::from_str(origin)
                .with_context(|| format!("invalid cors origin '{origin}'"))?;
            if !origins.contains(&value) {
                origins.push(value);
            }
        }
        Ok(origins)
    }
}

fn fill(slot: &mut Option<String>, fallback: Option<String>) {
    if slot.as_deref().map_or(true, str::is_empty) {
        *slot = fallback;
    }
}

fn ensure_http_url(name: &str, value: &str) -> Result<()> {
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        bail!("{name} must be an http(s) URL, got '{value}'");
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4567,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsSection {
    pub frontend_url: Option<String>,
    pub backend_url: Option<String>,
    pub extra_origins: Vec<String>,
    pub allow_headers: Vec<String>,
    pub expose_headers: Vec<String>,
    pub methods: Vec<String>,
}

impl Default for CorsSection {
    fn default() -> Self {
        Self {
            frontend_url: None,
            backend_url: None,
            extra_origins: Vec::new(),
            allow_headers: vec!["content-type".to_string(), "if-modified-since".to_string()],
            expose_headers: vec!["location".to_string(), "link".to_string()],
            methods: ["OPTIONS", "GET", "HEAD", "POST"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Text,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TracingSection {
    pub service_name: String,
    pub collector_endpoint: Option<String>,
    pub api_key: Option<String>,
    pub batch_size: usize,
    pub flush_interval_ms: u64,
}

impl Default for TracingSection {
    fn default() -> Self {
        Self {
            service_name: "cruddur-backend".to_string(),
            collector_endpoint: None,
            api_key: None,
            batch_size: 64,
            flush_interval_ms: 5_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportingSection {
    pub endpoint: Option<String>,
    pub access_token: Option<String>,
    pub environment: String,
}

impl Default for ReportingSection {
    fn default() -> Self {
        Self {
            endpoint: None,
            access_token: None,
            environment: "production".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthSection {
    /// Handle used as the current user until a real identity provider is wired in
    pub default_handle: String,
}

impl Default for AuthSection {
    fn default() -> Self {
        Self {
            default_handle: "greyalora".to_string(),
        }
    }
}
