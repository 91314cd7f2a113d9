//! API server state

use std::sync::Arc;

use anyhow::Result;
use tower_http::cors::CorsLayer;

use super::cors::build_cors_layer;
use crate::auth::{IdentityProvider, StaticIdentity};
use crate::config::AppConfig;
use crate::observability::ErrorReporter;
use crate::services::{ServiceContext, SystemClock};

/// API server state
#[derive(Clone)]
pub struct AppState {
    /// Clock and error reporter handed to every service call
    pub services: ServiceContext,

    /// Source of the current user's handle
    pub identity: Arc<dyn IdentityProvider>,

    /// CORS policy applied to `/api/*`
    pub cors: CorsLayer,
}

impl AppState {
    pub fn new(
        services: ServiceContext,
        identity: Arc<dyn IdentityProvider>,
        cors: CorsLayer,
    ) -> Self {
        Self {
            services,
            identity,
            cors,
        }
    }

    /// Wire production collaborators from configuration
    pub fn from_config(config: &AppConfig, reporter: Arc<dyn ErrorReporter>) -> Result<Self> {
        let services = ServiceContext::new(Arc::new(SystemClock), reporter);
        let identity = Arc::new(StaticIdentity::new(config.auth.default_handle.clone()));
        let cors = build_cors_layer(config)?;

        Ok(Self::new(services, identity, cors))
    }

    pub fn reporter(&self) -> &Arc<dyn ErrorReporter> {
        self.services.reporter()
    }
}
