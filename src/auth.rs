//! Current-user resolution
//!
//! Authentication is out of scope for this backend: the router asks an
//! [`IdentityProvider`] who is calling and threads the resulting handle into
//! every service that acts on behalf of a user.

use async_trait::async_trait;
use axum::http::request::Parts;

/// Resolves the handle of the user making a request
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `None` when the caller cannot be identified
    async fn current_user(&self, parts: &Parts) -> Option<String>;
}

/// Treats every request as coming from one configured user
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    handle: String,
}

impl StaticIdentity {
    pub fn new(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn current_user(&self, _parts: &Parts) -> Option<String> {
        Some(self.handle.clone())
    }
}
