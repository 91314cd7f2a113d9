//! Cruddur - HTTP API backend for a social feed
//!
//! The backend serves activities, notifications and direct messages:
//! - Feature services returning typed result envelopes
//! - Axum router translating envelopes into HTTP responses
//! - CORS, access logging, request spans and error reporting around every request
//! - Optional shipping of spans and error events to HTTP collectors

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod observability;
pub mod services;
pub mod types;

pub use error::{Error, Result};
