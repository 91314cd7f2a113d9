//! Error types for cruddur

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Faults raised inside a service body. They never reach a caller directly;
/// the service boundary reports them and answers with a failed envelope.
#[derive(Error, Debug)]
pub enum Error {
    #[error("timestamp out of range: {base} + {delta}")]
    TimestampOverflow {
        base: DateTime<Utc>,
        delta: Duration,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }
}
