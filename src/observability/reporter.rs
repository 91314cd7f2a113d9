//! Error reporting
//!
//! Faults caught at a service boundary and panics caught by the HTTP layer are
//! handed to an [`ErrorReporter`] in addition to normal logging. Reporting never
//! blocks the caller: the HTTP reporter queues events for a background shipper.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::shipper::Shipper;

/// Severity attached to a reported event
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
    Critical,
}

/// A single event for the error tracker
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorEvent {
    pub level: Severity,
    /// Where the event originated (service operation, `panic`, ...)
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorEvent {
    pub fn new(level: Severity, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, title, message)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, title, message)
    }
}

/// Destination for error events
pub trait ErrorReporter: Send + Sync {
    fn report(&self, event: ErrorEvent);
}

/// Reporter that only logs; used when no tracker is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, event: ErrorEvent) {
        match event.level {
            Severity::Warning => {
                tracing::warn!(title = %event.title, message = %event.message, "error report")
            }
            Severity::Error | Severity::Critical => {
                tracing::error!(
                    title = %event.title,
                    message = %event.message,
                    level = ?event.level,
                    "error report"
                )
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReportPayload {
    pub environment: String,
    #[serde(flatten)]
    pub event: ErrorEvent,
}

/// Reporter that ships events to an HTTP error tracker
pub struct HttpReporter {
    environment: String,
    shipper: Shipper<ReportPayload>,
}

impl HttpReporter {
    pub fn new(environment: impl Into<String>, shipper: Shipper<ReportPayload>) -> Self {
        Self {
            environment: environment.into(),
            shipper,
        }
    }
}

impl ErrorReporter for HttpReporter {
    fn report(&self, event: ErrorEvent) {
        tracing::debug!(title = %event.title, "queueing error report");
        self.shipper.send(ReportPayload {
            environment: self.environment.clone(),
            event,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn payload_flattens_event() {
        let mut event = ErrorEvent::warning("reporter_test", "Hello, world!");
        event.timestamp = Utc.timestamp_opt(0, 0).unwrap();

        let payload = ReportPayload {
            environment: "production".to_string(),
            event,
        };
        assert_eq!(
            serde_json::to_value(payload).unwrap(),
            json!({
                "environment": "production",
                "level": "warning",
                "title": "reporter_test",
                "message": "Hello, world!",
                "timestamp": "1970-01-01T00:00:00Z",
            })
        );
    }

    #[tokio::test]
    async fn http_reporter_queues_without_blocking() {
        let (shipper, mut rx) = Shipper::detached(4);
        let reporter = HttpReporter::new("test", shipper);

        reporter.report(ErrorEvent::error("create_activity", "boom"));

        let payload = rx.recv().await.unwrap();
        assert_eq!(payload.environment, "test");
        assert_eq!(payload.event.message, "boom");
    }
}
