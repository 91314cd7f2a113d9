//! Span export
//!
//! [`SpanExportLayer`] times every span emitted by this crate and, when the span
//! closes, queues a [`SpanRecord`] on a [`Shipper`] bound for the tracing
//! collector. Child spans inherit the `trace_id` of the request span they run
//! under, so a collector can reassemble one request's segments.

use std::fmt;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::Subscriber;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use super::shipper::Shipper;

/// One closed span as sent to the collector
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SpanRecord {
    pub service: String,
    pub host: String,
    pub name: &'static str,
    pub target: String,
    pub trace_id: Option<String>,
    pub parent: Option<&'static str>,
    pub started_at: DateTime<Utc>,
    pub duration_ms: f64,
    pub fields: Map<String, Value>,
}

struct Timing {
    started: Instant,
    started_at: DateTime<Utc>,
    fields: Map<String, Value>,
}

pub struct SpanExportLayer {
    service: String,
    host: String,
    target_prefix: &'static str,
    shipper: Shipper<SpanRecord>,
}

impl SpanExportLayer {
    pub fn new(service: impl Into<String>, host: impl Into<String>, shipper: Shipper<SpanRecord>) -> Self {
        Self {
            service: service.into(),
            host: host.into(),
            target_prefix: env!("CARGO_CRATE_NAME"),
            shipper,
        }
    }
}

impl<S> Layer<S> for SpanExportLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        if !attrs.metadata().target().starts_with(self.target_prefix) {
            return;
        }
        let Some(span) = ctx.span(id) else {
            return;
        };

        let mut fields = Map::new();
        attrs.record(&mut JsonVisitor(&mut fields));
        span.extensions_mut().insert(Timing {
            started: Instant::now(),
            started_at: Utc::now(),
            fields,
        });
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut extensions = span.extensions_mut();
        if let Some(timing) = extensions.get_mut::<Timing>() {
            values.record(&mut JsonVisitor(&mut timing.fields));
        }
    }

    fn on_close(&self, id: Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(&id) else {
            return;
        };

        // Nearest trace id walking outwards from this span.
        let trace_id = span.scope().find_map(|s| {
            let extensions = s.extensions();
            let trace_id = extensions
                .get::<Timing>()
                .and_then(|t| t.fields.get("trace_id"))
                .and_then(Value::as_str)
                .map(str::to_owned);
            trace_id
        });

        let Some(timing) = span.extensions_mut().remove::<Timing>() else {
            return;
        };

        let record = SpanRecord {
            service: self.service.clone(),
            host: self.host.clone(),
            name: span.name(),
            target: span.metadata().target().to_string(),
            trace_id,
            parent: span.parent().map(|p| p.name()),
            started_at: timing.started_at,
            duration_ms: timing.started.elapsed().as_secs_f64() * 1000.0,
            fields: timing.fields,
        };
        self.shipper.send(record);
    }
}

struct JsonVisitor<'a>(&'a mut Map<String, Value>);

impl Visit for JsonVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.0.insert(field.name().to_string(), Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.0.insert(field.name().to_string(), Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.0.insert(field.name().to_string(), Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0
            .insert(field.name().to_string(), Value::from(format!("{value:?}")));
    }
}
