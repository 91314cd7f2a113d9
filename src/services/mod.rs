//! Feature services
//!
//! Every service exposes a single `run` operation that takes plain arguments
//! and returns an [`Envelope`]. Services are synchronous and hold no state;
//! the clock and the error reporter are injected through [`ServiceContext`].
//!
//! A service body runs inside a `service` span. Validation failures come back
//! as [`Envelope::Invalid`]; any [`crate::Error`] escaping the body is reported
//! and converted to [`Envelope::Failed`] so callers never see a raw fault.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::field::Empty;

use crate::observability::reporter::{ErrorEvent, ErrorReporter};
use crate::types::{Activity, Message, MessageGroup, Reply};
use crate::{Error, Result};

pub mod envelope;

pub mod create_activity;
pub mod create_message;
pub mod create_reply;
pub mod home_activities;
pub mod message_groups;
pub mod messages;
pub mod notifications_activities;
pub mod search_activities;
pub mod show_activity;
pub mod user_activities;

pub use create_activity::{CreateActivity, Ttl};
pub use create_message::CreateMessage;
pub use create_reply::CreateReply;
pub use envelope::Envelope;
pub use home_activities::HomeActivities;
pub use message_groups::MessageGroups;
pub use messages::Messages;
pub use notifications_activities::NotificationsActivities;
pub use search_activities::SearchActivities;
pub use show_activity::ShowActivity;
pub use user_activities::UserActivities;

/// Source of the current instant
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Collaborators shared by all services
#[derive(Clone)]
pub struct ServiceContext {
    clock: Arc<dyn Clock>,
    reporter: Arc<dyn ErrorReporter>,
}

impl ServiceContext {
    pub fn new(clock: Arc<dyn Clock>, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self { clock, reporter }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn reporter(&self) -> &Arc<dyn ErrorReporter> {
        &self.reporter
    }

    /// Run a service body under a scoped span, turning faults into envelopes.
    pub(crate) fn run<T>(
        &self,
        operation: &'static str,
        body: impl FnOnce(DateTime<Utc>) -> Result<Envelope<T>>,
    ) -> Envelope<T> {
        let span = tracing::info_span!("service", operation);
        let _entered = span.enter();

        match body(self.now()) {
            Ok(Envelope::Invalid(codes)) => {
                tracing::debug!(?codes, "validation failed");
                Envelope::Invalid(codes)
            }
            Ok(envelope) => envelope,
            Err(err) => {
                let message = err.to_string();
                tracing::error!(error = %message, "service fault");
                self.reporter.report(ErrorEvent::error(operation, message.clone()));
                Envelope::Failed(message)
            }
        }
    }
}

/// Number of results a payload carries, for span metadata
pub(crate) trait ResultSize {
    fn result_size(&self) -> usize;
}

impl<T> ResultSize for Vec<T> {
    fn result_size(&self) -> usize {
        self.len()
    }
}

macro_rules! single_result {
    ($($ty:ty),*) => {
        $(impl ResultSize for $ty {
            fn result_size(&self) -> usize {
                1
            }
        })*
    };
}

single_result!(Activity, Reply, Message, MessageGroup);

/// Build mock results inside a `mock-data` span tagged with `now` and the result size.
pub(crate) fn mock_data<T: ResultSize>(
    now: DateTime<Utc>,
    build: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let span = tracing::info_span!("mock-data", now = %now.to_rfc3339(), results_size = Empty);
    span.in_scope(|| {
        let results = build()?;
        span.record("results_size", results.result_size() as u64);
        Ok(results)
    })
}

/// `now` shifted by `delta`, failing instead of overflowing.
pub(crate) fn shifted(now: DateTime<Utc>, delta: Duration) -> Result<DateTime<Utc>> {
    now.checked_add_signed(delta)
        .ok_or(Error::TimestampOverflow { base: now, delta })
}

pub(crate) fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Collects validation codes in the order checks are made.
#[derive(Debug, Default)]
pub(crate) struct Validator {
    codes: Vec<String>,
}

impl Validator {
    /// Flag `blank_<field>` when the value is missing or empty.
    pub fn require(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if is_blank(value) {
            self.codes.push(format!("blank_{field}"));
        }
        self
    }

    pub fn max_chars(&mut self, value: Option<&str>, max: usize) -> &mut Self {
        if value.is_some_and(|v| v.chars().count() > max) {
            self.codes.push("message_exceed_max_chars".to_string());
        }
        self
    }

    pub fn reject(&mut self, code: impl Into<String>) -> &mut Self {
        self.codes.push(code.into());
        self
    }

    pub fn finish<T>(&mut self) -> Option<Envelope<T>> {
        if self.codes.is_empty() {
            None
        } else {
            Some(Envelope::Invalid(std::mem::take(&mut self.codes)))
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn validator_keeps_check_order() {
        let mut v = Validator::default();
        v.require("user_handle", None)
            .require("message", Some("  "))
            .max_chars(Some("abcd"), 3);
        let envelope: Envelope<()> = v.finish().unwrap();
        assert_eq!(
            envelope.errors(),
            Some(vec!["blank_user_handle", "blank_message", "message_exceed_max_chars"])
        );
    }

    #[test]
    fn validator_passes_when_nothing_flagged() {
        let mut v = Validator::default();
        v.require("user_handle", Some("greyalora"));
        assert!(v.finish::<()>().is_none());
    }

    #[test]
    fn faults_are_reported_and_enveloped() {
        let (ctx, reporter) = context_at(fixed_now());
        let envelope: Envelope<()> =
            ctx.run("broken", |_| Err(Error::internal("mock store unavailable")));

        assert_eq!(
            envelope,
            Envelope::Failed("Internal error: mock store unavailable".to_string())
        );
        let events = reporter.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "broken");
    }

    #[test]
    fn shifted_rejects_overflow() {
        assert!(shifted(DateTime::<Utc>::MAX_UTC, Duration::days(1)).is_err());
        assert!(shifted(fixed_now(), Duration::days(1)).is_ok());
    }
}
