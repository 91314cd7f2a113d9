//! Posting a new activity

use chrono::Duration;
use uuid::Uuid;

use super::{mock_data, shifted, Envelope, ServiceContext, Validator};
use crate::types::Activity;

const MAX_MESSAGE_CHARS: usize = 280;
const MAX_TTL_DAYS: u32 = 365;

/// How long an activity stays visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    Days(u32),
    Hours(u32),
}

impl Ttl {
    /// Parse the named presets (`7-days`, `12-hours`, ...) or a bare number of
    /// days between 1 and 365.
    pub fn parse(raw: &str) -> Option<Self> {
        let ttl = match raw.trim() {
            "30-days" => Ttl::Days(30),
            "7-days" => Ttl::Days(7),
            "3-days" => Ttl::Days(3),
            "1-day" => Ttl::Days(1),
            "12-hours" => Ttl::Hours(12),
            "3-hours" => Ttl::Hours(3),
            "1-hour" => Ttl::Hours(1),
            other => match other.parse::<u32>() {
                Ok(days) if (1..=MAX_TTL_DAYS).contains(&days) => Ttl::Days(days),
                _ => return None,
            },
        };
        Some(ttl)
    }

    pub fn duration(self) -> Duration {
        match self {
            Ttl::Days(days) => Duration::days(i64::from(days)),
            Ttl::Hours(hours) => Duration::hours(i64::from(hours)),
        }
    }
}

pub struct CreateActivity;

impl CreateActivity {
    pub fn run(
        ctx: &ServiceContext,
        user_handle: Option<&str>,
        message: Option<&str>,
        ttl: Option<&str>,
    ) -> Envelope<Activity> {
        ctx.run("create_activity", |now| {
            let mut validator = Validator::default();
            validator
                .require("user_handle", user_handle)
                .require("message", message)
                .max_chars(message, MAX_MESSAGE_CHARS);

            // The ttl check comes last so its code trails the others.
            let parsed_ttl = match ttl.map(str::trim).filter(|raw| !raw.is_empty()) {
                Some(raw) => Ttl::parse(raw).ok_or("invalid_ttl"),
                None => Err("blank_ttl"),
            };

            let ttl = match (parsed_ttl, validator.finish()) {
                (Ok(ttl), None) => ttl,
                (Ok(_), Some(invalid)) => return Ok(invalid),
                (Err(code), Some(Envelope::Invalid(mut codes))) => {
                    codes.push(code.to_string());
                    return Ok(Envelope::Invalid(codes));
                }
                (Err(code), _) => return Ok(Envelope::invalid(code)),
            };
            let handle = user_handle.unwrap_or_default();
            let message = message.unwrap_or_default();

            let activity = mock_data(now, || {
                Ok(Activity {
                    uuid: Uuid::new_v4().to_string(),
                    display_name: Some(handle.to_string()),
                    handle: handle.to_string(),
                    message: message.to_string(),
                    created_at: now,
                    expires_at: shifted(now, ttl.duration())?,
                    likes_count: 0,
                    replies_count: 0,
                    reposts_count: 0,
                    replies: Vec::new(),
                })
            })?;

            tracing::info!(uuid = %activity.uuid, ?ttl, "activity created");
            Ok(Envelope::Data(activity))
        })
    }
}
