//! Activities posted by a single user

use chrono::Duration;

use super::{mock_data, shifted, Envelope, ServiceContext, Validator};
use crate::types::Activity;

pub struct UserActivities;

impl UserActivities {
    pub fn run(ctx: &ServiceContext, user_handle: Option<&str>) -> Envelope<Vec<Activity>> {
        ctx.run("user_activities", |now| {
            if let Some(invalid) = Validator::default()
                .require("user_handle", user_handle)
                .finish()
            {
                return Ok(invalid);
            }

            let results = mock_data(now, || {
                Ok(vec![Activity {
                    uuid: "248959df-3079-4947-b847-9e0892d1bab4".to_string(),
                    display_name: None,
                    handle: "Grey Alora".to_string(),
                    message: "Cloud is fun!".to_string(),
                    created_at: shifted(now, -Duration::days(1))?,
                    expires_at: shifted(now, Duration::days(31))?,
                    likes_count: 0,
                    replies_count: 0,
                    reposts_count: 0,
                    replies: Vec::new(),
                }])
            })?;

            Ok(Envelope::Data(results))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{context, context_at, fixed_now};
    use chrono::{DateTime, Utc};

    #[test]
    fn blank_handle_is_rejected() {
        let ctx = context();
        for handle in [None, Some("")] {
            let envelope = UserActivities::run(&ctx, handle);
            assert_eq!(envelope.errors(), Some(vec!["blank_user_handle"]));
            assert!(envelope.data().is_none());
        }
    }

    #[test]
    fn returns_one_activity_for_handle() {
        let envelope = UserActivities::run(&context(), Some("greyalora"));
        let activities = envelope.into_data().unwrap();

        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].handle, "Grey Alora");
        assert_eq!(activities[0].created_at, fixed_now() - Duration::days(1));
        assert_eq!(activities[0].expires_at, fixed_now() + Duration::days(31));
    }

    #[test]
    fn timestamp_overflow_surfaces_as_failure() {
        let (ctx, reporter) = context_at(DateTime::<Utc>::MAX_UTC);
        let envelope = UserActivities::run(&ctx, Some("greyalora"));

        assert!(matches!(envelope, Envelope::Failed(_)));
        assert_eq!(reporter.events.lock().unwrap().len(), 1);
    }
}
