//! Notifications feed

use chrono::Duration;

use super::{mock_data, shifted, Envelope, ServiceContext};
use crate::types::{Activity, Reply};

pub struct NotificationsActivities;

impl NotificationsActivities {
    pub fn run(ctx: &ServiceContext) -> Envelope<Vec<Activity>> {
        ctx.run("notifications_activities", |now| {
            let results = mock_data(now, || {
                Ok(vec![Activity {
                    uuid: "7ab14f3c-5b2e-4c1d-9a8e-3f6d2b1c0e94".to_string(),
                    display_name: Some("Jadzia Dax".to_string()),
                    handle: "jadzia".to_string(),
                    message: "I'm back in the quadrant!".to_string(),
                    created_at: shifted(now, -Duration::days(2))?,
                    expires_at: shifted(now, Duration::days(5))?,
                    likes_count: 5,
                    replies_count: 1,
                    reposts_count: 0,
                    replies: vec![Reply {
                        uuid: "c4d1e2f3-0a9b-4c8d-8e7f-6a5b4c3d2e1f".to_string(),
                        reply_to_activity_uuid: "7ab14f3c-5b2e-4c1d-9a8e-3f6d2b1c0e94"
                            .to_string(),
                        handle: "worf".to_string(),
                        display_name: Some("Worf".to_string()),
                        message: "Welcome back.".to_string(),
                        likes_count: 0,
                        replies_count: 0,
                        reposts_count: 0,
                        created_at: shifted(now, -Duration::days(2))?,
                    }],
                }])
            })?;

            Ok(Envelope::Data(results))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::context;

    #[test]
    fn returns_notification_feed() {
        let feed = NotificationsActivities::run(&context()).into_data().unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].replies_count as usize, feed[0].replies.len());
    }
}
