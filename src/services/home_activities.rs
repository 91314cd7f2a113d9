//! Home feed

use chrono::Duration;

use super::{mock_data, shifted, Envelope, ServiceContext};
use crate::types::{Activity, Reply};

pub struct HomeActivities;

impl HomeActivities {
    pub fn run(ctx: &ServiceContext) -> Envelope<Vec<Activity>> {
        ctx.run("home_activities", |now| {
            let results = mock_data(now, || {
                Ok(vec![
                    Activity {
                        uuid: "68f126b0-1ceb-4a33-88be-d90fa7109eee".to_string(),
                        display_name: Some("Grey Alora".to_string()),
                        handle: "greyalora".to_string(),
                        message: "Cloud is fun!".to_string(),
                        created_at: shifted(now, -Duration::days(2))?,
                        expires_at: shifted(now, Duration::days(5))?,
                        likes_count: 5,
                        replies_count: 1,
                        reposts_count: 0,
                        replies: vec![Reply {
                            uuid: "26e12864-1c26-5c3a-9658-97a10f8fea67".to_string(),
                            reply_to_activity_uuid: "68f126b0-1ceb-4a33-88be-d90fa7109eee"
                                .to_string(),
                            handle: "worf".to_string(),
                            display_name: Some("Worf".to_string()),
                            message: "This post has no honor!".to_string(),
                            likes_count: 0,
                            replies_count: 0,
                            reposts_count: 0,
                            created_at: shifted(now, -Duration::days(2))?,
                        }],
                    },
                    Activity {
                        uuid: "66e12864-8c26-4c3a-9658-95a10f8fea67".to_string(),
                        display_name: Some("Worf".to_string()),
                        handle: "worf".to_string(),
                        message: "I am out of prune juice".to_string(),
                        created_at: shifted(now, -Duration::days(7))?,
                        expires_at: shifted(now, Duration::days(9))?,
                        likes_count: 0,
                        replies_count: 0,
                        reposts_count: 0,
                        replies: Vec::new(),
                    },
                    Activity {
                        uuid: "248959df-3079-4947-b847-9e0892d1bab4".to_string(),
                        display_name: Some("Garek".to_string()),
                        handle: "garek".to_string(),
                        message: "My dear doctor, I am just a simple tailor".to_string(),
                        created_at: shifted(now, -Duration::hours(1))?,
                        expires_at: shifted(now, Duration::hours(12))?,
                        likes_count: 0,
                        replies_count: 0,
                        reposts_count: 0,
                        replies: Vec::new(),
                    },
                ])
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
    fn feed_is_deterministic_for_a_fixed_clock() {
        let ctx = context();
        let first = HomeActivities::run(&ctx);
        let second = HomeActivities::run(&ctx);

        assert_eq!(first, second);
        let feed = first.into_data().unwrap();
        assert_eq!(feed.len(), 3);
        assert_eq!(feed[0].replies.len(), 1);
        assert_eq!(feed[0].replies[0].reply_to_activity_uuid, feed[0].uuid);
    }
}
