//! Single activity with its replies

use chrono::Duration;

use super::{mock_data, shifted, Envelope, ServiceContext, Validator};
use crate::types::{Activity, Reply};

pub struct ShowActivity;

impl ShowActivity {
    pub fn run(ctx: &ServiceContext, activity_uuid: Option<&str>) -> Envelope<Activity> {
        ctx.run("show_activity", |now| {
            if let Some(invalid) = Validator::default()
                .require("activity_uuid", activity_uuid)
                .finish()
            {
                return Ok(invalid);
            }
            let uuid = activity_uuid.unwrap_or_default().to_string();

            let activity = mock_data(now, || {
                Ok(Activity {
                    uuid: uuid.clone(),
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
                        reply_to_activity_uuid: uuid.clone(),
                        handle: "worf".to_string(),
                        display_name: Some("Worf".to_string()),
                        message: "This post has no honor!".to_string(),
                        likes_count: 0,
                        replies_count: 0,
                        reposts_count: 0,
                        created_at: shifted(now, -Duration::days(2))?,
                    }],
                })
            })?;

            Ok(Envelope::Data(activity))
        })
    }
}
