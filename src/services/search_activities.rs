//! Activity search

use chrono::Duration;

use super::{mock_data, shifted, Envelope, ServiceContext, Validator};
use crate::types::Activity;

pub struct SearchActivities;

impl SearchActivities {
    pub fn run(ctx: &ServiceContext, search_term: Option<&str>) -> Envelope<Vec<Activity>> {
        ctx.run("search_activities", |now| {
            if let Some(invalid) = Validator::default()
                .require("search_term", search_term)
                .finish()
            {
                return Ok(invalid);
            }
            let term = search_term.unwrap_or_default().trim();

            let results = mock_data(now, || {
                Ok(vec![Activity {
                    uuid: "248959df-3079-4947-b847-9e0892d1bab4".to_string(),
                    display_name: Some("Grey Alora".to_string()),
                    handle: "greyalora".to_string(),
                    message: format!("Searching the clouds for {term}"),
                    created_at: shifted(now, -Duration::hours(6))?,
                    expires_at: shifted(now, Duration::days(7))?,
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
