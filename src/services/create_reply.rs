//! Replying to an activity

use uuid::Uuid;

use super::{mock_data, Envelope, ServiceContext, Validator};
use crate::types::Reply;

const MAX_MESSAGE_CHARS: usize = 1024;

pub struct CreateReply;

impl CreateReply {
    pub fn run(
        ctx: &ServiceContext,
        user_handle: Option<&str>,
        activity_uuid: Option<&str>,
        message: Option<&str>,
    ) -> Envelope<Reply> {
        ctx.run("create_reply", |now| {
            if let Some(invalid) = Validator::default()
                .require("user_handle", user_handle)
                .require("activity_uuid", activity_uuid)
                .require("message", message)
                .max_chars(message, MAX_MESSAGE_CHARS)
                .finish()
            {
                return Ok(invalid);
            }

            let handle = user_handle.unwrap_or_default();
            let reply = mock_data(now, || {
                Ok(Reply {
                    uuid: Uuid::new_v4().to_string(),
                    reply_to_activity_uuid: activity_uuid.unwrap_or_default().to_string(),
                    handle: handle.to_string(),
                    display_name: Some(handle.to_string()),
                    message: message.unwrap_or_default().to_string(),
                    likes_count: 0,
                    replies_count: 0,
                    reposts_count: 0,
                    created_at: now,
                })
            })?;

            Ok(Envelope::Data(reply))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::context;

    #[test]
    fn reply_points_at_its_activity() {
        let reply = CreateReply::run(
            &context(),
            Some("greyalora"),
            Some("68f126b0-1ceb-4a33-88be-d90fa7109eee"),
            Some("agreed"),
        )
        .into_data()
        .unwrap();

        assert_eq!(reply.reply_to_activity_uuid, "68f126b0-1ceb-4a33-88be-d90fa7109eee");
        assert_eq!(reply.message, "agreed");
    }

    #[test]
    fn blank_fields_are_rejected() {
        let envelope = CreateReply::run(&context(), Some("greyalora"), Some(""), None);
        assert_eq!(
            envelope.errors(),
            Some(vec!["blank_activity_uuid", "blank_message"])
        );
    }
}
