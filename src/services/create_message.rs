//! Sending a direct message

use uuid::Uuid;

use super::{mock_data, Envelope, ServiceContext, Validator};
use crate::types::Message;

const MAX_MESSAGE_CHARS: usize = 1024;

pub struct CreateMessage;

impl CreateMessage {
    pub fn run(
        ctx: &ServiceContext,
        user_handle: Option<&str>,
        user_receiver_handle: Option<&str>,
        message: Option<&str>,
    ) -> Envelope<Message> {
        ctx.run("create_message", |now| {
            if let Some(invalid) = Validator::default()
                .require("user_handle", user_handle)
                .require("user_receiver_handle", user_receiver_handle)
                .require("message", message)
                .max_chars(message, MAX_MESSAGE_CHARS)
                .finish()
            {
                return Ok(invalid);
            }
            let sender = user_handle.unwrap_or_default();

            let created = mock_data(now, || {
                Ok(Message {
                    uuid: Uuid::new_v4().to_string(),
                    display_name: sender.to_string(),
                    handle: sender.to_string(),
                    message: message.unwrap_or_default().to_string(),
                    created_at: now,
                })
            })?;

            tracing::info!(
                uuid = %created.uuid,
                receiver = user_receiver_handle.unwrap_or_default(),
                "message created"
            );
            Ok(Envelope::Data(created))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{context, fixed_now};

    #[test]
    fn echoes_sent_message() {
        let created = CreateMessage::run(&context(), Some("greyalora"), Some("worf"), Some("hi"))
            .into_data()
            .unwrap();
        assert_eq!(created.handle, "greyalora");
        assert_eq!(created.message, "hi");
        assert_eq!(created.created_at, fixed_now());
    }

    #[test]
    fn blank_receiver_is_rejected() {
        let envelope = CreateMessage::run(&context(), Some("greyalora"), Some(""), Some("hi"));
        assert_eq!(envelope.errors(), Some(vec!["blank_user_receiver_handle"]));
        assert!(envelope.data().is_none());
    }

    #[test]
    fn blank_sender_uses_shared_code() {
        let envelope = CreateMessage::run(&context(), None, Some("worf"), Some("hi"));
        assert_eq!(envelope.errors(), Some(vec!["blank_user_handle"]));
    }
}
