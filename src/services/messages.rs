//! Messages exchanged with one conversation partner

use chrono::Duration;

use super::{mock_data, shifted, Envelope, ServiceContext, Validator};
use crate::types::Message;

pub struct Messages;

impl Messages {
    pub fn run(
        ctx: &ServiceContext,
        user_handle: Option<&str>,
        user_receiver_handle: Option<&str>,
    ) -> Envelope<Vec<Message>> {
        ctx.run("messages", |now| {
            if let Some(invalid) = Validator::default()
                .require("user_handle", user_handle)
                .require("user_receiver_handle", user_receiver_handle)
                .finish()
            {
                return Ok(invalid);
            }
            let sender = user_handle.unwrap_or_default();
            let receiver = user_receiver_handle.unwrap_or_default();

            let messages = mock_data(now, || {
                Ok(vec![
                    Message {
                        uuid: "4e81c06a-db0f-4281-b4cc-98208537772a".to_string(),
                        display_name: receiver.to_string(),
                        handle: receiver.to_string(),
                        message: "Cloud is fun!".to_string(),
                        created_at: shifted(now, -Duration::days(1))?,
                    },
                    Message {
                        uuid: "66e12864-8c26-4c3a-9658-95a10f8fea67".to_string(),
                        display_name: sender.to_string(),
                        handle: sender.to_string(),
                        message: "This platform is great!".to_string(),
                        created_at: shifted(now, -Duration::hours(20))?,
                    },
                ])
            })?;

            Ok(Envelope::Data(messages))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::context;

    #[test]
    fn conversation_includes_both_sides() {
        let messages = Messages::run(&context(), Some("greyalora"), Some("worf"))
            .into_data()
            .unwrap();
        let handles: Vec<_> = messages.iter().map(|m| m.handle.as_str()).collect();
        assert_eq!(handles, vec!["worf", "greyalora"]);
    }

    #[test]
    fn blank_receiver_is_rejected() {
        let envelope = Messages::run(&context(), Some("greyalora"), None);
        assert_eq!(envelope.errors(), Some(vec!["blank_user_receiver_handle"]));
    }
}
