//! Conversation list for the current user

use chrono::Duration;

use super::{mock_data, shifted, Envelope, ServiceContext, Validator};
use crate::types::MessageGroup;

pub struct MessageGroups;

impl MessageGroups {
    pub fn run(ctx: &ServiceContext, user_handle: Option<&str>) -> Envelope<Vec<MessageGroup>> {
        ctx.run("message_groups", |now| {
            if let Some(invalid) = Validator::default()
                .require("user_handle", user_handle)
                .finish()
            {
                return Ok(invalid);
            }

            let groups = mock_data(now, || {
                Ok(vec![
                    MessageGroup {
                        uuid: "24b95582-9e7b-4e0a-9ad1-639773ab7552".to_string(),
                        display_name: "Worf".to_string(),
                        handle: "worf".to_string(),
                        message: "This is a message from Worf".to_string(),
                        created_at: shifted(now, -Duration::days(1))?,
                    },
                    MessageGroup {
                        uuid: "417c360e-c4e6-4fce-873b-d2d71469b4ac".to_string(),
                        display_name: "Garek".to_string(),
                        handle: "garek".to_string(),
                        message: "My dear doctor, I am just a simple tailor".to_string(),
                        created_at: shifted(now, -Duration::days(2))?,
                    },
                ])
            })?;

            Ok(Envelope::Data(groups))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::services::test_support::context;

    #[test]
    fn lists_groups_newest_first() {
        let groups = MessageGroups::run(&context(), Some("greyalora"))
            .into_data()
            .unwrap();
        assert_eq!(groups.len(), 2);
        assert!(groups[0].created_at > groups[1].created_at);

        let partners: HashSet<_> = groups.iter().map(|g| g.handle.as_str()).collect();
        assert_eq!(partners.len(), groups.len(), "one group per conversation partner");
    }

    #[test]
    fn blank_handle_is_rejected() {
        let envelope = MessageGroups::run(&context(), Some(""));
        assert_eq!(envelope.errors(), Some(vec!["blank_user_handle"]));
    }
}
