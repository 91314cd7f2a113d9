//! Core types for cruddur

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A post on the feed, optionally carrying its replies
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Activity {
    pub uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub handle: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub likes_count: u32,
    #[serde(default)]
    pub replies_count: u32,
    #[serde(default)]
    pub reposts_count: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replies: Vec<Reply>,
}

/// A reply attached to an activity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reply {
    pub uuid: String,
    pub reply_to_activity_uuid: String,
    pub handle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub message: String,
    #[serde(default)]
    pub likes_count: u32,
    #[serde(default)]
    pub replies_count: u32,
    #[serde(default)]
    pub reposts_count: u32,
    pub created_at: DateTime<Utc>,
}

/// A direct message; `handle` is the sender
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub uuid: String,
    pub display_name: String,
    pub handle: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Latest message of a conversation, keyed by the conversation partner
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageGroup {
    pub uuid: String,
    pub display_name: String,
    pub handle: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
