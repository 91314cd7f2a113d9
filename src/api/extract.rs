//! Request extractors

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};

use super::error::ApiError;
use super::state::AppState;

/// Handle of the user making the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub String);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        state
            .identity
            .current_user(parts)
            .await
            .map(CurrentUser)
            .ok_or_else(|| ApiError::unauthorized("unable to identify the current user"))
    }
}

/// JSON body whose rejections (malformed JSON, missing or mistyped fields,
/// wrong content type) are answered with 400 before a handler runs.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// The `{activity}` segment under `/api/activities/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityRef {
    /// `@handle`, possibly empty
    Handle(String),
    /// Any other identifier
    Id(String),
}

impl ActivityRef {
    pub fn parse(segment: &str) -> Self {
        match segment.strip_prefix('@') {
            Some(handle) => ActivityRef::Handle(handle.to_string()),
            None => ActivityRef::Id(segment.to_string()),
        }
    }
}

/// Strip the `@` from a handle segment; `None` when the prefix is missing.
pub fn handle_segment(segment: &str) -> Option<&str> {
    segment.strip_prefix('@')
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    pub term: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessagesQuery {
    #[serde(alias = "user_reciever_handle")]
    pub user_receiver_handle: Option<String>,
}

/// Lifetime of a new activity: a preset name (`"7-days"`) or a number of days
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum TtlField {
    Text(String),
    Days(u64),
}

impl TtlField {
    pub fn as_text(&self) -> String {
        match self {
            TtlField::Text(text) => text.clone(),
            TtlField::Days(days) => days.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateActivityRequest {
    pub message: String,
    pub ttl: TtlField,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateReplyRequest {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMessageRequest {
    pub user_receiver_handle: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_segments() {
        assert_eq!(ActivityRef::parse("@greyalora"), ActivityRef::Handle("greyalora".into()));
        assert_eq!(ActivityRef::parse("@"), ActivityRef::Handle(String::new()));
        assert_eq!(ActivityRef::parse("abc-123"), ActivityRef::Id("abc-123".into()));
    }

    #[test]
    fn ttl_accepts_text_or_number() {
        let text: CreateActivityRequest =
            serde_json::from_str(r#"{"message":"hello","ttl":"7"}"#).unwrap();
        assert_eq!(text.ttl.as_text(), "7");

        let number: CreateActivityRequest =
            serde_json::from_str(r#"{"message":"hello","ttl":3}"#).unwrap();
        assert_eq!(number.ttl, TtlField::Days(3));
    }

    #[test]
    fn misspelled_receiver_query_is_accepted() {
        let query: MessagesQuery =
            serde_json::from_str(r#"{"user_reciever_handle":"worf"}"#).unwrap();
        assert_eq!(query.user_receiver_handle.as_deref(), Some("worf"));
    }
}
