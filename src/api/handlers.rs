//! API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::error::ApiError;
use super::extract::{
    handle_segment, ActivityRef, CreateActivityRequest, CreateMessageRequest, CreateReplyRequest,
    CurrentUser, JsonBody, MessagesQuery, SearchQuery,
};
use crate::api::AppState;
use crate::observability::ErrorEvent;
use crate::services::{
    CreateActivity, CreateMessage, CreateReply, Envelope, HomeActivities, MessageGroups, Messages,
    NotificationsActivities, SearchActivities, ShowActivity, UserActivities,
};
use crate::types::{Activity, Message, MessageGroup, Reply};

/// Liveness check
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Push a warning through the error reporter to check the pipeline end to end
pub async fn reporter_test(State(state): State<AppState>) -> &'static str {
    state
        .reporter()
        .report(ErrorEvent::warning("reporter_test", "Hello, world!"));
    "Hello, world!"
}

/// Answer a bare `OPTIONS` without touching the service
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

pub async fn home_activities(State(state): State<AppState>) -> Envelope<Vec<Activity>> {
    HomeActivities::run(&state.services)
}

pub async fn notifications_activities(State(state): State<AppState>) -> Envelope<Vec<Activity>> {
    NotificationsActivities::run(&state.services)
}

pub async fn search_activities(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Envelope<Vec<Activity>> {
    SearchActivities::run(&state.services, query.term.as_deref())
}

/// `/api/activities/@{handle}` lists a user's activities, any other segment shows one activity
pub async fn activity(State(state): State<AppState>, Path(segment): Path<String>) -> Response {
    match ActivityRef::parse(&segment) {
        ActivityRef::Handle(handle) => {
            UserActivities::run(&state.services, Some(&handle)).into_response()
        }
        ActivityRef::Id(activity_uuid) => {
            ShowActivity::run(&state.services, Some(&activity_uuid)).into_response()
        }
    }
}

pub async fn create_activity(
    State(state): State<AppState>,
    CurrentUser(user_handle): CurrentUser,
    JsonBody(payload): JsonBody<CreateActivityRequest>,
) -> Envelope<Activity> {
    let ttl = payload.ttl.as_text();
    CreateActivity::run(
        &state.services,
        Some(&user_handle),
        Some(&payload.message),
        Some(&ttl),
    )
}

pub async fn create_reply(
    State(state): State<AppState>,
    CurrentUser(user_handle): CurrentUser,
    Path(activity_uuid): Path<String>,
    JsonBody(payload): JsonBody<CreateReplyRequest>,
) -> Envelope<Reply> {
    CreateReply::run(
        &state.services,
        Some(&user_handle),
        Some(&activity_uuid),
        Some(&payload.message),
    )
}

pub async fn message_groups(
    State(state): State<AppState>,
    CurrentUser(user_handle): CurrentUser,
) -> Envelope<Vec<MessageGroup>> {
    MessageGroups::run(&state.services, Some(&user_handle))
}

/// Conversation with `@{handle}`; `user_receiver_handle` in the query takes precedence
pub async fn messages(
    State(state): State<AppState>,
    CurrentUser(user_handle): CurrentUser,
    Path(segment): Path<String>,
    Query(query): Query<MessagesQuery>,
) -> Result<Envelope<Vec<Message>>, ApiError> {
    let handle = handle_segment(&segment)
        .ok_or_else(|| ApiError::not_found("message handles must start with '@'"))?;
    let receiver = query
        .user_receiver_handle
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| handle.to_string());

    Ok(Messages::run(
        &state.services,
        Some(&user_handle),
        Some(&receiver),
    ))
}

pub async fn create_message(
    State(state): State<AppState>,
    CurrentUser(user_handle): CurrentUser,
    JsonBody(payload): JsonBody<CreateMessageRequest>,
) -> Envelope<Message> {
    CreateMessage::run(
        &state.services,
        Some(&user_handle),
        Some(&payload.user_receiver_handle),
        Some(&payload.message),
    )
}
