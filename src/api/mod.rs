//! HTTP API server

use std::any::Any;

use axum::{
    body::Body,
    http::Request,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::Span;
use uuid::Uuid;

use crate::observability::{access_log, panic_response};

pub mod cors;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

/// Build the API router using the provided application state
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/activities/home", get(handlers::home_activities))
        .route(
            "/activities/notifications",
            get(handlers::notifications_activities),
        )
        .route("/activities/search", get(handlers::search_activities))
        .route(
            "/activities",
            post(handlers::create_activity).options(handlers::preflight),
        )
        .route("/activities/:activity", get(handlers::activity))
        .route(
            "/activities/:activity/reply",
            post(handlers::create_reply).options(handlers::preflight),
        )
        .route("/message_groups", get(handlers::message_groups))
        .route("/messages/:handle", get(handlers::messages))
        .route(
            "/messages",
            post(handlers::create_message).options(handlers::preflight),
        )
        .layer(state.cors.clone());

    let reporter = state.reporter().clone();

    Router::new()
        .route("/health", get(handlers::health))
        .route("/reporter/test", get(handlers::reporter_test))
        .nest("/api", api)
        .with_state(state)
        .layer(CatchPanicLayer::custom(
            move |payload: Box<dyn Any + Send + 'static>| panic_response(reporter.as_ref(), payload),
        ))
        .layer(middleware::from_fn(access_log))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
}

/// Root span for one inbound request; service spans nest underneath.
fn request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        trace_id = %Uuid::new_v4(),
    )
}
