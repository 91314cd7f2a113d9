//! Shared helpers for the HTTP integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use chrono::{DateTime, TimeZone, Utc};
use cruddur::api::{cors::build_cors_layer, create_router, AppState};
use cruddur::auth::StaticIdentity;
use cruddur::config::AppConfig;
use cruddur::observability::{ErrorEvent, ErrorReporter};
use cruddur::services::{Clock, FixedClock, ServiceContext};
use http_body_util::BodyExt;
use tower::ServiceExt; // for oneshot

pub const FRONTEND: &str = "http://localhost:3000";
pub const BACKEND: &str = "http://localhost:4567";

#[derive(Default)]
pub struct RecordingReporter {
    pub events: Mutex<Vec<ErrorEvent>>,
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, event: ErrorEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.cors.frontend_url = Some(FRONTEND.to_string());
    config.cors.backend_url = Some(format!("{BACKEND}/"));
    config
}

pub struct TestApp {
    pub router: Router,
    pub reporter: Arc<RecordingReporter>,
}

pub fn app() -> TestApp {
    app_with_clock(Arc::new(FixedClock(fixed_now())))
}

pub fn app_with_clock(clock: Arc<dyn Clock>) -> TestApp {
    let config = test_config();
    let reporter = Arc::new(RecordingReporter::default());
    let services = ServiceContext::new(clock, reporter.clone());
    let state = AppState::new(
        services,
        Arc::new(StaticIdentity::new(config.auth.default_handle.clone())),
        build_cors_layer(&config).unwrap(),
    );

    TestApp {
        router: create_router(state),
        reporter,
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|err| {
            panic!(
                "body is not JSON ({err}): {}",
                String::from_utf8_lossy(&self.body)
            )
        })
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

pub async fn send(router: &Router, request: Request<Body>) -> TestResponse {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
