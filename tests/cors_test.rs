//! CORS behaviour of the `/api` routes

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::*;

fn get_with_origin(uri: &str, origin: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("origin", origin)
        .body(Body::empty())
        .unwrap()
}

fn preflight(uri: &str, origin: &str) -> Request<Body> {
    Request::builder()
        .method("OPTIONS")
        .uri(uri)
        .header("origin", origin)
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_allowed_origins_are_echoed() {
    let app = app();

    for origin in [FRONTEND, BACKEND] {
        let response = send(&app.router, get_with_origin("/api/activities/home", origin)).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.header("access-control-allow-origin"), Some(origin));

        let exposed = response
            .header("access-control-expose-headers")
            .unwrap()
            .to_ascii_lowercase();
        assert!(exposed.contains("location"));
        assert!(exposed.contains("link"));
    }
}

#[tokio::test]
async fn test_disallowed_origin_gets_no_allow_header() {
    let app = app();
    let response = send(
        &app.router,
        get_with_origin("/api/activities/home", "https://evil.example.com"),
    )
    .await;

    // The request itself is still served; the browser enforces the policy.
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.header("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn test_preflight_for_mutation_endpoints() {
    let app = app();

    for uri in ["/api/activities", "/api/activities/abc/reply", "/api/messages"] {
        let response = send(&app.router, preflight(uri, FRONTEND)).await;

        assert!(response.status.is_success(), "{uri}: {}", response.status);
        assert_eq!(response.header("access-control-allow-origin"), Some(FRONTEND));

        let methods = response.header("access-control-allow-methods").unwrap();
        assert!(methods.contains("POST"), "{uri}: {methods}");
        let headers = response
            .header("access-control-allow-headers")
            .unwrap()
            .to_ascii_lowercase();
        assert!(headers.contains("content-type"));
    }
    assert!(app.reporter.events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_preflight_from_disallowed_origin() {
    let app = app();
    let response = send(
        &app.router,
        preflight("/api/messages", "https://evil.example.com"),
    )
    .await;

    assert!(response.header("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn test_cors_only_applies_under_api() {
    let app = app();
    let response = send(&app.router, get_with_origin("/health", FRONTEND)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.header("access-control-allow-origin").is_none());
}
