//! Per-response access log line

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request},
    http::header::HeaderName,
    middleware::Next,
    response::Response,
};
use chrono::Utc;

static FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");

/// Emit one `cruddur::access` event for every response, whatever its status.
pub async fn access_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let full_path = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());
    let scheme = scheme(&req);
    let remote_addr = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "-".to_string());

    let response = next.run(req).await;

    tracing::info!(
        target: "cruddur::access",
        timestamp = %Utc::now().format("[%Y-%b-%d %H:%M]"),
        remote_addr = %remote_addr,
        method = %method,
        scheme = %scheme,
        path = %full_path,
        status = response.status().as_u16(),
        "request completed"
    );
    response
}

fn scheme(req: &Request) -> String {
    if let Some(scheme) = req.uri().scheme_str() {
        return scheme.to_string();
    }
    req.headers()
        .get(&FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| "http".to_string())
}
