//! HTTP error responses and envelope translation

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::services::Envelope;

/// Request-level failure raised before any service runs
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: msg.into(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "error": self.message,
        }));
        (self.status, body).into_response()
    }
}

/// `Data` → 200 with the payload, `Invalid` → 422 with the error codes,
/// `Failed` → 500 with the fault message as a one-element list.
impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        match self {
            Envelope::Data(data) => (StatusCode::OK, Json(data)).into_response(),
            Envelope::Invalid(codes) => (StatusCode::UNPROCESSABLE_ENTITY, Json(codes)).into_response(),
            Envelope::Failed(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(vec![message])).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_status_mapping() {
        assert_eq!(Envelope::Data(1).into_response().status(), StatusCode::OK);
        assert_eq!(
            Envelope::<()>::invalid("blank_message").into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            Envelope::<()>::Failed("boom".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn api_error_keeps_status() {
        let err = ApiError::bad_request("missing field `message`");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
