//! The `{ok, message, data}` response envelope.
//!
//! Every JSON response from this server, success or failure, is wrapped in
//! this shape. `message` is `null` on success; `data` is `null` when there
//! is nothing to return. Fields always serialize, never skip.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;

/// Response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T = Value> {
    pub ok: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Success with a payload.
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            message: None,
            data: Some(data),
        }
    }
}

impl ApiResponse<Value> {
    /// Success with no payload.
    pub fn ok_empty() -> Self {
        Self {
            ok: true,
            message: None,
            data: None,
        }
    }

    /// Failure with a message and no payload.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Build an enveloped error response with an explicit status.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, ApiResponse::error(message)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_serializes_null_message() {
        let body = serde_json::to_value(ApiResponse::ok(serde_json::json!({"a": 1}))).unwrap();
        assert_eq!(body, serde_json::json!({"ok": true, "message": null, "data": {"a": 1}}));
    }

    #[test]
    fn error_serializes_null_data() {
        let body = serde_json::to_value(ApiResponse::error("nope")).unwrap();
        assert_eq!(body, serde_json::json!({"ok": false, "message": "nope", "data": null}));
    }
}
