//! Route handlers.

pub mod auth;
pub mod game;
pub mod health;
pub mod passthrough;
pub mod user;

use axum::http::StatusCode;
use axum::response::Response;

use crate::envelope::error_response;

/// Fallback for unknown paths.
pub async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not Found")
}
