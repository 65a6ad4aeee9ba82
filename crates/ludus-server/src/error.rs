//! Server error types and their envelope mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::envelope::error_response;

/// Server result type.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Server error type.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Request parameters failed validation.
    #[error("{0}")]
    BadRequest(String),

    /// No access token is held; the caller must authenticate first.
    #[error("access token is missing")]
    Unauthenticated,

    /// The upstream call failed. The public message stays generic; the
    /// underlying cause is logged where the error is raised.
    #[error("{0}")]
    Upstream(String),

    /// Internal failure.
    #[error("{0}")]
    Internal(String),
}

impl ServerError {
    /// Classify a client-crate error for a given operation. Auth lifecycle
    /// failures that mean "no usable token" map to 401; everything else is
    /// an opaque upstream failure with `message` as the public text.
    pub fn from_client(err: ludus_client::Error, message: &str) -> Self {
        match err {
            ludus_client::Error::Auth(ludus_oauth::OAuthError::MissingAccessToken) => {
                ServerError::Unauthenticated
            }
            other => {
                tracing::error!(error = %other, "upstream request failed");
                ServerError::Upstream(message.to_string())
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ServerError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ServerError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "Access token is missing. Authenticate again.".to_string(),
            ),
            ServerError::Upstream(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
            ServerError::Internal(message) => {
                tracing::error!(%message, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        error_response(status, message)
    }
}
