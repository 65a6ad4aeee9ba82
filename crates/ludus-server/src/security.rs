//! Access control middleware.
//!
//! Two perimeter checks run on every request, in order:
//!
//! 1. IP allow-list — a request from an allowed client IP passes outright.
//! 2. Origin/Referer allow-list — otherwise the `Origin` header, or the
//!    origin of the `Referer` URL, must appear in the allowed origins.
//!
//! A request that satisfies neither is a 403. A missing or empty allow-list
//! is a configuration error surfaced as a 500 on every request rather than
//! an open gate.
//!
//! Basic auth additionally guards the login routes. Credential comparison
//! is constant-time to prevent timing attacks.

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    http::{
        StatusCode,
        header::{AUTHORIZATION, ORIGIN, REFERER, WWW_AUTHENTICATE},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use subtle::ConstantTimeEq;

use crate::envelope::{ApiResponse, error_response};
use crate::state::AppState;

/// Compare two strings in constant time.
///
/// The comparison takes the same amount of time regardless of how many
/// characters match. When lengths differ a dummy comparison keeps the
/// timing consistent.
fn constant_time_eq(a: &str, b: &str) -> bool {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    if a_bytes.len() == b_bytes.len() {
        a_bytes.ct_eq(b_bytes).into()
    } else {
        let _ = a_bytes.ct_eq(a_bytes);
        false
    }
}

fn config_error() -> Response {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

// ─────────────────────────────────────────────────────────────────────────────
// Access gate
// ─────────────────────────────────────────────────────────────────────────────

/// IP then origin/referer allow-list check.
pub async fn access_gate(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let config = state.config();

    if config.allowed_ips.is_empty() {
        tracing::error!("allowed IP list is not configured");
        return config_error();
    }

    let client_ip = addr.ip().to_string();
    if config.allowed_ips.iter().any(|ip| *ip == client_ip) {
        return next.run(request).await;
    }

    if config.allowed_origins.is_empty() {
        tracing::error!("allowed origin list is not configured");
        return config_error();
    }

    let origin = request
        .headers()
        .get(ORIGIN)
        .and_then(|v| v.to_str().ok());

    if let Some(origin) = origin
        && config.allowed_origins.iter().any(|o| o == origin)
    {
        return next.run(request).await;
    }

    let referer = request
        .headers()
        .get(REFERER)
        .and_then(|v| v.to_str().ok());

    if let Some(referer) = referer {
        match url::Url::parse(referer) {
            Ok(parsed) => {
                let referer_origin = parsed.origin().ascii_serialization();
                if config.allowed_origins.iter().any(|o| *o == referer_origin) {
                    return next.run(request).await;
                }
            }
            Err(_) => tracing::error!(%referer, "malformed referer URL"),
        }
    }

    tracing::warn!(
        ip = %client_ip,
        origin = origin.or(referer).unwrap_or("none"),
        "access denied: neither IP nor origin is allowed"
    );
    error_response(StatusCode::FORBIDDEN, "Forbidden")
}

// ─────────────────────────────────────────────────────────────────────────────
// Basic auth
// ─────────────────────────────────────────────────────────────────────────────

/// HTTP basic auth for the login routes.
pub async fn basic_auth(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(credentials) = &state.config().basic_auth else {
        tracing::error!("basic auth credentials are not configured");
        return config_error();
    };

    let presented = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Basic "))
        .and_then(|encoded| BASE64.decode(encoded).ok())
        .and_then(|decoded| String::from_utf8(decoded).ok());

    if let Some(presented) = presented
        && let Some((username, password)) = presented.split_once(':')
    {
        let user_ok = constant_time_eq(username, &credentials.username);
        let pass_ok = constant_time_eq(password, &credentials.password);
        if user_ok && pass_ok {
            return next.run(request).await;
        }
    }

    (
        StatusCode::UNAUTHORIZED,
        [(WWW_AUTHENTICATE, "Basic realm=\"ludus\"")],
        ApiResponse::error("Unauthorized"),
    )
        .into_response()
}
