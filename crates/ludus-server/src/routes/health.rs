//! Liveness routes.

use axum::Json;
use serde_json::{Value, json};

/// `GET /` — plain liveness probe.
pub async fn root() -> Json<&'static str> {
    Json("Hello, world!")
}

/// `GET /health` — status and version.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
