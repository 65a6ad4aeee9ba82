//! Pass-through routes: upstream payloads forwarded verbatim inside the
//! envelope.

use axum::extract::{Query, State};

use crate::envelope::ApiResponse;
use crate::error::{Result, ServerError};
use crate::state::AppState;

/// `GET /chat/settings` — current chat settings.
pub async fn chat_settings(State(state): State<AppState>) -> Result<ApiResponse> {
    let settings = state
        .chzzk
        .chat()
        .settings()
        .await
        .map_err(|e| ServerError::from_client(e, "Failed to fetch chat settings."))?;

    Ok(ApiResponse::ok(settings))
}

/// `GET /drops/reward-claims` — reward claims, query parameters forwarded
/// as `page.*` filters.
pub async fn drops_reward_claims(
    State(state): State<AppState>,
    Query(filters): Query<Vec<(String, String)>>,
) -> Result<ApiResponse> {
    let claims = state
        .chzzk
        .drops()
        .reward_claims(&filters)
        .await
        .map_err(|e| ServerError::from_client(e, "Failed to fetch reward claims."))?;

    Ok(ApiResponse::ok(claims))
}
