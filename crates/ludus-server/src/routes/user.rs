//! Authenticated-user route.

use axum::extract::State;

use crate::envelope::ApiResponse;
use crate::error::{Result, ServerError};
use crate::state::AppState;

/// `GET /me` — profile of the user the current token belongs to.
pub async fn me(State(state): State<AppState>) -> Result<ApiResponse> {
    if state.tokens.access_token().await.is_none() {
        return Err(ServerError::Unauthenticated);
    }

    let info = state
        .chzzk
        .user()
        .me()
        .await
        .map_err(|e| ServerError::from_client(e, "Failed to fetch user info."))?;

    Ok(ApiResponse::ok(info))
}
