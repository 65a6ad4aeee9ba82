//! OAuth login and callback routes.

use axum::extract::{Query, State};
use axum::response::Redirect;
use rand::Rng;
use rand::distr::Alphanumeric;
use serde::Deserialize;

use crate::envelope::ApiResponse;
use crate::error::{Result, ServerError};
use crate::state::AppState;

/// `GET /auth/login` — redirect to the upstream consent page with a fresh
/// random state value.
pub async fn login(State(state): State<AppState>) -> Redirect {
    let oauth_state: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(13)
        .map(char::from)
        .collect();

    let url = state
        .tokens
        .authorization_url(&state.config().redirect_uri, &oauth_state);

    Redirect::temporary(&url)
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: String,
    #[serde(default)]
    state: String,
}

/// `GET /auth/callback` — exchange the authorization code for tokens.
pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Result<ApiResponse> {
    if params.code.is_empty() || params.state.is_empty() {
        return Err(ServerError::BadRequest(
            "code and state are required".to_string(),
        ));
    }

    let record = state
        .tokens
        .exchange_code(&params.code, &params.state)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "authorization code exchange failed");
            ServerError::Upstream("Token issuance failed.".to_string())
        })?;

    if record.access_token.is_empty() {
        return Err(ServerError::BadRequest(
            "Failed to obtain an access token.".to_string(),
        ));
    }

    Ok(ApiResponse::ok_empty())
}
