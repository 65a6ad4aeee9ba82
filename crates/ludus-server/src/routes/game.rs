//! Game category routes.
//!
//! Thin reshaping over the upstream category search: results are filtered
//! to `categoryType == "GAME"` before they leave this server.

use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::envelope::ApiResponse;
use crate::error::{Result, ServerError};
use crate::state::AppState;

/// How many suggestions an auto-complete query fetches upstream.
const AUTO_COMPLETE_SIZE: u32 = 10;

fn game_categories(result: &Value) -> Vec<Value> {
    result["content"]["data"]
        .as_array()
        .map(|categories| {
            categories
                .iter()
                .filter(|category| category["categoryType"] == "GAME")
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(default)]
    category_name: String,
    /// Kept as text so a malformed value reaches the handler and gets an
    /// enveloped 400 instead of the extractor's plain-text rejection.
    #[serde(default)]
    size: String,
}

/// `GET /game/search?categoryName&size` — game categories matching a name.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<ApiResponse> {
    if params.category_name.is_empty() {
        return Err(ServerError::BadRequest(
            "categoryName is required".to_string(),
        ));
    }
    let size = match params.size.parse::<u32>() {
        Ok(size) if (1..=50).contains(&size) => size,
        _ => {
            return Err(ServerError::BadRequest(
                "size is required and must be between 1 and 50".to_string(),
            ));
        }
    };

    let result = state
        .chzzk
        .categories()
        .search(&params.category_name, size)
        .await
        .map_err(|e| ServerError::from_client(e, "Category search failed."))?;

    let games = game_categories(&result);
    if games.is_empty() {
        return Ok(ApiResponse::ok_empty());
    }
    Ok(ApiResponse::ok(Value::Array(games)))
}

#[derive(Debug, Deserialize)]
pub struct AutoCompleteParams {
    #[serde(default)]
    query: String,
}

/// `GET /game/auto_complete?query` — name/id suggestion pairs.
pub async fn auto_complete(
    State(state): State<AppState>,
    Query(params): Query<AutoCompleteParams>,
) -> Result<ApiResponse> {
    if params.query.is_empty() {
        return Err(ServerError::BadRequest("query is required".to_string()));
    }

    let result = state
        .chzzk
        .categories()
        .search(&params.query, AUTO_COMPLETE_SIZE)
        .await
        .map_err(|e| ServerError::from_client(e, "Game search failed."))?;

    let suggestions: Vec<Value> = game_categories(&result)
        .iter()
        .map(|category| {
            json!({
                "name": category["categoryName"],
                "id": category["categoryId"],
            })
        })
        .collect();

    Ok(ApiResponse::ok(Value::Array(suggestions)))
}
