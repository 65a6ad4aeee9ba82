//! Category search API.

use reqwest::Method;
use serde_json::Value;

use crate::client::ChzzkClient;
use crate::error::Result;

/// Category API client.
pub struct CategoryApi {
    client: ChzzkClient,
}

impl CategoryApi {
    pub(crate) fn new(client: ChzzkClient) -> Self {
        Self { client }
    }

    /// Search categories by keyword.
    pub async fn search(&self, query: &str, size: u32) -> Result<Value> {
        let params = [
            ("query".to_string(), query.to_string()),
            ("size".to_string(), size.to_string()),
        ];

        self.client
            .with_client_credentials(Method::GET, "/open/v1/categories/search", &params, None)
            .await
    }
}
