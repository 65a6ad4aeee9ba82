//! Lives and streaming API.

use reqwest::Method;
use serde_json::Value;

use crate::client::ChzzkClient;
use crate::error::Result;

/// Lives API client.
pub struct LiveApi {
    client: ChzzkClient,
}

impl LiveApi {
    pub(crate) fn new(client: ChzzkClient) -> Self {
        Self { client }
    }

    /// Page through currently running lives.
    pub async fn list(&self, size: u32, next_cursor: Option<&str>) -> Result<Value> {
        let mut query = vec![("size".to_string(), size.to_string())];
        if let Some(next) = next_cursor.filter(|c| !c.is_empty()) {
            query.push(("next".to_string(), next.to_string()));
        }

        self.client
            .with_client_credentials(Method::GET, "/open/v1/lives", &query, None)
            .await
    }

    /// The authenticated user's stream key.
    pub async fn stream_key(&self) -> Result<Value> {
        self.client
            .authorized(Method::GET, "/open/v1/streams/key", &[], None)
            .await
    }

    /// The authenticated user's broadcast settings.
    pub async fn setting(&self) -> Result<Value> {
        self.client
            .authorized(Method::GET, "/open/v1/lives/setting", &[], None)
            .await
    }

    /// Partially update the broadcast settings.
    pub async fn update_setting(&self, setting: &Value) -> Result<Value> {
        self.client
            .authorized(Method::PATCH, "/open/v1/lives/setting", &[], Some(setting))
            .await
    }
}
