//! Channels API.

use reqwest::Method;
use serde_json::Value;

use crate::client::ChzzkClient;
use crate::error::Result;

/// Channels API client.
pub struct ChannelApi {
    client: ChzzkClient,
}

impl ChannelApi {
    pub(crate) fn new(client: ChzzkClient) -> Self {
        Self { client }
    }

    /// Look up channels by ID. Repeats the `channelIds` parameter per ID.
    pub async fn list(&self, channel_ids: &[String]) -> Result<Value> {
        let query: Vec<(String, String)> = channel_ids
            .iter()
            .map(|id| ("channelIds".to_string(), id.clone()))
            .collect();

        self.client
            .with_client_credentials(Method::GET, "/open/v1/channels", &query, None)
            .await
    }
}
