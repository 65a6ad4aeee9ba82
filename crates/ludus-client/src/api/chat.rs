//! Chat API.

use reqwest::Method;
use serde_json::Value;

use crate::client::ChzzkClient;
use crate::error::Result;

/// Chat API client.
pub struct ChatApi {
    client: ChzzkClient,
}

impl ChatApi {
    pub(crate) fn new(client: ChzzkClient) -> Self {
        Self { client }
    }

    /// Post a chat message to the authenticated user's channel.
    pub async fn send(&self, message: &str) -> Result<Value> {
        let body = serde_json::json!({ "message": message });
        self.client
            .authorized(Method::POST, "/open/v1/chats/send", &[], Some(&body))
            .await
    }

    /// Pin a notice message.
    pub async fn set_notice(&self, payload: &Value) -> Result<Value> {
        self.client
            .authorized(Method::POST, "/open/v1/chats/notice", &[], Some(payload))
            .await
    }

    /// Current chat settings.
    pub async fn settings(&self) -> Result<Value> {
        self.client
            .authorized(Method::GET, "/open/v1/chats/settings", &[], None)
            .await
    }

    /// Replace the chat settings.
    pub async fn update_settings(&self, setting: &Value) -> Result<Value> {
        self.client
            .authorized(Method::PUT, "/open/v1/chats/settings", &[], Some(setting))
            .await
    }
}
