//! Authenticated-user API.

use reqwest::Method;
use serde_json::Value;

use crate::client::ChzzkClient;
use crate::error::Result;

/// User API client.
pub struct UserApi {
    client: ChzzkClient,
}

impl UserApi {
    pub(crate) fn new(client: ChzzkClient) -> Self {
        Self { client }
    }

    /// Profile of the user the current token belongs to.
    pub async fn me(&self) -> Result<Value> {
        self.client
            .authorized(Method::GET, "/open/v1/users/me", &[], None)
            .await
    }
}
