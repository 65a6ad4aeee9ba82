//! Drops reward-claims API.

use reqwest::Method;
use serde_json::Value;

use crate::client::ChzzkClient;
use crate::error::Result;

/// Drops API client.
pub struct DropsApi {
    client: ChzzkClient,
}

impl DropsApi {
    pub(crate) fn new(client: ChzzkClient) -> Self {
        Self { client }
    }

    /// List reward claims. Filter keys gain the `page.` prefix the upstream
    /// expects unless they already carry it; empty values are dropped.
    pub async fn reward_claims(&self, filters: &[(String, String)]) -> Result<Value> {
        let query: Vec<(String, String)> = filters
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| {
                let key = if key.starts_with("page.") {
                    key.clone()
                } else {
                    format!("page.{key}")
                };
                (key, value.clone())
            })
            .collect();

        self.client
            .with_client_credentials(Method::GET, "/open/v1/drops/reward-claims", &query, None)
            .await
    }

    /// Transition claims to a new fulfillment state.
    pub async fn update_reward_claims(
        &self,
        claim_ids: &[String],
        fulfillment_state: &str,
    ) -> Result<Value> {
        let body = serde_json::json!({
            "claimIds": claim_ids,
            "fulfillmentState": fulfillment_state,
        });

        self.client
            .with_client_credentials(Method::PUT, "/open/v1/drops/reward-claims", &[], Some(&body))
            .await
    }
}
