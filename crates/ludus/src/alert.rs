//! Discord webhook alerts for operator attention.

/// Post a message to the configured webhook. Delivery failures are logged
/// and swallowed; an alert must never take the service down with it.
pub async fn send_discord_alert(webhook_url: Option<&str>, message: &str) {
    let Some(url) = webhook_url else {
        return;
    };

    let payload = serde_json::json!({ "content": message });
    let result = reqwest::Client::new().post(url).json(&payload).send().await;

    match result {
        Ok(response) if !response.status().is_success() => {
            tracing::error!(status = %response.status(), "discord webhook rejected the alert");
        }
        Err(e) => tracing::error!(error = %e, "discord webhook delivery failed"),
        Ok(_) => {}
    }
}
