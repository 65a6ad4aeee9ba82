//! Environment-driven application configuration.

use std::env;

use anyhow::{Context, Result, bail};

/// Where token records are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStorage {
    /// Local JSON file.
    Json { path: String },
    /// MongoDB document.
    Mongo { uri: String },
}

/// Application configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub storage: TokenStorage,
    /// Duration string or raw milliseconds; `None` keeps the default window.
    pub refresh_threshold: Option<String>,
    pub reissue_logging: bool,
    pub allowed_ips: Vec<String>,
    pub allowed_origins: Vec<String>,
    pub basic_auth: Option<(String, String)>,
    pub discord_webhook_url: Option<String>,
}

fn required(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("{name} is not set"))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

/// Split a comma-separated list, dropping empty entries.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn truthy(value: &str) -> bool {
    matches!(value, "1" | "true" | "TRUE" | "yes")
}

impl AppConfig {
    /// Read the configuration from the environment.
    pub fn from_env() -> Result<Self> {
        let storage = match optional("TOKEN_STORAGE").as_deref().unwrap_or("json") {
            "json" => TokenStorage::Json {
                path: optional("TOKEN_JSON_PATH").unwrap_or_else(|| "token.json".to_string()),
            },
            "mongodb" => TokenStorage::Mongo {
                uri: required("MONGO_URI")?,
            },
            other => bail!("unknown TOKEN_STORAGE value: {other}"),
        };

        Ok(Self {
            client_id: required("CHZZK_CLIENT_ID")?,
            client_secret: required("CHZZK_CLIENT_SECRET")?,
            redirect_uri: required("CHZZK_REDIRECT_URI")?,
            storage,
            refresh_threshold: optional("TOKEN_REFRESH_THRESHOLD"),
            reissue_logging: optional("TOKEN_REISSUE_LOGGER")
                .as_deref()
                .is_some_and(truthy),
            allowed_ips: optional("ALLOWED_IPS")
                .map(|v| split_list(&v))
                .unwrap_or_default(),
            allowed_origins: optional("ALLOWED_ORIGINS")
                .map(|v| split_list(&v))
                .unwrap_or_default(),
            basic_auth: optional("LOGIN_USERNAME")
                .zip(optional("LOGIN_PASSWORD")),
            discord_webhook_url: optional("DISCORD_WEBHOOK_URL"),
        })
    }
}
