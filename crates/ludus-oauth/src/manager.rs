//! The token lifecycle manager.
//!
//! Owns the in-memory token state, decides when a refresh is due, performs
//! the exchange/refresh calls against the upstream token endpoint, and
//! persists results through a [`TokenStore`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};

use crate::duration::Threshold;
use crate::error::{OAuthError, Result};
use crate::scope::{expand_scope, normalize_scope};
use crate::store::SharedTokenStore;
use crate::token::{TokenRecord, now_millis};

/// Chzzk OpenAPI base URL.
pub const BASE_URL: &str = "https://openapi.chzzk.naver.com";

/// Chzzk account-interlock (login redirect) URL.
pub const AUTH_URL: &str = "https://chzzk.naver.com/account-interlock";

/// Default refresh threshold when none is configured.
const DEFAULT_REFRESH_THRESHOLD_MS: u64 = 15 * 60 * 1000;

// ============================================================================
// Options
// ============================================================================

/// Construction options for [`TokenManager`].
#[derive(Debug, Clone)]
pub struct TokenManagerOptions {
    pub client_id: String,
    pub client_secret: String,
    /// Refresh proactively when the access token nears expiry.
    pub auto_refresh: bool,
    /// Time-before-expiry window at which a proactive refresh triggers.
    /// Only valid together with `auto_refresh`. Defaults to 15 minutes.
    pub refresh_threshold: Option<Threshold>,
    /// Emit a timestamped log line on every reissue.
    pub reissue_logging: bool,
    /// Upstream API base URL (overridable for tests).
    pub base_url: String,
    /// Login redirect URL (overridable for tests).
    pub auth_url: String,
}

impl TokenManagerOptions {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            auto_refresh: true,
            refresh_threshold: None,
            reissue_logging: false,
            base_url: BASE_URL.to_string(),
            auth_url: AUTH_URL.to_string(),
        }
    }

    pub fn with_auto_refresh(mut self, enabled: bool) -> Self {
        self.auto_refresh = enabled;
        self
    }

    pub fn with_refresh_threshold(mut self, threshold: impl Into<Threshold>) -> Self {
        self.refresh_threshold = Some(threshold.into());
        self
    }

    pub fn with_reissue_logging(mut self, enabled: bool) -> Self {
        self.reissue_logging = enabled;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_auth_url(mut self, auth_url: impl Into<String>) -> Self {
        self.auth_url = auth_url.into();
        self
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    grant_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RevokeRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    token: &'a str,
    token_type_hint: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenEnvelope {
    content: TokenPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenPayload {
    access_token: String,
    #[serde(default)]
    refresh_token: String,
    #[serde(default)]
    expires_in: u64,
    #[serde(default = "default_token_type")]
    token_type: String,
    #[serde(default)]
    scope: String,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

// ============================================================================
// TokenManager
// ============================================================================

/// Acquires, persists, validates, and transparently refreshes the OAuth2
/// access/refresh token pair. The manager exclusively owns the in-memory
/// copy and is the only writer to the token store.
#[derive(Debug)]
pub struct TokenManager {
    client_id: String,
    client_secret: String,
    auto_refresh: bool,
    refresh_threshold_ms: u64,
    reissue_logging: bool,
    base_url: String,
    auth_url: String,
    http: reqwest::Client,
    store: SharedTokenStore,
    /// In-memory token state (scope held in display form).
    state: RwLock<Option<TokenRecord>>,
    /// Single-flight guard: one outstanding proactive refresh shared by all
    /// concurrent `ensure_fresh` callers.
    refresh_gate: Mutex<()>,
}

impl TokenManager {
    /// Create a manager. Fails fast on missing credentials or on a refresh
    /// threshold supplied while auto-refresh is disabled.
    pub fn new(options: TokenManagerOptions, store: SharedTokenStore) -> Result<Self> {
        if options.client_id.is_empty() || options.client_secret.is_empty() {
            return Err(OAuthError::Config(
                "clientId and clientSecret are required".to_string(),
            ));
        }
        if options.refresh_threshold.is_some() && !options.auto_refresh {
            return Err(OAuthError::Config(
                "auto_refresh must be enabled to set a refresh threshold".to_string(),
            ));
        }

        let refresh_threshold_ms = match &options.refresh_threshold {
            Some(threshold) => threshold.as_millis()?,
            None => DEFAULT_REFRESH_THRESHOLD_MS,
        };

        Ok(Self {
            client_id: options.client_id,
            client_secret: options.client_secret,
            auto_refresh: options.auto_refresh,
            refresh_threshold_ms,
            reissue_logging: options.reissue_logging,
            base_url: options.base_url,
            auth_url: options.auth_url,
            http: reqwest::Client::new(),
            store,
            state: RwLock::new(None),
            refresh_gate: Mutex::new(()),
        })
    }

    /// Client ID this manager authenticates with.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Client secret paired with [`Self::client_id`].
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Load any persisted token record and, when a refresh token is present,
    /// kick off one unconditional refresh in the background. A failure of
    /// that refresh is logged and does not block startup; the stale access
    /// token remains usable until its own expiry check fails.
    pub async fn initialize(self: &Arc<Self>) -> Result<()> {
        if let Some(mut record) = self.store.load().await? {
            record.scope = expand_scope(&record.scope);
            *self.state.write().await = Some(record);
        }

        let has_refresh_token = self
            .state
            .read()
            .await
            .as_ref()
            .is_some_and(|r| !r.refresh_token.is_empty());

        if has_refresh_token {
            let manager = Arc::clone(self);
            tokio::spawn(async move {
                if let Err(e) = manager.refresh().await {
                    tracing::warn!(error = %e, "startup token refresh failed");
                }
            });
        }

        Ok(())
    }

    /// Build the upstream login redirect URL. Pure; no I/O.
    pub fn authorization_url(&self, redirect_uri: &str, state: &str) -> String {
        let params = [
            ("clientId", self.client_id.as_str()),
            ("redirectUri", redirect_uri),
            ("state", state),
        ];

        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", self.auth_url, query)
    }

    /// Exchange an authorization code for a token pair, persist it, and
    /// replace the in-memory state.
    pub async fn exchange_code(&self, code: &str, state: &str) -> Result<TokenRecord> {
        let payload = self
            .request_tokens(&TokenRequest {
                client_id: &self.client_id,
                client_secret: &self.client_secret,
                grant_type: "authorization_code",
                code: Some(code),
                state: Some(state),
                refresh_token: None,
            })
            .await?;

        self.persist(payload).await
    }

    /// Refresh the access token using the stored refresh token. The new
    /// record replaces the old one wholesale; when the upstream rotates the
    /// refresh token the rotated value supersedes the previous one.
    pub async fn refresh(&self) -> Result<TokenRecord> {
        let refresh_token = self
            .state
            .read()
            .await
            .as_ref()
            .map(|r| r.refresh_token.clone())
            .filter(|t| !t.is_empty())
            .ok_or(OAuthError::MissingRefreshToken)?;

        let mut payload = self
            .request_tokens(&TokenRequest {
                client_id: &self.client_id,
                client_secret: &self.client_secret,
                grant_type: "refresh_token",
                code: None,
                state: None,
                refresh_token: Some(&refresh_token),
            })
            .await?;

        // Upstream may omit the refresh token when it was not rotated.
        if payload.refresh_token.is_empty() {
            payload.refresh_token = refresh_token;
        }

        let record = self.persist(payload).await?;

        if self.reissue_logging {
            tracing::info!(
                at = %chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                "access token reissued"
            );
        }

        Ok(record)
    }

    /// Refresh proactively when the access token is inside the threshold
    /// window. No-op when auto-refresh is disabled, no token is held, or the
    /// record carries no expiry information. Concurrent callers coalesce on
    /// one in-flight refresh.
    pub async fn ensure_fresh(&self) -> Result<()> {
        if !self.auto_refresh || !self.refresh_due().await {
            return Ok(());
        }

        let _guard = self.refresh_gate.lock().await;

        // Another caller may have refreshed while we waited for the gate.
        if !self.refresh_due().await {
            return Ok(());
        }

        self.refresh().await?;
        Ok(())
    }

    /// Revoke a token upstream. In-memory state is left untouched;
    /// revocation is a pass-through, not a lifecycle transition.
    pub async fn revoke(&self, token: &str, token_type_hint: &str) -> Result<serde_json::Value> {
        let url = format!("{}/auth/v1/token/revoke", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(&RevokeRequest {
                client_id: &self.client_id,
                client_secret: &self.client_secret,
                token,
                token_type_hint,
            })
            .send()
            .await
            .map_err(|e| OAuthError::Network(format!("Revoke request failed: {e}")))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(OAuthError::UpstreamAuth {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(serde_json::from_str(&body).unwrap_or(serde_json::Value::Null))
    }

    /// Run the freshness check, then return the current access token.
    pub async fn bearer(&self) -> Result<String> {
        self.ensure_fresh().await?;

        self.state
            .read()
            .await
            .as_ref()
            .map(|r| r.access_token.clone())
            .filter(|t| !t.is_empty())
            .ok_or(OAuthError::MissingAccessToken)
    }

    /// Current access token, if any.
    pub async fn access_token(&self) -> Option<String> {
        self.state
            .read()
            .await
            .as_ref()
            .map(|r| r.access_token.clone())
            .filter(|t| !t.is_empty())
    }

    /// Current refresh token, if any.
    pub async fn refresh_token(&self) -> Option<String> {
        self.state
            .read()
            .await
            .as_ref()
            .map(|r| r.refresh_token.clone())
            .filter(|t| !t.is_empty())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────

    async fn refresh_due(&self) -> bool {
        let state = self.state.read().await;
        let Some(record) = state.as_ref() else {
            return false;
        };
        if record.access_token.is_empty() {
            return false;
        }
        let Some(expires_at) = record.expires_at() else {
            return false;
        };
        expires_at - now_millis() < self.refresh_threshold_ms as i64
    }

    async fn request_tokens(&self, request: &TokenRequest<'_>) -> Result<TokenPayload> {
        let url = format!("{}/auth/v1/token", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| OAuthError::Network(format!("Token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OAuthError::UpstreamAuth {
                status: status.as_u16(),
                message: body,
            });
        }

        response
            .json::<TokenEnvelope>()
            .await
            .map(|envelope| envelope.content)
            .map_err(|e| OAuthError::Serialization(format!("Failed to parse token response: {e}")))
    }

    /// Normalize, stamp, persist, and only then replace the in-memory
    /// state. A failed save fails the whole operation: an unpersisted token
    /// would not survive a restart.
    async fn persist(&self, payload: TokenPayload) -> Result<TokenRecord> {
        let record = TokenRecord {
            access_token: payload.access_token,
            refresh_token: payload.refresh_token,
            expires_in: payload.expires_in,
            token_type: payload.token_type,
            scope: normalize_scope(&payload.scope),
            issued_at: now_millis(),
        };

        self.store.save(&record).await?;

        let mut in_memory = record.clone();
        in_memory.scope = expand_scope(&in_memory.scope);
        *self.state.write().await = Some(in_memory);

        Ok(record)
    }
}
