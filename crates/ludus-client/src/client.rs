//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use ludus_oauth::{BASE_URL, TokenManager};
use reqwest::{Method, StatusCode};
use serde_json::Value;

use crate::api::{CategoryApi, ChannelApi, ChatApi, DropsApi, LiveApi, UserApi};
use crate::error::{Error, Result};

/// Default timeout for upstream requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// How a request authenticates against the upstream.
pub(crate) enum AuthMode<'a> {
    /// `Authorization: Bearer <token>` from the token manager.
    Bearer(&'a str),
    /// `Client-Id` / `Client-Secret` application headers.
    ClientCredentials,
}

/// Chzzk OpenAPI client.
///
/// Thin passthrough over the upstream endpoints: request and response bodies
/// are opaque JSON. User-scoped calls draw their bearer token from the
/// [`TokenManager`] and retry exactly once after an upstream 401, behind a
/// forced refresh.
///
/// Cloning is cheap; clones share the HTTP pool and token state.
#[derive(Clone)]
pub struct ChzzkClient {
    inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) tokens: Arc<TokenManager>,
}

impl ChzzkClient {
    /// Create a client builder around an existing token manager.
    pub fn builder(tokens: Arc<TokenManager>) -> ClientBuilder {
        ClientBuilder::new(tokens)
    }

    /// Create a client with default settings.
    pub fn new(tokens: Arc<TokenManager>) -> Result<Self> {
        Self::builder(tokens).build()
    }

    /// The token manager backing user-scoped requests.
    pub fn tokens(&self) -> &Arc<TokenManager> {
        &self.inner.tokens
    }

    // ─────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────

    /// Access the authenticated-user API.
    pub fn user(&self) -> UserApi {
        UserApi::new(self.clone())
    }

    /// Access the channels API.
    pub fn channels(&self) -> ChannelApi {
        ChannelApi::new(self.clone())
    }

    /// Access the category search API.
    pub fn categories(&self) -> CategoryApi {
        CategoryApi::new(self.clone())
    }

    /// Access the lives and streaming API.
    pub fn lives(&self) -> LiveApi {
        LiveApi::new(self.clone())
    }

    /// Access the chat API.
    pub fn chat(&self) -> ChatApi {
        ChatApi::new(self.clone())
    }

    /// Access the drops reward-claims API.
    pub fn drops(&self) -> DropsApi {
        DropsApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Internal HTTP methods
    // ─────────────────────────────────────────────────────────────────────

    /// Send a user-scoped request. On a 401 the token is force-refreshed and
    /// the request is replayed once; a second 401 surfaces as-is.
    pub(crate) async fn authorized(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let token = self.inner.tokens.bearer().await?;
        let response = self
            .send(method.clone(), path, query, body, AuthMode::Bearer(&token))
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::debug!(%path, "upstream rejected bearer token, refreshing and retrying");
            self.inner.tokens.refresh().await?;
            let token = self.inner.tokens.bearer().await?;
            let response = self
                .send(method, path, query, body, AuthMode::Bearer(&token))
                .await?;
            return self.handle_response(response).await;
        }

        self.handle_response(response).await
    }

    /// Send an application-scoped request with client credential headers.
    /// No retry; these calls do not depend on token freshness.
    pub(crate) async fn with_client_credentials(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let response = self
            .send(method, path, query, body, AuthMode::ClientCredentials)
            .await?;
        self.handle_response(response).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
        auth: AuthMode<'_>,
    ) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.inner.base_url, path);
        let mut request = self.inner.http.request(method, &url).query(query);

        request = match auth {
            AuthMode::Bearer(token) => request.bearer_auth(token),
            AuthMode::ClientCredentials => request
                .header("Client-Id", self.inner.tokens.client_id())
                .header("Client-Secret", self.inner.tokens.client_secret()),
        };

        if let Some(body) = body {
            request = request.json(body);
        }

        Ok(request.send().await?)
    }

    async fn handle_response(&self, response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        if body.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}

/// Builder for [`ChzzkClient`].
pub struct ClientBuilder {
    tokens: Arc<TokenManager>,
    base_url: String,
    timeout: Duration,
}

impl ClientBuilder {
    fn new(tokens: Arc<TokenManager>) -> Self {
        Self {
            tokens,
            base_url: BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the upstream base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<ChzzkClient> {
        let http = reqwest::Client::builder().timeout(self.timeout).build()?;

        Ok(ChzzkClient {
            inner: Arc::new(ClientInner {
                http,
                base_url: self.base_url.trim_end_matches('/').to_string(),
                tokens: self.tokens,
            }),
        })
    }
}
