//! Server configuration.

use std::net::SocketAddr;
use std::time::Duration;

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Basic-auth credentials guarding the login routes.
#[derive(Debug, Clone)]
pub struct BasicAuthCredentials {
    pub username: String,
    pub password: String,
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to.
    pub bind_address: SocketAddr,

    /// Redirect URI registered with the upstream OAuth application.
    pub redirect_uri: String,

    /// Client IPs allowed through the access gate. An empty list is a
    /// configuration error surfaced per request.
    pub allowed_ips: Vec<String>,

    /// Origins allowed through the access gate and CORS. An empty list is
    /// a configuration error surfaced per request.
    pub allowed_origins: Vec<String>,

    /// Basic-auth credentials for `/auth/login` and `/me`. `None` is a
    /// configuration error surfaced per request on those routes.
    pub basic_auth: Option<BasicAuthCredentials>,

    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".parse().unwrap(),
            redirect_uri: String::new(),
            allowed_ips: Vec::new(),
            allowed_origins: Vec::new(),
            basic_auth: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ServerConfig {
    /// Create a config with the given OAuth redirect URI.
    pub fn new(redirect_uri: impl Into<String>) -> Self {
        Self {
            redirect_uri: redirect_uri.into(),
            ..Default::default()
        }
    }

    /// Set the bind address.
    pub fn with_bind_address(mut self, addr: SocketAddr) -> Self {
        self.bind_address = addr;
        self
    }

    /// Set the IP allow-list.
    pub fn with_allowed_ips(mut self, ips: Vec<String>) -> Self {
        self.allowed_ips = ips;
        self
    }

    /// Set the origin allow-list.
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.allowed_origins = origins;
        self
    }

    /// Set the basic-auth credentials.
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.basic_auth = Some(BasicAuthCredentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    /// Set the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
