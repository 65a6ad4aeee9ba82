//! HTTP API server wrapping the Chzzk OpenAPI.
//!
//! A thin route layer over [`ludus_client::ChzzkClient`]: every response is
//! wrapped in the `{ok, message, data}` envelope, and every request passes
//! an IP/origin allow-list gate. The login routes additionally sit behind
//! HTTP basic auth.
//!
//! # Example
//!
//! ```ignore
//! use ludus_server::{Server, ServerConfig};
//!
//! let config = ServerConfig::new("https://example.com/auth/callback")
//!     .with_bind_address("127.0.0.1:3000".parse()?)
//!     .with_allowed_ips(vec!["127.0.0.1".to_string()])
//!     .with_allowed_origins(vec!["https://example.com".to_string()]);
//!
//! let server = Server::new(tokens, chzzk, config);
//! server.run().await?;
//! ```

pub mod config;
pub mod envelope;
pub mod error;
pub mod routes;
pub mod security;
pub mod state;

pub use config::{BasicAuthCredentials, ServerConfig};
pub use envelope::ApiResponse;
pub use error::{Result, ServerError};
pub use state::AppState;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use axum::{Router, middleware};
use ludus_client::ChzzkClient;
use ludus_oauth::TokenManager;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// The HTTP server.
pub struct Server {
    state: AppState,
}

impl Server {
    /// Create a new server.
    pub fn new(tokens: Arc<TokenManager>, chzzk: ChzzkClient, config: ServerConfig) -> Self {
        Self {
            state: AppState::new(tokens, chzzk, config),
        }
    }

    /// Create a server from a pre-built application state.
    pub fn from_state(state: AppState) -> Self {
        Self { state }
    }

    /// Build the router with all routes and middleware.
    pub fn router(&self) -> Router {
        // Basic auth wraps only the routes that mint or expose tokens.
        let protected = Router::new()
            .route("/auth/login", get(routes::auth::login))
            .route("/me", get(routes::user::me))
            .route_layer(middleware::from_fn_with_state(
                self.state.clone(),
                security::basic_auth,
            ));

        Router::new()
            .route("/", get(routes::health::root))
            .route("/health", get(routes::health::health))
            .route("/auth/callback", get(routes::auth::callback))
            .route("/game/search", get(routes::game::search))
            .route("/game/auto_complete", get(routes::game::auto_complete))
            .route("/chat/settings", get(routes::passthrough::chat_settings))
            .route(
                "/drops/reward-claims",
                get(routes::passthrough::drops_reward_claims),
            )
            .merge(protected)
            .fallback(routes::not_found)
            // The access gate runs before any handler, fallback included.
            .layer(middleware::from_fn_with_state(
                self.state.clone(),
                security::access_gate,
            ))
            .layer(self.cors_layer())
            .layer(TimeoutLayer::new(self.state.config().request_timeout))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// CORS restricted to the configured origins, GET only.
    fn cors_layer(&self) -> CorsLayer {
        let origins: Vec<HeaderValue> = self
            .state
            .config()
            .allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    }

    /// Run the server.
    pub async fn run(self) -> Result<()> {
        let addr = self.state.config.bind_address;
        let router = self.router();

        info!("Starting server on {}", addr);

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Internal(format!("Failed to bind: {e}")))?;

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .map_err(|e| ServerError::Internal(format!("Server error: {e}")))?;

        Ok(())
    }

    /// Get the configured bind address.
    pub fn bind_address(&self) -> SocketAddr {
        self.state.config.bind_address
    }
}
