//! Application state shared across handlers.

use std::sync::Arc;

use ludus_client::ChzzkClient;
use ludus_oauth::TokenManager;

use crate::config::ServerConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Token lifecycle manager.
    pub tokens: Arc<TokenManager>,

    /// Upstream API client.
    pub chzzk: ChzzkClient,

    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(tokens: Arc<TokenManager>, chzzk: ChzzkClient, config: ServerConfig) -> Self {
        Self {
            tokens,
            chzzk,
            config: Arc::new(config),
        }
    }

    /// Access the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
