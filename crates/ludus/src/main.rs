//! ludus - Chzzk OpenAPI wrapper service.
//!
//! Main entry point: reads configuration from the environment, wires the
//! token manager to its store, and serves the HTTP API.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

mod alert;
mod config;

use config::{AppConfig, TokenStorage};
use ludus_client::ChzzkClient;
use ludus_oauth::{
    FileTokenStore, MongoTokenStore, SharedTokenStore, TokenManager, TokenManagerOptions,
};
use ludus_server::{Server, ServerConfig};

/// ludus - Chzzk OpenAPI wrapper service
#[derive(Parser)]
#[command(name = "ludus")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to bind the server to
    #[arg(long, env = "LUDUS_BIND", default_value = "127.0.0.1:3000")]
    bind: SocketAddr,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "ludus=debug,ludus_oauth=debug,ludus_client=debug,ludus_server=debug,info"
    } else {
        "ludus=info,ludus_oauth=info,ludus_client=info,ludus_server=info,warn"
    };

    tracing_subscriber::fmt()
        .with_target(true)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();
}

fn build_store(storage: &TokenStorage) -> SharedTokenStore {
    match storage {
        TokenStorage::Json { path } => Arc::new(FileTokenStore::new(path)),
        TokenStorage::Mongo { uri } => Arc::new(MongoTokenStore::new(uri)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let app_config = AppConfig::from_env()?;

    let mut options = TokenManagerOptions::new(&app_config.client_id, &app_config.client_secret)
        .with_reissue_logging(app_config.reissue_logging);
    if let Some(threshold) = &app_config.refresh_threshold {
        options = options.with_refresh_threshold(threshold.as_str());
    }

    let store = build_store(&app_config.storage);
    let tokens =
        Arc::new(TokenManager::new(options, store).context("failed to build token manager")?);

    tokens
        .initialize()
        .await
        .context("failed to load persisted tokens")?;

    if tokens.refresh_token().await.is_none() {
        tracing::warn!("no refresh token loaded; manual authentication is required");
        alert::send_discord_alert(
            app_config.discord_webhook_url.as_deref(),
            &format!(
                "[ludus] refresh token is missing!\naccess token: {}",
                tokens.access_token().await.as_deref().unwrap_or("(none)")
            ),
        )
        .await;
    }

    let chzzk = ChzzkClient::new(tokens.clone()).context("failed to build API client")?;

    let mut server_config = ServerConfig::new(&app_config.redirect_uri)
        .with_bind_address(cli.bind)
        .with_allowed_ips(app_config.allowed_ips)
        .with_allowed_origins(app_config.allowed_origins);
    if let Some((username, password)) = app_config.basic_auth {
        server_config = server_config.with_basic_auth(username, password);
    }

    Server::new(tokens, chzzk, server_config)
        .run()
        .await
        .context("server exited with an error")?;

    Ok(())
}
