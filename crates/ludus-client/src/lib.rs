//! HTTP client for the Chzzk OpenAPI.
//!
//! A thin passthrough: endpoint methods mirror the upstream surface and
//! return opaque JSON. Authentication is delegated to a
//! [`ludus_oauth::TokenManager`]; user-scoped calls attach its bearer token
//! and replay once behind a forced refresh when the upstream answers 401.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ludus_client::ChzzkClient;
//! use ludus_oauth::{MemoryTokenStore, TokenManager, TokenManagerOptions};
//!
//! # async fn example() -> ludus_client::Result<()> {
//! let tokens = Arc::new(TokenManager::new(
//!     TokenManagerOptions::new("client-id", "client-secret"),
//!     Arc::new(MemoryTokenStore::new()),
//! )?);
//! tokens.initialize().await?;
//!
//! let client = ChzzkClient::new(tokens)?;
//! let me = client.user().me().await?;
//! println!("{}", me["content"]["channelName"]);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod error;

pub use api::{CategoryApi, ChannelApi, ChatApi, DropsApi, LiveApi, UserApi};
pub use client::{ChzzkClient, ClientBuilder};
pub use error::{Error, Result};
