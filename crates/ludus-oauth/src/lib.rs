//! OAuth 2.0 token lifecycle for the Chzzk OpenAPI.
//!
//! Acquires an access/refresh token pair, persists it across restarts, and
//! keeps it transparently fresh ahead of expiry.
//!
//! # Components
//!
//! - [`manager`] — Lifecycle state machine: code exchange, refresh, proactive freshness, revocation
//! - [`store`] — Pluggable persistence: JSON file, MongoDB document, in-memory
//! - [`token`] — The persisted token record and its expiry arithmetic
//! - [`scope`] — Normalization between stored and display scope forms
//! - [`duration`] — Human-readable duration parsing for the refresh threshold

pub mod duration;
pub mod error;
pub mod manager;
pub mod scope;
pub mod store;
pub mod token;

pub use duration::{Threshold, parse_duration_ms};
pub use error::{OAuthError, Result};
pub use manager::{AUTH_URL, BASE_URL, TokenManager, TokenManagerOptions};
pub use scope::{expand_scope, normalize_scope};
pub use store::{FileTokenStore, MemoryTokenStore, MongoTokenStore, SharedTokenStore, TokenStore};
pub use token::TokenRecord;
