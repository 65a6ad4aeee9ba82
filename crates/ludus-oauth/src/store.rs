//! Durable persistence for the token record.
//!
//! Exactly one logical record exists per deployment. Backends: a local JSON
//! file, a MongoDB collection, or an in-memory store for tests. The backend
//! is chosen once at startup; the manager only sees the [`TokenStore`] trait.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mongodb::bson::{self, Document, doc};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use tokio::sync::{OnceCell, RwLock};

use crate::error::{OAuthError, Result};
use crate::token::TokenRecord;

/// Fixed identifier for the single record in the document-database backend.
const TOKEN_KEY: &str = "default";

/// Database holding the token collection.
const TOKEN_DATABASE: &str = "chzzk";

/// Bound on connect/server-selection so a network partition cannot hang a
/// caller indefinitely.
const MONGO_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// TokenStore Trait
// ============================================================================

/// Storage-agnostic persistence for the token record.
#[async_trait]
pub trait TokenStore: Send + Sync + std::fmt::Debug {
    /// Load the record, or `None` when nothing has been persisted yet.
    async fn load(&self) -> Result<Option<TokenRecord>>;

    /// Persist the record, replacing any previous one.
    async fn save(&self, record: &TokenRecord) -> Result<()>;
}

/// Shared token store for use across async contexts.
pub type SharedTokenStore = Arc<dyn TokenStore>;

// ============================================================================
// FileTokenStore
// ============================================================================

/// File-backed store: formatted JSON at a fixed path. Single writer assumed.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<TokenRecord>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| OAuthError::Storage(format!("Failed to read token file: {e}")))?;

        let record: TokenRecord = serde_json::from_str(&content)
            .map_err(|e| OAuthError::Serialization(format!("Failed to parse token file: {e}")))?;

        Ok(Some(record))
    }

    async fn save(&self, record: &TokenRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| OAuthError::Storage(format!("Failed to create token directory: {e}")))?;
        }

        let json = serde_json::to_string_pretty(record)
            .map_err(|e| OAuthError::Serialization(format!("Failed to serialize tokens: {e}")))?;

        std::fs::write(&self.path, json)
            .map_err(|e| OAuthError::Storage(format!("Failed to write token file: {e}")))?;

        tracing::debug!(path = %self.path.display(), "token record saved");
        Ok(())
    }
}

// ============================================================================
// MongoTokenStore
// ============================================================================

/// MongoDB-backed store. The client is connected lazily, once, and shared
/// for the process lifetime.
#[derive(Debug)]
pub struct MongoTokenStore {
    uri: String,
    client: OnceCell<Client>,
}

impl MongoTokenStore {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            client: OnceCell::new(),
        }
    }

    async fn collection(&self) -> Result<Collection<Document>> {
        let client = self
            .client
            .get_or_try_init(|| async {
                let mut options = ClientOptions::parse(&self.uri)
                    .await
                    .map_err(|e| OAuthError::Storage(format!("Invalid MongoDB URI: {e}")))?;
                options.connect_timeout = Some(MONGO_TIMEOUT);
                options.server_selection_timeout = Some(MONGO_TIMEOUT);

                Client::with_options(options)
                    .map_err(|e| OAuthError::Storage(format!("MongoDB client error: {e}")))
            })
            .await?;

        Ok(client.database(TOKEN_DATABASE).collection("tokens"))
    }
}

#[async_trait]
impl TokenStore for MongoTokenStore {
    async fn load(&self) -> Result<Option<TokenRecord>> {
        let collection = self.collection().await?;

        let document = collection
            .find_one(doc! { "id": TOKEN_KEY })
            .await
            .map_err(|e| OAuthError::Storage(format!("MongoDB read failed: {e}")))?;

        match document {
            Some(document) => {
                let record: TokenRecord = bson::from_document(document).map_err(|e| {
                    OAuthError::Serialization(format!("Failed to decode token document: {e}"))
                })?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, record: &TokenRecord) -> Result<()> {
        let collection = self.collection().await?;

        let mut document = bson::to_document(record).map_err(|e| {
            OAuthError::Serialization(format!("Failed to encode token document: {e}"))
        })?;
        document.insert("id", TOKEN_KEY);

        collection
            .update_one(doc! { "id": TOKEN_KEY }, doc! { "$set": document })
            .upsert(true)
            .await
            .map_err(|e| OAuthError::Storage(format!("MongoDB write failed: {e}")))?;

        tracing::debug!("token record upserted");
        Ok(())
    }
}

// ============================================================================
// MemoryTokenStore (for testing)
// ============================================================================

/// In-memory store for tests.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    record: RwLock<Option<TokenRecord>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: TokenRecord) -> Self {
        Self {
            record: RwLock::new(Some(record)),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<TokenRecord>> {
        Ok(self.record.read().await.clone())
    }

    async fn save(&self, record: &TokenRecord) -> Result<()> {
        *self.record.write().await = Some(record.clone());
        Ok(())
    }
}
