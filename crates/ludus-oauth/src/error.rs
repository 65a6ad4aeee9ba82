//! Error types for the token lifecycle.

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, OAuthError>;

/// Errors that can occur while managing OAuth tokens.
#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    /// Invalid or contradictory configuration. Fatal at construction.
    #[error("Config error: {0}")]
    Config(String),

    /// A refresh was attempted with no stored refresh token.
    #[error("refresh token is missing")]
    MissingRefreshToken,

    /// An authenticated call was attempted with no access token available.
    #[error("access token is missing")]
    MissingAccessToken,

    /// The upstream token endpoint rejected a code exchange or refresh.
    #[error("Upstream auth error ({status}): {message}")]
    UpstreamAuth { status: u16, message: String },

    /// Token store read/write failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Network/transport error.
    #[error("Network error: {0}")]
    Network(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for OAuthError {
    fn from(e: reqwest::Error) -> Self {
        OAuthError::Network(e.to_string())
    }
}
