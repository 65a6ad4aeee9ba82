//! The persisted token record.

use serde::{Deserialize, Serialize};

/// The sole persisted entity: one access/refresh token pair per deployment.
///
/// Field names serialize in camelCase to match the upstream wire format and
/// the on-disk JSON layout. `issued_at` is stamped on every save so that
/// freshness is computed identically for every storage backend; records
/// written before this field existed deserialize with `issued_at = 0`,
/// which the freshness check treats as unknown expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    /// Bearer credential for upstream calls.
    pub access_token: String,
    /// Credential used to mint a new access token without user interaction.
    pub refresh_token: String,
    /// Validity of `access_token` in seconds, relative to `issued_at`.
    pub expires_in: u64,
    /// Typically "Bearer".
    pub token_type: String,
    /// Granted permissions. Space-delimited on disk, comma-space in memory.
    pub scope: String,
    /// Unix milliseconds at which the record was persisted.
    #[serde(default)]
    pub issued_at: i64,
}

impl TokenRecord {
    /// Milliseconds since the Unix epoch at which the access token expires,
    /// or `None` when the record carries no usable expiry information.
    pub fn expires_at(&self) -> Option<i64> {
        if self.expires_in == 0 || self.issued_at == 0 {
            return None;
        }
        Some(self.issued_at + self.expires_in as i64 * 1000)
    }
}

/// Current time in milliseconds since the Unix epoch.
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
