//! Free-form audit entries attached to member records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A single audit note on a member: moderation incidents, admin remarks,
/// blacklist hits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Stable entry id, derived from owner, content and timestamp.
    #[serde(default)]
    pub id: String,
    /// Entry text.
    #[serde(default)]
    pub content: String,
    /// Id of the user who authored the entry.
    #[serde(default)]
    pub author_id: String,
    /// Link to the message the entry refers to, when there is one.
    #[serde(default)]
    pub message_link: String,
    /// Creation time.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl AuditEntry {
    /// Create an entry for `owner_id`, stamping it with the current time
    /// and a derived id.
    pub fn new(owner_id: &str, content: &str, author_id: &str, message_link: &str) -> Self {
        let timestamp = Utc::now();
        Self {
            id: Self::derive_id(owner_id, content, timestamp),
            content: content.to_string(),
            author_id: author_id.to_string(),
            message_link: message_link.to_string(),
            timestamp: Some(timestamp),
        }
    }

    /// Derive a stable entry id from the owner, content and timestamp.
    ///
    /// Uses the first 16 hex characters of a SHA-256 digest; long enough
    /// to be unique per member, short enough to quote in chat.
    fn derive_id(owner_id: &str, content: &str, timestamp: DateTime<Utc>) -> String {
        let mut hasher = Sha256::new();
        hasher.update(owner_id.as_bytes());
        hasher.update(content.as_bytes());
        hasher.update(timestamp.to_rfc3339().as_bytes());
        let digest = format!("{:x}", hasher.finalize());
        digest[..16].to_string()
    }
}
