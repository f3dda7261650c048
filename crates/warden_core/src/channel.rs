//! Per-channel feature configurations.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One feature configuration hosted on a channel.
///
/// A channel may host several configurations (for example two feeds plus
/// a join greeter), so each carries a derived configuration id that is
/// stable across reloads: a truncated SHA-256 over channel id + feed url.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Derived configuration id; see [`ChannelConfig::refresh_id`].
    #[serde(default)]
    pub id: String,
    /// The channel this configuration lives on.
    #[serde(default)]
    pub channel_id: String,
    /// External feed url, empty for non-feed kinds.
    #[serde(default)]
    pub feed_url: String,
    /// Display title for rendered output.
    #[serde(default)]
    pub title: String,
    /// Display color for rendered output (hex string).
    #[serde(default)]
    pub color: String,
    /// Kind tag, e.g. `"join"` or `"feed"`.
    #[serde(default)]
    pub kind: String,
}

impl ChannelConfig {
    /// Create a configuration and derive its id.
    pub fn new(
        channel_id: impl Into<String>,
        feed_url: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        let mut config = Self {
            channel_id: channel_id.into(),
            feed_url: feed_url.into(),
            kind: kind.into(),
            ..Self::default()
        };
        config.refresh_id();
        config
    }

    /// Recompute the derived id from channel id and feed url.
    ///
    /// Call after mutating either field. The id is the first 12 hex
    /// characters of the digest, short enough to quote in commands.
    pub fn refresh_id(&mut self) {
        let mut hasher = Sha256::new();
        hasher.update(self.channel_id.as_bytes());
        hasher.update(self.feed_url.as_bytes());
        let digest = format!("{:x}", hasher.finalize());
        self.id = digest[..12].to_string();
    }
}
