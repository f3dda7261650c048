//! Inbound message value object.

use serde::{Deserialize, Serialize};

/// One message event as delivered by the platform client.
///
/// A plain value object: the engine never talks to the wire protocol
/// directly, the client collaborator translates its native event into
/// this shape before handing it over.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Guild the message was posted in.
    pub guild_id: String,
    /// Channel the message was posted in.
    pub channel_id: String,
    /// Platform message id.
    pub message_id: String,
    /// Message text.
    pub content: String,
    /// Author's user id.
    pub author_id: String,
    /// Author's current display name.
    pub author_name: String,
    /// True when the author is a bot account.
    pub author_is_bot: bool,
    /// Role ids held by the author, in platform order.
    pub role_ids: Vec<String>,
}

impl InboundMessage {
    /// True when `content` starts with the configured command prefix.
    pub fn is_prefixed(&self, prefix: &str) -> bool {
        self.content.starts_with(prefix)
    }

    /// Permanent link to this message, for audit embeds.
    pub fn link(&self) -> String {
        format!(
            "https://discord.com/channels/{}/{}/{}",
            self.guild_id, self.channel_id, self.message_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_detection() {
        let msg = InboundMessage {
            content: "!ping".to_string(),
            ..InboundMessage::default()
        };
        assert!(msg.is_prefixed("!"));
        assert!(!msg.is_prefixed("?"));
    }

    #[test]
    fn test_link_shape() {
        let msg = InboundMessage {
            guild_id: "1".to_string(),
            channel_id: "2".to_string(),
            message_id: "3".to_string(),
            ..InboundMessage::default()
        };
        assert_eq!(msg.link(), "https://discord.com/channels/1/2/3");
    }
}
