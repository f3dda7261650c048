//! Side-effect requests produced by one dispatch cycle.
//!
//! Commands and the moderation path never call the platform directly;
//! they describe what should happen and the top-level handler executes
//! the requests through the client handle. One cycle yields at most one
//! visible reply plus zero or more side effects.

use serde::{Deserialize, Serialize};

/// A rich embed payload for replies and audit logs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbedPayload {
    /// Embed title.
    pub title: String,
    /// Embed body text.
    pub description: String,
    /// Accent color as a 24-bit RGB value.
    pub color: u32,
    /// Name/value field pairs in display order.
    pub fields: Vec<(String, String)>,
}

impl EmbedPayload {
    /// Create an embed with a title and body.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// Append a name/value field.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Set the accent color.
    pub fn color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }
}

/// The visible reply of a dispatch cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Reply {
    /// Plain text reply.
    Text(String),
    /// Rich embed reply.
    Embed(EmbedPayload),
}

/// A requested platform mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SideEffect {
    /// Delete a message.
    DeleteMessage {
        /// Channel hosting the message.
        channel_id: String,
        /// Message to delete.
        message_id: String,
    },
    /// Apply a role to a member.
    ApplyRole {
        /// Target member.
        user_id: String,
        /// Role to apply.
        role_id: String,
    },
    /// Post an audit embed to the guild's log channel.
    AuditLog {
        /// Configured log channel.
        channel_id: String,
        /// Embed to post.
        embed: EmbedPayload,
    },
    /// Persist the guild's state after this cycle.
    SaveGuild,
}

/// Everything one dispatch cycle asks of the outside world.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// At most one visible reply.
    pub reply: Option<Reply>,
    /// Side effects in execution order.
    pub effects: Vec<SideEffect>,
}

impl Outcome {
    /// No reply, no effects.
    pub fn none() -> Self {
        Self::default()
    }

    /// A plain text reply with no effects.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            reply: Some(Reply::Text(text.into())),
            effects: Vec::new(),
        }
    }

    /// An embed reply with no effects.
    pub fn embed(embed: EmbedPayload) -> Self {
        Self {
            reply: Some(Reply::Embed(embed)),
            effects: Vec::new(),
        }
    }

    /// Append a side effect.
    pub fn with_effect(mut self, effect: SideEffect) -> Self {
        self.effects.push(effect);
        self
    }
}
