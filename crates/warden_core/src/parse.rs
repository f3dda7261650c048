//! Prefix-command parsing.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A command name and its whitespace-separated arguments, parsed from a
/// prefixed message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Getters)]
pub struct ParsedCommand {
    /// Invoked name, before alias resolution. May be empty when the
    /// message was just the prefix.
    name: String,
    /// Remaining arguments in message order.
    args: Vec<String>,
}

impl ParsedCommand {
    /// Parse `content` given the configured command prefix.
    ///
    /// The prefix is stripped when present; the first whitespace token
    /// becomes the name and the rest the arguments. Case is preserved so
    /// the dispatcher can apply its lowercase fallback itself.
    pub fn parse(content: &str, prefix: &str) -> Self {
        let body = content.strip_prefix(prefix).unwrap_or(content);
        let mut tokens = body.split_whitespace();
        let name = tokens.next().unwrap_or_default().to_string();
        let args = tokens.map(str::to_string).collect();
        Self { name, args }
    }

    /// Replace the command name, used by alias resolution.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}
