//! Cross-user dedup for mute votes.

use std::collections::HashMap;
use tracing::debug;

/// Per-target lists of users who already voted to mute them.
///
/// Transient: rebuilt empty on every guild reload. A sender may vote at
/// most once per target until the target's list is reset.
#[derive(Debug, Clone, Default)]
pub struct MuteVotes {
    votes: HashMap<String, Vec<String>>,
}

impl MuteVotes {
    /// Create an empty vote map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `sender`'s vote against `target`. Returns false when the
    /// sender already voted for this target.
    pub fn add_vote(&mut self, target: &str, sender: &str) -> bool {
        let senders = self.votes.entry(target.to_string()).or_default();
        if senders.iter().any(|s| s == sender) {
            return false;
        }
        debug!(target, sender, "Recording mute vote");
        senders.push(sender.to_string());
        true
    }

    /// Number of distinct votes against `target`.
    pub fn count(&self, target: &str) -> usize {
        self.votes.get(target).map(Vec::len).unwrap_or(0)
    }

    /// Clear the votes against `target`.
    pub fn reset(&mut self, target: &str) {
        self.votes.remove(target);
    }
}
