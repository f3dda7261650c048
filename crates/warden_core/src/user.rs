//! Guild member records.

use crate::{AuditEntry, PermissionSet};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A member as observed by the governance engine.
///
/// Created on the first observed interaction, mutated on every message,
/// name or role change, and only removed by an explicit admin command.
/// Every field defaults when absent from a stored record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    /// Platform-stable identifier.
    #[serde(default)]
    pub id: String,
    /// Current display name.
    #[serde(default)]
    pub display_name: String,
    /// Permission grants, including the transient operator flag.
    #[serde(default)]
    pub permissions: PermissionSet,
    /// Total messages observed from this member.
    #[serde(default)]
    pub message_count: u64,
    /// Cumulative blacklist hits. Monotonic; only an admin reset lowers it.
    #[serde(default)]
    pub blacklist_count: u64,
    /// Timestamp of the last observed message. `None` means never.
    #[serde(default)]
    pub last_message: Option<DateTime<Utc>>,
    /// Timestamp the member joined the guild. `None` means unknown.
    #[serde(default)]
    pub joined: Option<DateTime<Utc>>,
    /// Free-form audit entries.
    #[serde(default)]
    pub entries: Vec<AuditEntry>,
}

impl User {
    /// Create a fresh member record.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            ..Self::default()
        }
    }

    /// Record an observed message: bumps the counter and the
    /// last-message timestamp.
    pub fn record_message(&mut self, at: DateTime<Utc>) {
        self.message_count += 1;
        self.last_message = Some(at);
    }

    /// Update the display name when it changed. Returns true if a change
    /// was applied, so callers can log the rename.
    pub fn update_display_name(&mut self, name: &str) -> bool {
        if self.display_name.trim() != name.trim() {
            debug!(user = %self.id, from = %self.display_name, to = name, "Display name changed");
            self.display_name = name.to_string();
            true
        } else {
            false
        }
    }

    /// Record a blacklist hit and return the new cumulative count.
    pub fn record_blacklist_hit(&mut self) -> u64 {
        self.blacklist_count += 1;
        self.blacklist_count
    }

    /// Append an audit entry.
    pub fn add_entry(&mut self, entry: AuditEntry) {
        self.entries.push(entry);
    }

    /// Look up an audit entry by id.
    pub fn entry(&self, id: &str) -> Option<&AuditEntry> {
        self.entries.iter().find(|e| e.id == id)
    }
}
