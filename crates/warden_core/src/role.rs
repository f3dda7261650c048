//! Guild role records.

use crate::wildcard_match;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A platform role as tracked by the governance engine.
///
/// Roles carry enabled permissions only; there is no disabled mask and no
/// operator flag at the role level. Wildcard semantics match
/// [`crate::PermissionSet`]. Created when a previously-unseen platform
/// role is observed, mutated by permission-grant commands.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Role {
    /// Platform-stable identifier.
    #[serde(default)]
    pub id: String,
    /// Permissions granted to holders of this role.
    #[serde(default)]
    pub enabled: Vec<String>,
}

impl Role {
    /// Create an empty role record.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            enabled: Vec::new(),
        }
    }

    /// True if some enabled entry wildcard-matches `perm`.
    pub fn can_permission(&self, perm: &str) -> bool {
        self.enabled.iter().any(|e| wildcard_match(e, perm))
    }

    /// OR-evaluation over a permission list; vacuously true when empty.
    pub fn can_permissions_or(&self, perms: &[String]) -> bool {
        perms.iter().any(|p| self.can_permission(p)) || perms.is_empty()
    }

    /// Grant a permission, idempotent under wildcard equivalence.
    pub fn enable(&mut self, perm: &str) {
        if !self.can_permission(perm) {
            debug!(role = %self.id, perm, "Enabling role permission");
            self.enabled.push(perm.to_string());
        }
    }

    /// Delete every entry that wildcard-matches `perm`.
    pub fn remove(&mut self, perm: &str) {
        self.enabled.retain(|e| !wildcard_match(e, perm));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wildcard_grant() {
        let mut role = Role::new("123");
        role.enable("mod.*");
        assert!(role.can_permission("mod.mute"));
        assert!(!role.can_permission("admin.config"));
    }

    #[test]
    fn test_role_or_vacuous() {
        let role = Role::new("123");
        assert!(role.can_permissions_or(&[]));
        assert!(!role.can_permissions_or(&["mod.mute".to_string()]));
    }

    #[test]
    fn test_role_enable_idempotent() {
        let mut role = Role::new("123");
        role.enable("mod.*");
        role.enable("mod.mute");
        assert_eq!(role.enabled.len(), 1);
    }

    #[test]
    fn test_role_remove_wildcard() {
        let mut role = Role::new("123");
        role.enabled = vec!["mod.mute".to_string(), "admin.config".to_string()];
        role.remove("mod.*");
        assert_eq!(role.enabled, vec!["admin.config".to_string()]);
    }
}
