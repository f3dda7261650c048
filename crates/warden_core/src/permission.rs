//! Wildcard-aware permission storage and evaluation.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Compare two permission strings with trailing-`*` prefix semantics.
///
/// Exact equality always matches. If either operand ends in `*`, the
/// other matches when it starts with the wildcard's prefix; the wildcard
/// may appear on either side. Both operands are trimmed before
/// comparison.
pub fn wildcard_match(a: &str, b: &str) -> bool {
    let a = a.trim();
    let b = b.trim();

    if a == b {
        return true;
    }
    if let Some(prefix) = a.strip_suffix('*') {
        return b.starts_with(prefix);
    }
    if let Some(prefix) = b.strip_suffix('*') {
        return a.starts_with(prefix);
    }
    false
}

/// Permission grants for a guild member.
///
/// Entries are plain permission names (`admin.config`) or trailing-`*`
/// wildcards (`admin.*`). Disabled entries mask enabled ones. The
/// `operator` flag marks a global administrator; it is computed per
/// invocation and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissionSet {
    /// Permissions explicitly granted.
    #[serde(default)]
    pub enabled: Vec<String>,
    /// Permissions explicitly revoked; these mask enabled entries.
    #[serde(default)]
    pub disabled: Vec<String>,
    /// Global operator flag, transient.
    #[serde(skip)]
    pub operator: bool,
}

impl PermissionSet {
    /// Create an empty permission set.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if some enabled entry matches `perm`.
    pub fn is_enabled(&self, perm: &str) -> bool {
        self.enabled.iter().any(|e| wildcard_match(e, perm))
    }

    /// True if some disabled entry matches `perm`.
    pub fn is_disabled(&self, perm: &str) -> bool {
        self.disabled.iter().any(|e| wildcard_match(e, perm))
    }

    /// Evaluate a single permission.
    ///
    /// Operators pass unconditionally; otherwise the permission must be
    /// enabled and not masked by a disabled entry.
    pub fn can_permission(&self, perm: &str) -> bool {
        if self.operator {
            return true;
        }
        self.is_enabled(perm) && !self.is_disabled(perm)
    }

    /// Evaluate a permission list in OR fashion.
    ///
    /// True if any entry passes [`Self::can_permission`], if the holder
    /// is an operator, or vacuously if the list is empty.
    pub fn can_permissions_or(&self, perms: &[String]) -> bool {
        if perms.iter().any(|p| self.can_permission(p)) {
            return true;
        }
        if self.operator {
            return true;
        }
        perms.is_empty()
    }

    /// Grant a permission. Idempotent: no entry is added when an
    /// equivalent exact or wildcard entry already enables it.
    pub fn enable(&mut self, perm: &str) {
        if !self.is_enabled(perm) {
            debug!(perm, "Enabling permission");
            self.enabled.push(perm.to_string());
        }
    }

    /// Revoke a permission. Idempotent in the same sense as
    /// [`Self::enable`].
    pub fn disable(&mut self, perm: &str) {
        if !self.is_disabled(perm) {
            debug!(perm, "Disabling permission");
            self.disabled.push(perm.to_string());
        }
    }

    /// Delete every stored entry that wildcard-matches `perm`, from both
    /// the enabled and disabled lists.
    pub fn remove(&mut self, perm: &str) {
        self.enabled.retain(|e| !wildcard_match(e, perm));
        self.disabled.retain(|e| !wildcard_match(e, perm));
    }

    /// Enabled entries not masked by a disabled entry.
    ///
    /// This is advisory data for invocation contexts; only
    /// [`Self::can_permission`] is authoritative.
    pub fn granted(&self) -> Vec<String> {
        self.enabled
            .iter()
            .filter(|e| !self.is_disabled(e))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_wildcard_exact() {
        assert!(wildcard_match("admin.config", "admin.config"));
        assert!(!wildcard_match("admin.config", "admin.other"));
    }

    #[test]
    fn test_wildcard_prefix_either_side() {
        assert!(wildcard_match("admin.*", "admin.config"));
        assert!(wildcard_match("admin.config", "admin.*"));
        assert!(!wildcard_match("mod.*", "admin.config"));
    }

    #[test]
    fn test_wildcard_trims_whitespace() {
        assert!(wildcard_match(" admin.config ", "admin.config"));
    }

    #[test]
    fn test_operator_overrides_everything() {
        let set = PermissionSet {
            enabled: vec![],
            disabled: strs(&["admin.config"]),
            operator: true,
        };
        assert!(set.can_permission("admin.config"));
        assert!(set.can_permissions_or(&strs(&["anything"])));
    }

    #[test]
    fn test_disabled_masks_enabled() {
        let mut set = PermissionSet::new();
        set.enable("admin.*");
        assert!(set.can_permission("admin.config"));
        set.disable("admin.config");
        assert!(!set.can_permission("admin.config"));
        assert!(set.can_permission("admin.other"));
    }

    #[test]
    fn test_or_is_vacuously_true_on_empty() {
        let set = PermissionSet::new();
        assert!(set.can_permissions_or(&[]));
        assert!(!set.can_permissions_or(&strs(&["admin.config"])));
    }

    #[test]
    fn test_enable_is_idempotent_under_wildcards() {
        let mut set = PermissionSet::new();
        set.enable("admin.*");
        set.enable("admin.config");
        assert_eq!(set.enabled.len(), 1);
    }

    #[test]
    fn test_remove_deletes_wildcard_matches() {
        let mut set = PermissionSet::new();
        set.enabled = strs(&["admin.config", "admin.feed", "mod.mute"]);
        set.disabled = strs(&["admin.feed"]);
        set.remove("admin.*");
        assert_eq!(set.enabled, strs(&["mod.mute"]));
        assert!(set.disabled.is_empty());
    }

    #[test]
    fn test_granted_filters_disabled() {
        let mut set = PermissionSet::new();
        set.enabled = strs(&["admin.config", "mod.mute"]);
        set.disabled = strs(&["mod.*"]);
        assert_eq!(set.granted(), strs(&["admin.config"]));
    }

    #[test]
    fn test_operator_flag_is_not_serialized() {
        let set = PermissionSet {
            enabled: strs(&["a"]),
            disabled: vec![],
            operator: true,
        };
        let json = serde_json::to_string(&set).expect("serialize");
        let back: PermissionSet = serde_json::from_str(&json).expect("deserialize");
        assert!(!back.operator);
        assert_eq!(back.enabled, set.enabled);
    }
}
