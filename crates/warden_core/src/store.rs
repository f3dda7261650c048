//! Keyed in-memory entity collections backing guild state.
//!
//! All three stores index by entity id with O(1) lookup. `add` is
//! first-write-wins: bulk loads never clobber an existing record, while
//! explicit setter paths mutate fields in place via `get_mut`. Lookups
//! return `Option` rather than failing.

use crate::{ChannelConfig, Role, User};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Member records keyed by user id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserStore {
    #[serde(default)]
    users: HashMap<String, User>,
}

impl UserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a user. Returns false (and leaves the store untouched) if
    /// the id is already occupied.
    pub fn add(&mut self, user: User) -> bool {
        if self.users.contains_key(&user.id) {
            return false;
        }
        debug!(user = %user.id, "Adding user record");
        self.users.insert(user.id.clone(), user);
        true
    }

    /// Look up a user by id.
    pub fn get(&self, id: &str) -> Option<&User> {
        self.users.get(id)
    }

    /// Mutable lookup by id.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut User> {
        self.users.get_mut(id)
    }

    /// Delete a user record. Returns true if one was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        self.users.remove(id).is_some()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// True when no records are stored.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Iterate all records.
    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }
}

/// Role records keyed by role id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleStore {
    #[serde(default)]
    roles: HashMap<String, Role>,
}

impl RoleStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a role, first-write-wins.
    pub fn add(&mut self, role: Role) -> bool {
        if self.roles.contains_key(&role.id) {
            return false;
        }
        debug!(role = %role.id, "Adding role record");
        self.roles.insert(role.id.clone(), role);
        true
    }

    /// Look up a role by id.
    pub fn get(&self, id: &str) -> Option<&Role> {
        self.roles.get(id)
    }

    /// Mutable lookup by id.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Role> {
        self.roles.get_mut(id)
    }

    /// Delete a role record. Returns true if one was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        self.roles.remove(id).is_some()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// True when no records are stored.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Iterate all records.
    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.roles.values()
    }
}

/// Channel configurations keyed by derived configuration id.
///
/// One channel may host several configurations, so channel-id lookups
/// return every match.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelConfigStore {
    #[serde(default)]
    configs: HashMap<String, ChannelConfig>,
}

impl ChannelConfigStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a configuration, first-write-wins on the derived id.
    pub fn add(&mut self, config: ChannelConfig) -> bool {
        if self.configs.contains_key(&config.id) {
            return false;
        }
        debug!(config = %config.id, channel = %config.channel_id, "Adding channel config");
        self.configs.insert(config.id.clone(), config);
        true
    }

    /// Look up a configuration by derived id.
    pub fn get(&self, id: &str) -> Option<&ChannelConfig> {
        self.configs.get(id)
    }

    /// Mutable lookup by derived id.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut ChannelConfig> {
        self.configs.get_mut(id)
    }

    /// Delete a configuration. Returns true if one was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        self.configs.remove(id).is_some()
    }

    /// Every configuration hosted on `channel_id`.
    pub fn by_channel(&self, channel_id: &str) -> Vec<&ChannelConfig> {
        self.configs
            .values()
            .filter(|c| c.channel_id == channel_id)
            .collect()
    }

    /// Every configuration with the given kind tag.
    pub fn by_kind(&self, kind: &str) -> Vec<&ChannelConfig> {
        self.configs.values().filter(|c| c.kind == kind).collect()
    }

    /// True if any configuration lives on `channel_id`.
    pub fn has_channel(&self, channel_id: &str) -> bool {
        self.configs.values().any(|c| c.channel_id == channel_id)
    }

    /// Number of stored configurations.
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// True when no configurations are stored.
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Iterate all configurations.
    pub fn iter(&self) -> impl Iterator<Item = &ChannelConfig> {
        self.configs.values()
    }
}
