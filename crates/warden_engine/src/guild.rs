//! Per-guild governance state.

use crate::{fill, BotConfig, EngineResult, Invocation, OPERATOR_SENTINEL};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, instrument};
use warden_core::{AliasTable, ChannelConfigStore, Role, RoleStore, User, UserStore};
use warden_guard::{AutorespondTable, Blacklist, ModerationGate, MuteVotes, ThrottleCache};
use warden_storage::{GuildStorage, StorageErrorKind};

/// One guild's configuration, entities and transient caches.
///
/// The serialized form is the guild root record; entity stores persist
/// as separate per-entity files and everything marked `#[serde(skip)]`
/// is rebuilt empty on every load. A load replaces the whole in-memory
/// state, never a partial merge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuildState {
    /// Platform-stable guild id.
    #[serde(default)]
    pub id: String,
    /// Language code override; `None` falls back to the engine default.
    #[serde(default)]
    pub language: Option<String>,
    /// Role applied on mute escalation. `None` disables muting.
    #[serde(default)]
    pub mute_role: Option<String>,
    /// Channel receiving audit embeds. `None` drops them.
    #[serde(default)]
    pub log_channel: Option<String>,
    /// Standard wiki branch consulted by lookup commands.
    #[serde(default)]
    pub wiki_branch: String,
    /// Command alias map.
    #[serde(default)]
    pub aliases: AliasTable,
    /// Guild-level translation overrides, consulted before the global
    /// table.
    #[serde(default)]
    pub overrides: HashMap<String, String>,
    /// Typo-tolerant trigger/response table.
    #[serde(default)]
    pub autorespond: AutorespondTable,
    /// Canonical names of commands disabled on this guild.
    #[serde(default)]
    pub deactivated: HashSet<String>,
    /// Raw blacklist entries as configured. The compiled gate is rebuilt
    /// from these on load and on every mutation.
    #[serde(default)]
    pub blacklist: Vec<String>,

    /// Member records, persisted individually.
    #[serde(skip)]
    pub users: UserStore,
    /// Role records, persisted individually.
    #[serde(skip)]
    pub roles: RoleStore,
    /// Channel configurations, persisted individually.
    #[serde(skip)]
    pub channels: ChannelConfigStore,
    /// Per-command frequency counters, transient.
    #[serde(skip)]
    pub throttle: ThrottleCache,
    /// Mute-vote dedup, transient.
    #[serde(skip)]
    pub mute_votes: MuteVotes,
    /// Quotes collected this session, transient.
    #[serde(skip)]
    pub quotes: Vec<String>,
    #[serde(skip)]
    gate: ModerationGate,
}

impl GuildState {
    /// Create a fresh guild with empty state.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// The effective language code for reply lookups.
    pub fn language<'a>(&'a self, config: &'a BotConfig) -> &'a str {
        self.language.as_deref().unwrap_or(config.language())
    }

    /// Resolve a reply template: guild override first, then the global
    /// table for the effective language.
    pub fn template<'a>(&'a self, config: &'a BotConfig, key: &str) -> Option<&'a str> {
        self.overrides
            .get(key)
            .map(String::as_str)
            .or_else(|| config.translations().get(self.language(config), key))
    }

    /// Resolve a template and fill its positional placeholders. `None`
    /// when neither layer defines the key.
    pub fn message(&self, config: &BotConfig, key: &str, args: &[&str]) -> Option<String> {
        self.template(config, key).map(|t| fill(t, args))
    }

    /// Set a guild-level translation override.
    pub fn set_override(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.overrides.insert(key.into(), template.into());
    }

    /// Delete a guild-level translation override. Returns true if one
    /// existed.
    pub fn remove_override(&mut self, key: &str) -> bool {
        self.overrides.remove(key).is_some()
    }

    /// Disable a command on this guild.
    pub fn deactivate(&mut self, name: &str) {
        info!(guild = %self.id, command = name, "Deactivating command");
        self.deactivated.insert(name.to_string());
    }

    /// Re-enable a command. Returns true if it was deactivated.
    pub fn activate(&mut self, name: &str) -> bool {
        self.deactivated.remove(name)
    }

    /// True when `name` is deactivated here.
    pub fn is_deactivated(&self, name: &str) -> bool {
        self.deactivated.contains(name)
    }

    /// The compiled moderation gate.
    pub fn gate(&self) -> &ModerationGate {
        &self.gate
    }

    /// Mutable access to the gate, for the escalation path.
    pub fn gate_mut(&mut self) -> &mut ModerationGate {
        &mut self.gate
    }

    /// True when a mute role is configured.
    pub fn mute_role_configured(&self) -> bool {
        self.mute_role.is_some()
    }

    /// Add a blacklist entry, validating regex entries strictly.
    pub fn add_blacklist_entry(&mut self, entry: &str) -> EngineResult<()> {
        self.gate.blacklist_mut().add(entry)?;
        self.blacklist.push(entry.to_string());
        Ok(())
    }

    /// Remove a blacklist entry. Returns true if one existed.
    pub fn remove_blacklist_entry(&mut self, entry: &str) -> bool {
        let removed = self.gate.blacklist_mut().remove(entry);
        self.blacklist.retain(|e| e != entry);
        removed
    }

    /// Recompile the gate from the raw blacklist entries. Invalid
    /// entries are skipped with a warning, matching the load path.
    pub fn rebuild_gate(&mut self) {
        self.gate = ModerationGate::new(Blacklist::compile(&self.blacklist));
    }

    /// Refresh the author's member record for an observed interaction:
    /// create on first sight, track renames, bump the message counter,
    /// and create records for previously-unseen roles.
    #[instrument(skip(self, message), fields(guild = %self.id, author = %message.author_id))]
    pub fn observe_author(&mut self, message: &crate::InboundMessage, now: DateTime<Utc>) {
        if self.users.get(&message.author_id).is_none() {
            info!(author = %message.author_id, "First sighting, creating member record");
            self.users
                .add(User::new(&message.author_id, &message.author_name));
        }
        if let Some(user) = self.users.get_mut(&message.author_id) {
            user.update_display_name(&message.author_name);
            user.record_message(now);
        }
        for role_id in &message.role_ids {
            if self.roles.get(role_id).is_none() {
                debug!(role = %role_id, "Discovered new role");
                self.roles.add(Role::new(role_id));
            }
        }
    }

    /// Record a confirmed blacklist hit against `author_id` and decide
    /// escalation. Unknown authors yield no escalation.
    pub fn register_blacklist_hit(&mut self, author_id: &str) -> warden_guard::Escalation {
        let mute_configured = self.mute_role.is_some();
        match self.users.get_mut(author_id) {
            Some(user) => self.gate.register_hit(user, mute_configured),
            None => warden_guard::Escalation::None,
        }
    }

    /// Record a member join: create the record if needed and stamp the
    /// join time. A rejoin keeps the original timestamp.
    pub fn observe_join(&mut self, user_id: &str, display_name: &str, now: DateTime<Utc>) {
        self.users.add(User::new(user_id, display_name));
        if let Some(user) = self.users.get_mut(user_id) {
            if user.joined.is_none() {
                user.joined = Some(now);
            }
        }
    }

    /// Evaluate the dispatch permission rule for `author` against a
    /// command's required-permission list.
    ///
    /// Permitted when the user's own set or any held role grants the
    /// list in OR fashion, unless the list leads with the operator
    /// sentinel and the author is not a configured operator. Operators
    /// always pass.
    pub fn permits(
        &self,
        config: &BotConfig,
        message: &crate::InboundMessage,
        required: &[String],
    ) -> bool {
        let operator = config.is_operator(&message.author_id);
        if operator {
            return true;
        }
        if required.first().map(String::as_str) == Some(OPERATOR_SENTINEL) {
            return false;
        }

        let user_grants = self
            .users
            .get(&message.author_id)
            .map(|u| u.permissions.can_permissions_or(required))
            .unwrap_or(required.is_empty());
        let role_grants = message.role_ids.iter().any(|id| {
            self.roles
                .get(id)
                .map(|r| r.can_permissions_or(required))
                .unwrap_or(false)
        });

        user_grants || role_grants
    }

    /// Build the advisory invocation context: the union of the author's
    /// direct enabled permissions and every held role's enabled set,
    /// unfiltered by disabled entries.
    pub fn invocation_for(
        &self,
        config: &BotConfig,
        message: &crate::InboundMessage,
    ) -> Invocation {
        let mut seen = HashSet::new();
        let mut permissions = Vec::new();

        if let Some(user) = self.users.get(&message.author_id) {
            for perm in &user.permissions.enabled {
                if seen.insert(perm.clone()) {
                    permissions.push(perm.clone());
                }
            }
        }
        for role_id in &message.role_ids {
            if let Some(role) = self.roles.get(role_id) {
                for perm in &role.enabled {
                    if seen.insert(perm.clone()) {
                        permissions.push(perm.clone());
                    }
                }
            }
        }

        Invocation::new(
            &message.author_id,
            permissions,
            config.is_operator(&message.author_id),
        )
    }

    /// Load a guild from storage, replacing every collection and
    /// rebuilding the compiled gate. Transient caches come back empty.
    #[instrument(skip(storage), fields(guild_id))]
    pub fn load(storage: &GuildStorage, guild_id: &str) -> EngineResult<Self> {
        let mut guild: GuildState = storage.load_record(guild_id)?;
        guild.id = guild_id.to_string();

        for user in storage.load_collection::<User>(guild_id, "users")? {
            guild.users.add(user);
        }
        for role in storage.load_collection::<Role>(guild_id, "roles")? {
            guild.roles.add(role);
        }
        for channel in
            storage.load_collection::<warden_core::ChannelConfig>(guild_id, "channels")?
        {
            guild.channels.add(channel);
        }

        guild.rebuild_gate();
        info!(
            guild_id,
            users = guild.users.len(),
            roles = guild.roles.len(),
            channels = guild.channels.len(),
            "Loaded guild state"
        );
        Ok(guild)
    }

    /// Load a guild, creating a fresh record when none is stored yet.
    pub fn load_or_create(storage: &GuildStorage, guild_id: &str) -> EngineResult<Self> {
        match storage.load_record::<GuildState>(guild_id) {
            Ok(_) => Self::load(storage, guild_id),
            Err(err) if is_not_found(&err.kind) => {
                debug!(guild_id, "No stored record, starting fresh");
                Ok(Self::new(guild_id))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Persist the root record and every entity.
    #[instrument(skip(self, storage), fields(guild = %self.id))]
    pub fn save(&self, storage: &GuildStorage) -> EngineResult<()> {
        storage.save_record(&self.id, self)?;
        for user in self.users.iter() {
            storage.save_entity(&self.id, "users", &user.id, user)?;
        }
        for role in self.roles.iter() {
            storage.save_entity(&self.id, "roles", &role.id, role)?;
        }
        for channel in self.channels.iter() {
            storage.save_entity(&self.id, "channels", &channel.id, channel)?;
        }
        Ok(())
    }

    /// Rebuild this guild from storage, discarding transient caches.
    pub fn reload(&mut self, storage: &GuildStorage) -> EngineResult<()> {
        *self = Self::load(storage, &self.id)?;
        Ok(())
    }
}

fn is_not_found(kind: &StorageErrorKind) -> bool {
    matches!(kind, StorageErrorKind::NotFound(_))
}
