//! Top-level event handlers.

use crate::{
    BotConfig, ClientHandle, CommandDispatcher, CommandRegistry, EmbedPayload, EngineResult,
    GuildState, InboundMessage, Outcome, SideEffect,
};
use chrono::Utc;
use std::collections::HashMap;
use tracing::{debug, error, info, instrument, warn};
use warden_core::AuditEntry;
use warden_guard::Escalation;
use warden_storage::GuildStorage;

/// Accent color for blacklist audit embeds.
const AUDIT_COLOR: u32 = 0xCC0000;

/// The engine's top-level surface: one instance owns the configuration,
/// the dispatcher, the storage handle and every loaded guild.
///
/// Each handler processes one platform event to completion and returns
/// the cycle's outcome. [`SideEffect::SaveGuild`] requests are executed
/// here (the engine owns storage) and removed from the returned list;
/// everything else is the client collaborator's job. Failures inside a
/// cycle are logged and end the cycle, they never poison the engine.
pub struct MessageEngine {
    config: BotConfig,
    dispatcher: CommandDispatcher,
    storage: GuildStorage,
    guilds: HashMap<String, GuildState>,
}

impl MessageEngine {
    /// Create an engine over a command registry and a storage root.
    pub fn new(config: BotConfig, registry: CommandRegistry, storage: GuildStorage) -> Self {
        Self {
            config,
            dispatcher: CommandDispatcher::new(registry),
            storage,
            guilds: HashMap::new(),
        }
    }

    /// The engine configuration.
    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    /// Mutable access to the configuration.
    pub fn config_mut(&mut self) -> &mut BotConfig {
        &mut self.config
    }

    /// The dispatcher and its registry.
    pub fn dispatcher(&self) -> &CommandDispatcher {
        &self.dispatcher
    }

    /// The storage handle.
    pub fn storage(&self) -> &GuildStorage {
        &self.storage
    }

    /// The guild's state, loading it on first touch.
    pub fn guild_mut(&mut self, guild_id: &str) -> EngineResult<&mut GuildState> {
        if !self.guilds.contains_key(guild_id) {
            let guild = GuildState::load_or_create(&self.storage, guild_id)?;
            self.guilds.insert(guild_id.to_string(), guild);
        }
        Ok(self
            .guilds
            .entry(guild_id.to_string())
            .or_insert_with(|| GuildState::new(guild_id)))
    }

    /// Handle one inbound message to completion.
    ///
    /// Order: refresh the author's record, screen through the moderation
    /// gate (short-circuits on a hit), then dispatch prefixed messages,
    /// then the autorespond table, else stay silent.
    #[instrument(skip_all, fields(guild = %message.guild_id, author = %message.author_id))]
    pub async fn handle_message(
        &mut self,
        message: &InboundMessage,
        client: &dyn ClientHandle,
    ) -> EngineResult<Outcome> {
        if message.author_is_bot {
            return Ok(Outcome::none());
        }

        let operator = self.config.is_operator(&message.author_id);
        if !self.guilds.contains_key(&message.guild_id) {
            let loaded = GuildState::load_or_create(&self.storage, &message.guild_id)?;
            self.guilds.insert(message.guild_id.clone(), loaded);
        }
        let guild = self
            .guilds
            .entry(message.guild_id.clone())
            .or_insert_with(|| GuildState::new(&message.guild_id));
        guild.observe_author(message, Utc::now());

        if !operator && guild.gate().is_blacklisted(&message.content) {
            let outcome = Self::moderate(guild, message);
            return self.finish(&message.guild_id, outcome).await;
        }

        let outcome = if message.is_prefixed(self.config.command_prefix()) {
            self.dispatcher
                .dispatch(&self.config, message, guild, client)
                .await
        } else if guild.autorespond.has_match(&message.content) {
            // The cheap distance-1 check gates the looser distance-2
            // lookup, so a two-edit typo stays silent.
            debug!("Autorespond match");
            match guild.autorespond.lookup(&message.content) {
                Some(response) => Outcome::text(response),
                None => Outcome::none(),
            }
        } else {
            Outcome::none()
        };

        self.finish(&message.guild_id, outcome).await
    }

    /// Handle a member-join event: record the member and greet them on
    /// every join-kind channel.
    #[instrument(skip(self, client), fields(guild_id, user_id))]
    pub async fn handle_join(
        &mut self,
        guild_id: &str,
        user_id: &str,
        display_name: &str,
        client: &dyn ClientHandle,
    ) -> EngineResult<()> {
        let config = self.config.clone();
        let guild = self.guild_mut(guild_id)?;
        guild.observe_join(user_id, display_name, Utc::now());
        info!(user_id, "Member joined");

        let greetings: Vec<(String, String)> = guild
            .channels
            .by_kind("join")
            .into_iter()
            .filter_map(|ch| {
                guild
                    .message(&config, "general.greeting", &[display_name])
                    .map(|text| (ch.channel_id.clone(), text))
            })
            .collect();
        let guild_id = guild.id.clone();
        for (channel_id, text) in greetings {
            if let Err(err) = client.send_text(&channel_id, &text).await {
                warn!(%err, channel = %channel_id, "Greeting failed");
            }
        }

        self.save_guild(&guild_id)
    }

    /// Persist one loaded guild.
    pub fn save_guild(&mut self, guild_id: &str) -> EngineResult<()> {
        match self.guilds.get(guild_id) {
            Some(guild) => guild.save(&self.storage),
            None => Ok(()),
        }
    }

    // Build the moderation outcome for a confirmed blacklist hit:
    // delete, audit embed, audit entry on the member, mute on every
    // third hit, then persist.
    fn moderate(guild: &mut GuildState, message: &InboundMessage) -> Outcome {
        let pattern = guild
            .gate()
            .matched_pattern(&message.content)
            .unwrap_or_default()
            .to_string();
        info!(pattern = %pattern, "Blacklist hit");

        let escalation = guild.register_blacklist_hit(&message.author_id);
        let hits = guild
            .users
            .get(&message.author_id)
            .map(|u| u.blacklist_count)
            .unwrap_or_default();

        let entry = AuditEntry::new(
            &message.author_id,
            &format!("Blacklist hit on pattern '{pattern}'"),
            &message.author_id,
            &message.link(),
        );
        if let Some(user) = guild.users.get_mut(&message.author_id) {
            user.add_entry(entry);
        }

        let mut outcome = Outcome::none().with_effect(SideEffect::DeleteMessage {
            channel_id: message.channel_id.clone(),
            message_id: message.message_id.clone(),
        });

        if let Some(log_channel) = &guild.log_channel {
            let embed = EmbedPayload::new("Blacklist hit", message.content.clone())
                .field("User", message.author_name.clone())
                .field("Pattern", pattern)
                .field("Hits", hits.to_string())
                .field("Link", message.link())
                .color(AUDIT_COLOR);
            outcome = outcome.with_effect(SideEffect::AuditLog {
                channel_id: log_channel.clone(),
                embed,
            });
        }

        if escalation == Escalation::Mute {
            if let Some(role_id) = &guild.mute_role {
                outcome = outcome.with_effect(SideEffect::ApplyRole {
                    user_id: message.author_id.clone(),
                    role_id: role_id.clone(),
                });
            }
        }

        outcome.with_effect(SideEffect::SaveGuild)
    }

    // Execute SaveGuild requests and strip them from the outcome.
    async fn finish(&mut self, guild_id: &str, mut outcome: Outcome) -> EngineResult<Outcome> {
        let wants_save = outcome
            .effects
            .iter()
            .any(|e| matches!(e, SideEffect::SaveGuild));
        outcome
            .effects
            .retain(|e| !matches!(e, SideEffect::SaveGuild));
        if wants_save {
            if let Err(err) = self.save_guild(guild_id) {
                error!(%err, guild_id, "Guild save failed");
            }
        }
        Ok(outcome)
    }
}
