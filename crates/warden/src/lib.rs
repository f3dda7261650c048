//! Warden: a per-guild message-governance engine for chat-platform
//! community bots.
//!
//! Warden screens every inbound message through a blacklist moderation
//! gate with mute escalation, dispatches prefixed commands through a
//! permission-, syntax- and frequency-checked pipeline, and answers
//! common questions through a typo-tolerant autorespond table. Guild
//! state persists as JSON records with schema defaults.
//!
//! The workspace splits into:
//!
//! - [`warden_core`] - the data model: users, roles, channel configs,
//!   wildcard permissions, alias table, command parser
//! - [`warden_guard`] - governance algorithms: blacklist, moderation
//!   gate, throttle cache, fuzzy matching, mute votes
//! - [`warden_storage`] - filesystem persistence for guild records
//! - [`warden_engine`] - guild state, dispatch pipeline and the
//!   top-level [`MessageEngine`]
//!
//! This crate re-exports the public surface of all four.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use warden::{
//!     BotConfig, CommandRegistry, GuildStorage, MessageEngine, ReloadCommand,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = Arc::new(GuildStorage::new("data/guilds")?);
//! let mut registry = CommandRegistry::new();
//! registry.register(Arc::new(ReloadCommand::new(Arc::clone(&storage))));
//!
//! let engine = MessageEngine::new(
//!     BotConfig::default(),
//!     registry,
//!     GuildStorage::new("data/guilds")?,
//! );
//! # let _ = engine;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use warden_core::{
    wildcard_match, AliasTable, AuditEntry, ChannelConfig, ChannelConfigStore, ChannelId, GuildId,
    MessageId, ParsedCommand, PermissionSet, Role, RoleId, RoleStore, User, UserId, UserStore,
};
pub use warden_engine::{
    fill, init_telemetry, BotConfig, BotConfigBuilder, ClientHandle, Command, CommandDispatcher,
    CommandRegistry, EmbedPayload, EngineError, EngineErrorKind, EngineResult, GuildState,
    InboundMessage, Invocation, MessageEngine, Outcome, ReloadCommand, Reply, SideEffect,
    TranslationTable, OPERATOR_SENTINEL,
};
pub use warden_guard::{
    levenshtein, normalize, AutorespondTable, Blacklist, Escalation, FrequencyLimit, GuardError,
    GuardErrorKind, GuardResult, ModerationGate, MuteVotes, ThrottleCache,
};
pub use warden_storage::{GuildStorage, StorageError, StorageErrorKind, StorageResult};
