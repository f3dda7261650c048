//! Core data model for the Warden guild-governance engine.
//!
//! This crate provides the foundation types shared by the governance
//! pipeline: member and role records with wildcard permissions, channel
//! configurations, keyed entity stores, the command alias table, and the
//! prefix-command parser.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod alias;
mod audit;
mod channel;
mod parse;
mod permission;
mod role;
mod store;
mod user;

pub use alias::AliasTable;
pub use audit::AuditEntry;
pub use channel::ChannelConfig;
pub use parse::ParsedCommand;
pub use permission::{wildcard_match, PermissionSet};
pub use role::Role;
pub use store::{ChannelConfigStore, RoleStore, UserStore};
pub use user::User;

/// Platform-stable user identifier (snowflake rendered as a string).
pub type UserId = String;
/// Platform-stable role identifier.
pub type RoleId = String;
/// Platform-stable channel identifier.
pub type ChannelId = String;
/// Platform-stable guild identifier.
pub type GuildId = String;
/// Platform-stable message identifier.
pub type MessageId = String;
