//! Per-guild message-governance engine.
//!
//! This crate wires the Warden data model and guard algorithms into the
//! full governance pipeline: an inbound message passes the moderation
//! gate first (blacklist screening with mute escalation), then either
//! command dispatch (for prefixed messages), the autorespond matcher, or
//! silent activity logging.
//!
//! # Architecture
//!
//! - [`GuildState`] - one guild's configuration, entities and caches
//! - [`Command`] / [`CommandRegistry`] - the pluggable command surface
//! - [`CommandDispatcher`] - alias resolution, permission evaluation,
//!   syntax validation, throttling, invocation
//! - [`MessageEngine`] - the top-level event handlers
//!
//! All failures are local to one event cycle: the engine logs and
//! swallows them, and a missing reply is itself the observable failure
//! signal.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builtin;
mod command;
mod config;
mod dispatch;
mod effects;
mod error;
mod guild;
mod handler;
mod message;
mod registry;
mod telemetry;
mod translate;

pub use builtin::ReloadCommand;
pub use command::{ClientHandle, Command, Invocation, OPERATOR_SENTINEL};
pub use config::{BotConfig, BotConfigBuilder};
pub use dispatch::CommandDispatcher;
pub use effects::{EmbedPayload, Outcome, Reply, SideEffect};
pub use error::{EngineError, EngineErrorKind, EngineResult};
pub use guild::GuildState;
pub use handler::MessageEngine;
pub use message::InboundMessage;
pub use registry::CommandRegistry;
pub use telemetry::init_telemetry;
pub use translate::{fill, TranslationTable};
