//! Built-in commands.

use crate::{
    BotConfig, ClientHandle, Command, EngineResult, GuildState, InboundMessage, Invocation,
    Outcome, OPERATOR_SENTINEL,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use warden_core::ParsedCommand;
use warden_storage::GuildStorage;

/// Operator-only `reload`: rebuilds the guild from storage and drops
/// every transient cache (throttle counters, mute votes, quotes).
pub struct ReloadCommand {
    storage: Arc<GuildStorage>,
    permissions: Vec<String>,
}

impl ReloadCommand {
    /// Create the command over a storage handle.
    pub fn new(storage: Arc<GuildStorage>) -> Self {
        Self {
            storage,
            permissions: vec![OPERATOR_SENTINEL.to_string()],
        }
    }
}

#[async_trait]
impl Command for ReloadCommand {
    fn name(&self) -> &str {
        "reload"
    }

    fn permissions(&self) -> &[String] {
        &self.permissions
    }

    async fn run(
        &self,
        config: &BotConfig,
        _message: &InboundMessage,
        guild: &mut GuildState,
        _command: &ParsedCommand,
        _invocation: &Invocation,
        _client: &dyn ClientHandle,
    ) -> EngineResult<Outcome> {
        guild.reload(&self.storage)?;
        info!(guild = %guild.id, "Guild state reloaded");
        let reply = guild
            .message(config, "command.reload.success", &[])
            .unwrap_or_else(|| "Reload complete.".to_string());
        Ok(Outcome::text(reply))
    }
}
