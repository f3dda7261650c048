//! Command registry.

use crate::Command;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Explicit command table, keyed by canonical name.
///
/// Built once at startup and passed into the dispatcher at construction;
/// no process-wide static state. Registration is last-write-wins so a
/// host can override a built-in.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Arc<dyn Command>>,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command under its canonical name.
    pub fn register(&mut self, command: Arc<dyn Command>) {
        debug!(command = command.name(), "Registering command");
        self.commands.insert(command.name().to_string(), command);
    }

    /// Look up a command by canonical name. Exact match only; alias and
    /// case fallback live in the dispatcher.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Command>> {
        self.commands.get(name)
    }

    /// True if a command is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Registered canonical names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BotConfig, EngineResult, GuildState, InboundMessage, Invocation, Outcome};
    use async_trait::async_trait;
    use warden_core::ParsedCommand;

    struct Named(&'static str);

    #[async_trait]
    impl Command for Named {
        fn name(&self) -> &str {
            self.0
        }

        async fn run(
            &self,
            _config: &BotConfig,
            _message: &InboundMessage,
            _guild: &mut GuildState,
            _command: &ParsedCommand,
            _invocation: &Invocation,
            _client: &dyn crate::ClientHandle,
        ) -> EngineResult<Outcome> {
            Ok(Outcome::none())
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = CommandRegistry::new();
        registry.register(Arc::new(Named("ping")));
        registry.register(Arc::new(Named("quote")));
        assert!(registry.contains("ping"));
        assert!(registry.get("missing").is_none());
        assert_eq!(registry.names(), vec!["ping", "quote"]);
    }

    #[test]
    fn test_registration_is_last_write_wins() {
        let mut registry = CommandRegistry::new();
        registry.register(Arc::new(Named("ping")));
        registry.register(Arc::new(Named("ping")));
        assert_eq!(registry.len(), 1);
    }
}
