//! The command dispatch pipeline.

use crate::{
    BotConfig, ClientHandle, CommandRegistry, EngineError, EngineErrorKind, EngineResult,
    GuildState, InboundMessage, Outcome,
};
use std::sync::Arc;
use tracing::{debug, error, instrument};
use warden_core::ParsedCommand;

/// Longest accepted command name; anything past this gets the too-long
/// reply instead of a lookup.
const MAX_NAME_LENGTH: usize = 1000;

/// Alias resolution, lookup, gating and invocation for prefixed
/// messages.
///
/// The pipeline runs parse, alias resolution, registry lookup,
/// deactivation check, permission check, syntax validation, throttle
/// check and finally invocation, stopping at the first failure. Every
/// failure maps to a translated reply (or silence); the error value
/// never escapes [`Self::dispatch`].
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    registry: CommandRegistry,
}

impl CommandDispatcher {
    /// Create a dispatcher over an explicit registry.
    pub fn new(registry: CommandRegistry) -> Self {
        Self { registry }
    }

    /// The backing registry.
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Run one prefixed message through the pipeline.
    ///
    /// Always yields an outcome: pipeline failures become translated
    /// replies, internal faults are logged and swallowed.
    #[instrument(skip_all, fields(guild = %guild.id, author = %message.author_id))]
    pub async fn dispatch(
        &self,
        config: &BotConfig,
        message: &InboundMessage,
        guild: &mut GuildState,
        client: &dyn ClientHandle,
    ) -> Outcome {
        match self.try_dispatch(config, message, guild, client).await {
            Ok(outcome) => outcome,
            Err(err) => self.failure_reply(config, guild, &err),
        }
    }

    async fn try_dispatch(
        &self,
        config: &BotConfig,
        message: &InboundMessage,
        guild: &mut GuildState,
        client: &dyn ClientHandle,
    ) -> EngineResult<Outcome> {
        let mut parsed = ParsedCommand::parse(&message.content, config.command_prefix());

        if parsed.name().is_empty() {
            return Err(EngineError::new(EngineErrorKind::EmptyName));
        }
        let name_length = parsed.name().chars().count();
        if name_length > MAX_NAME_LENGTH {
            return Err(EngineError::new(EngineErrorKind::NameTooLong {
                length: name_length,
            }));
        }

        // Alias resolution, applied once. When the resolved name misses
        // the registry, lowercase the resolved name and retry resolution
        // plus lookup exactly one more level, never recursively.
        let direct = guild
            .aliases
            .resolve(parsed.name())
            .unwrap_or(parsed.name())
            .to_string();
        let command = match self.registry.get(&direct) {
            Some(command) => Arc::clone(command),
            None => {
                let lowered = direct.to_lowercase();
                let retried = guild
                    .aliases
                    .resolve(&lowered)
                    .unwrap_or(&lowered)
                    .to_string();
                match self.registry.get(&retried) {
                    Some(command) => Arc::clone(command),
                    None => {
                        return Err(EngineError::new(EngineErrorKind::NotFound {
                            name: parsed.name().to_string(),
                        }))
                    }
                }
            }
        };
        parsed.set_name(command.name());
        debug!(command = command.name(), "Resolved command");

        if guild.is_deactivated(command.name()) {
            return Err(EngineError::new(EngineErrorKind::Deactivated {
                name: command.name().to_string(),
            }));
        }

        if !guild.permits(config, message, command.permissions()) {
            return Err(EngineError::new(EngineErrorKind::PermissionDenied {
                name: command.name().to_string(),
            }));
        }

        if !command.validate_syntax(&parsed) {
            return Err(EngineError::new(EngineErrorKind::InvalidSyntax {
                name: command.name().to_string(),
            }));
        }

        if let Some(limit) = command.frequency() {
            let operator = config.is_operator(&message.author_id);
            guild.throttle.check(command.name(), limit, operator)?;
        }

        let invocation = guild.invocation_for(config, message);
        command
            .run(config, message, guild, &parsed, &invocation, client)
            .await
    }

    fn failure_reply(&self, config: &BotConfig, guild: &GuildState, err: &EngineError) -> Outcome {
        let reply = match err.kind() {
            EngineErrorKind::EmptyName => None,
            EngineErrorKind::NameTooLong { .. } => guild.message(config, "command.too_long", &[]),
            EngineErrorKind::NotFound { name } => {
                guild.message(config, "command.not_found", &[name.as_str()])
            }
            EngineErrorKind::Deactivated { .. } => {
                guild.message(config, "general.deactivated", &[])
            }
            EngineErrorKind::PermissionDenied { .. } => {
                guild.message(config, "command.no_permission", &[])
            }
            EngineErrorKind::InvalidSyntax { name } => guild.message(
                config,
                "command.invalid_syntax",
                &[config.command_prefix().as_str(), name.as_str()],
            ),
            EngineErrorKind::FrequencyExceeded { name } => {
                guild.message(config, &format!("command.{name}.frequency"), &[])
            }
            EngineErrorKind::ExternalService { .. } | EngineErrorKind::Storage(_) => {
                error!(%err, "Dispatch failed");
                None
            }
        };
        match reply {
            Some(text) => Outcome::text(text),
            None => Outcome::none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Command, Invocation, Reply};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use warden_guard::FrequencyLimit;

    struct NullClient;

    #[async_trait]
    impl ClientHandle for NullClient {
        async fn delete_message(&self, _: &str, _: &str) -> EngineResult<()> {
            Ok(())
        }
        async fn apply_role(&self, _: &str, _: &str) -> EngineResult<()> {
            Ok(())
        }
        async fn send_text(&self, _: &str, _: &str) -> EngineResult<()> {
            Ok(())
        }
    }

    struct Ping {
        runs: AtomicUsize,
        permissions: Vec<String>,
        frequency: Option<FrequencyLimit>,
        min_args: usize,
    }

    impl Ping {
        fn plain() -> Self {
            Self {
                runs: AtomicUsize::new(0),
                permissions: Vec::new(),
                frequency: None,
                min_args: 0,
            }
        }
    }

    #[async_trait]
    impl Command for Ping {
        fn name(&self) -> &str {
            "ping"
        }
        fn permissions(&self) -> &[String] {
            &self.permissions
        }
        fn frequency(&self) -> Option<FrequencyLimit> {
            self.frequency
        }
        fn validate_syntax(&self, command: &ParsedCommand) -> bool {
            command.args().len() >= self.min_args
        }

        async fn run(
            &self,
            _config: &BotConfig,
            _message: &InboundMessage,
            _guild: &mut GuildState,
            _command: &ParsedCommand,
            _invocation: &Invocation,
            _client: &dyn ClientHandle,
        ) -> EngineResult<Outcome> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            Ok(Outcome::text("pong"))
        }
    }

    fn config() -> BotConfig {
        let mut config = BotConfig::default();
        let t = config.translations_mut();
        t.set("en", "command.not_found", "No such command: {1}");
        t.set("en", "command.too_long", "Command name too long.");
        t.set("en", "general.deactivated", "This command is deactivated.");
        t.set("en", "command.no_permission", "You lack permission.");
        t.set("en", "command.invalid_syntax", "Usage: {1}{2} …");
        t.set("en", "command.ping.frequency", "Slow down.");
        config
    }

    fn message(content: &str) -> InboundMessage {
        InboundMessage {
            guild_id: "g".to_string(),
            author_id: "1".to_string(),
            author_name: "alice".to_string(),
            content: content.to_string(),
            ..InboundMessage::default()
        }
    }

    fn dispatcher(command: Ping) -> CommandDispatcher {
        let mut registry = CommandRegistry::new();
        registry.register(Arc::new(command));
        CommandDispatcher::new(registry)
    }

    fn guild() -> GuildState {
        let mut guild = GuildState::new("g");
        guild.observe_author(&message("!x"), Utc::now());
        guild
    }

    fn text(outcome: &Outcome) -> Option<&str> {
        match &outcome.reply {
            Some(Reply::Text(t)) => Some(t.as_str()),
            _ => None,
        }
    }

    #[tokio::test]
    async fn test_direct_invocation() {
        let dispatcher = dispatcher(Ping::plain());
        let mut guild = guild();
        let outcome = dispatcher
            .dispatch(&config(), &message("!ping"), &mut guild, &NullClient)
            .await;
        assert_eq!(text(&outcome), Some("pong"));
    }

    #[tokio::test]
    async fn test_alias_resolves_once() {
        let dispatcher = dispatcher(Ping::plain());
        let mut guild = guild();
        guild.aliases.set("p", "ping");
        let outcome = dispatcher
            .dispatch(&config(), &message("!p"), &mut guild, &NullClient)
            .await;
        assert_eq!(text(&outcome), Some("pong"));
    }

    #[tokio::test]
    async fn test_lowercase_fallback() {
        let dispatcher = dispatcher(Ping::plain());
        let mut guild = guild();
        guild.aliases.set("p", "ping");
        for content in ["!Ping", "!P"] {
            let outcome = dispatcher
                .dispatch(&config(), &message(content), &mut guild, &NullClient)
                .await;
            assert_eq!(text(&outcome), Some("pong"), "content {content}");
        }
    }

    #[tokio::test]
    async fn test_lowercase_fallback_applies_to_resolved_name() {
        let dispatcher = dispatcher(Ping::plain());
        let mut guild = guild();
        // Alias targets the wrong case; the fallback lowercases the
        // resolved name, not the invoked one.
        guild.aliases.set("p", "PING");
        let outcome = dispatcher
            .dispatch(&config(), &message("!p"), &mut guild, &NullClient)
            .await;
        assert_eq!(text(&outcome), Some("pong"));
    }

    #[tokio::test]
    async fn test_alias_chain_does_not_fully_resolve() {
        let dispatcher = dispatcher(Ping::plain());
        let mut guild = guild();
        guild.aliases.set("a", "b");
        guild.aliases.set("b", "ping");
        let outcome = dispatcher
            .dispatch(&config(), &message("!a"), &mut guild, &NullClient)
            .await;
        assert_eq!(text(&outcome), Some("No such command: a"));
    }

    #[tokio::test]
    async fn test_empty_name_is_silent() {
        let dispatcher = dispatcher(Ping::plain());
        let mut guild = guild();
        let outcome = dispatcher
            .dispatch(&config(), &message("!"), &mut guild, &NullClient)
            .await;
        assert_eq!(outcome, Outcome::none());
    }

    #[tokio::test]
    async fn test_too_long_name_replies() {
        let dispatcher = dispatcher(Ping::plain());
        let mut guild = guild();
        let content = format!("!{}", "x".repeat(1001));
        let outcome = dispatcher
            .dispatch(&config(), &message(&content), &mut guild, &NullClient)
            .await;
        assert_eq!(text(&outcome), Some("Command name too long."));
    }

    #[tokio::test]
    async fn test_name_cap_counts_characters_not_bytes() {
        let dispatcher = dispatcher(Ping::plain());
        let mut guild = guild();
        // 1000 two-byte characters stay within the cap.
        let content = format!("!{}", "é".repeat(1000));
        let outcome = dispatcher
            .dispatch(&config(), &message(&content), &mut guild, &NullClient)
            .await;
        let reply = text(&outcome).expect("reply");
        assert!(reply.starts_with("No such command:"), "got {reply}");
    }

    #[tokio::test]
    async fn test_deactivated_command() {
        let dispatcher = dispatcher(Ping::plain());
        let mut guild = guild();
        guild.deactivate("ping");
        let outcome = dispatcher
            .dispatch(&config(), &message("!ping"), &mut guild, &NullClient)
            .await;
        assert_eq!(text(&outcome), Some("This command is deactivated."));
    }

    #[tokio::test]
    async fn test_permission_denied_and_granted() {
        let mut command = Ping::plain();
        command.permissions = vec!["mod.ping".to_string()];
        let dispatcher = dispatcher(command);
        let mut guild = guild();

        let outcome = dispatcher
            .dispatch(&config(), &message("!ping"), &mut guild, &NullClient)
            .await;
        assert_eq!(text(&outcome), Some("You lack permission."));

        guild
            .users
            .get_mut("1")
            .expect("user present")
            .permissions
            .enable("mod.*");
        let outcome = dispatcher
            .dispatch(&config(), &message("!ping"), &mut guild, &NullClient)
            .await;
        assert_eq!(text(&outcome), Some("pong"));
    }

    #[tokio::test]
    async fn test_operator_only_command() {
        let mut command = Ping::plain();
        command.permissions = vec![crate::OPERATOR_SENTINEL.to_string()];
        let dispatcher = dispatcher(command);
        let mut guild = guild();
        let mut config = config();

        let outcome = dispatcher
            .dispatch(&config, &message("!ping"), &mut guild, &NullClient)
            .await;
        assert_eq!(text(&outcome), Some("You lack permission."));

        config.add_operator("1");
        let outcome = dispatcher
            .dispatch(&config, &message("!ping"), &mut guild, &NullClient)
            .await;
        assert_eq!(text(&outcome), Some("pong"));
    }

    #[tokio::test]
    async fn test_invalid_syntax_names_prefix_and_command() {
        let mut command = Ping::plain();
        command.min_args = 1;
        let dispatcher = dispatcher(command);
        let mut guild = guild();
        let outcome = dispatcher
            .dispatch(&config(), &message("!ping"), &mut guild, &NullClient)
            .await;
        assert_eq!(text(&outcome), Some("Usage: !ping …"));
    }

    #[tokio::test]
    async fn test_throttle_sequence() {
        let mut command = Ping::plain();
        command.frequency = Some(FrequencyLimit::new(2, 1));
        let dispatcher = dispatcher(command);
        let mut guild = guild();
        let config = config();

        for _ in 0..2 {
            let outcome = dispatcher
                .dispatch(&config, &message("!ping"), &mut guild, &NullClient)
                .await;
            assert_eq!(text(&outcome), Some("pong"));
        }
        let outcome = dispatcher
            .dispatch(&config, &message("!ping"), &mut guild, &NullClient)
            .await;
        assert_eq!(text(&outcome), Some("Slow down."));
    }

    #[tokio::test]
    async fn test_operator_bypasses_throttle() {
        let mut command = Ping::plain();
        command.frequency = Some(FrequencyLimit::new(1, 1));
        let dispatcher = dispatcher(command);
        let mut guild = guild();
        let mut config = config();
        config.add_operator("1");

        for _ in 0..3 {
            let outcome = dispatcher
                .dispatch(&config, &message("!ping"), &mut guild, &NullClient)
                .await;
            assert_eq!(text(&outcome), Some("pong"));
        }
        assert_eq!(guild.throttle.count("ping"), 3);
    }

    #[tokio::test]
    async fn test_missing_template_falls_back_to_silence() {
        let dispatcher = dispatcher(Ping::plain());
        let mut guild = guild();
        let outcome = dispatcher
            .dispatch(
                &BotConfig::default(),
                &message("!nope"),
                &mut guild,
                &NullClient,
            )
            .await;
        assert_eq!(outcome, Outcome::none());
    }
}
