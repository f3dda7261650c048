//! End-to-end pipeline tests: moderation gate, dispatch, autorespond
//! and persistence working together through the facade.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use warden::{
    BotConfig, ClientHandle, Command, CommandRegistry, EngineResult, FrequencyLimit, GuildState,
    GuildStorage, InboundMessage, Invocation, MessageEngine, Outcome, ParsedCommand, ReloadCommand,
    Reply, SideEffect,
};

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

struct PingCommand {
    runs: Arc<AtomicUsize>,
}

#[async_trait]
impl Command for PingCommand {
    fn name(&self) -> &str {
        "ping"
    }

    fn frequency(&self) -> Option<FrequencyLimit> {
        Some(FrequencyLimit::new(2, 1))
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

fn engine(dir: &tempfile::TempDir) -> (MessageEngine, Arc<AtomicUsize>) {
    let runs = Arc::new(AtomicUsize::new(0));
    let storage = Arc::new(GuildStorage::new(dir.path()).expect("storage"));

    let mut registry = CommandRegistry::new();
    registry.register(Arc::new(PingCommand {
        runs: Arc::clone(&runs),
    }));
    registry.register(Arc::new(ReloadCommand::new(storage)));

    let mut config = BotConfig::default();
    let t = config.translations_mut();
    t.set("en", "command.not_found", "No such command: {1}");
    t.set("en", "command.ping.frequency", "Slow down.");

    let engine = MessageEngine::new(
        config,
        registry,
        GuildStorage::new(dir.path()).expect("storage"),
    );
    (engine, runs)
}

fn message(content: &str) -> InboundMessage {
    InboundMessage {
        guild_id: "guild".to_string(),
        channel_id: "general".to_string(),
        message_id: "m1".to_string(),
        content: content.to_string(),
        author_id: "1".to_string(),
        author_name: "alice".to_string(),
        ..InboundMessage::default()
    }
}

fn text(outcome: &Outcome) -> Option<&str> {
    match &outcome.reply {
        Some(Reply::Text(t)) => Some(t.as_str()),
        _ => None,
    }
}

#[tokio::test]
async fn test_alias_invocation_runs_handler_once() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (mut engine, runs) = engine(&dir);
    {
        let guild = engine.guild_mut("guild").expect("guild");
        guild.aliases.set("p", "ping");
    }

    let outcome = engine
        .handle_message(&message("!p"), &NullClient)
        .await
        .expect("handled");
    assert_eq!(text(&outcome), Some("pong"));
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_throttle_sequence_across_cycles() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (mut engine, runs) = engine(&dir);

    for _ in 0..2 {
        let outcome = engine
            .handle_message(&message("!ping"), &NullClient)
            .await
            .expect("handled");
        assert_eq!(text(&outcome), Some("pong"));
    }
    let outcome = engine
        .handle_message(&message("!ping"), &NullClient)
        .await
        .expect("handled");
    assert_eq!(text(&outcome), Some("Slow down."));
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_blacklist_escalation_over_nine_hits() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (mut engine, _runs) = engine(&dir);
    {
        let guild = engine.guild_mut("guild").expect("guild");
        guild.add_blacklist_entry("badword").expect("valid entry");
        guild.mute_role = Some("muted".to_string());
    }

    for hit in 1..=9u64 {
        let outcome = engine
            .handle_message(&message("badword again"), &NullClient)
            .await
            .expect("handled");
        let muted = outcome
            .effects
            .iter()
            .any(|e| matches!(e, SideEffect::ApplyRole { .. }));
        assert_eq!(muted, hit % 3 == 0, "hit {hit}");
        assert!(outcome
            .effects
            .iter()
            .any(|e| matches!(e, SideEffect::DeleteMessage { .. })));
    }

    let guild = engine.guild_mut("guild").expect("guild");
    assert_eq!(
        guild.users.get("1").map(|u| u.blacklist_count),
        Some(9),
        "counter is monotonic"
    );
}

#[tokio::test]
async fn test_moderation_persists_across_engine_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    {
        let (mut engine, _runs) = engine(&dir);
        {
            let guild = engine.guild_mut("guild").expect("guild");
            guild.add_blacklist_entry("badword").expect("valid entry");
        }
        engine
            .handle_message(&message("badword"), &NullClient)
            .await
            .expect("handled");
    }

    let (mut engine, _runs) = engine(&dir);
    let guild = engine.guild_mut("guild").expect("guild");
    assert!(guild.gate().is_blacklisted("badword"));
    assert_eq!(guild.users.get("1").map(|u| u.blacklist_count), Some(1));
}

#[tokio::test]
async fn test_autorespond_tolerates_typos() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (mut engine, _runs) = engine(&dir);
    {
        let guild = engine.guild_mut("guild").expect("guild");
        guild.autorespond.add("hello there", "General Kenobi!");
    }

    let outcome = engine
        .handle_message(&message("Helo there!"), &NullClient)
        .await
        .expect("handled");
    assert_eq!(text(&outcome), Some("General Kenobi!"));
}

#[tokio::test]
async fn test_unknown_command_uses_translation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (mut engine, _runs) = engine(&dir);
    let outcome = engine
        .handle_message(&message("!missing"), &NullClient)
        .await
        .expect("handled");
    assert_eq!(text(&outcome), Some("No such command: missing"));
}
