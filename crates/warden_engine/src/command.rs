//! The pluggable command surface.

use crate::{BotConfig, EngineResult, GuildState, InboundMessage, Outcome};
use async_trait::async_trait;
use derive_getters::Getters;
use warden_core::ParsedCommand;
use warden_guard::FrequencyLimit;

/// Reserved first entry of a permission list marking a command as
/// operator-only. Regular permission grants never satisfy it.
pub const OPERATOR_SENTINEL: &str = "OPERATOR";

/// Ephemeral invocation context handed to a command.
///
/// The permission list is the union of the invoker's direct enabled
/// permissions and the enabled sets of every held role, not filtered by
/// disabled entries. Advisory data only; the dispatcher's permission
/// check is authoritative.
#[derive(Debug, Clone, Default, Getters)]
pub struct Invocation {
    /// Invoker's user id.
    author_id: String,
    /// Advisory permission union.
    permissions: Vec<String>,
    /// True when the invoker is a configured global operator.
    operator: bool,
}

impl Invocation {
    /// Build an invocation context.
    pub fn new(author_id: impl Into<String>, permissions: Vec<String>, operator: bool) -> Self {
        Self {
            author_id: author_id.into(),
            permissions,
            operator,
        }
    }
}

/// Handle to the platform client for effects a command must perform
/// inline rather than request through an [`Outcome`].
#[async_trait]
pub trait ClientHandle: Send + Sync {
    /// Delete a message.
    async fn delete_message(&self, channel_id: &str, message_id: &str) -> EngineResult<()>;

    /// Apply a role to a member.
    async fn apply_role(&self, user_id: &str, role_id: &str) -> EngineResult<()>;

    /// Send plain text to a channel.
    async fn send_text(&self, channel_id: &str, text: &str) -> EngineResult<()>;
}

/// Capability trait every registered command implements.
///
/// Metadata drives the dispatch pipeline; `run` only executes after the
/// deactivation, permission, syntax and throttle checks all passed.
#[async_trait]
pub trait Command: Send + Sync {
    /// Canonical command name, lowercase.
    fn name(&self) -> &str;

    /// Required permissions, evaluated in OR fashion. An empty list
    /// means everyone; a list starting with [`OPERATOR_SENTINEL`] means
    /// configured operators only.
    fn permissions(&self) -> &[String] {
        &[]
    }

    /// Frequency limit, if the command declares one.
    fn frequency(&self) -> Option<FrequencyLimit> {
        None
    }

    /// Validate the argument shape before invocation.
    fn validate_syntax(&self, command: &ParsedCommand) -> bool {
        let _ = command;
        true
    }

    /// Execute the command.
    #[allow(clippy::too_many_arguments)]
    async fn run(
        &self,
        config: &BotConfig,
        message: &InboundMessage,
        guild: &mut GuildState,
        command: &ParsedCommand,
        invocation: &Invocation,
        client: &dyn ClientHandle,
    ) -> EngineResult<Outcome>;
}
