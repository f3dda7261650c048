//! Engine error types.
//!
//! Every kind here is recoverable and local to one message-handling
//! cycle; nothing propagates past the top-level handler.

use warden_guard::{GuardError, GuardErrorKind};
use warden_storage::StorageError;

/// Specific engine error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum EngineErrorKind {
    /// The parsed command name was empty (silent no-op).
    #[display("Empty command name")]
    EmptyName,

    /// The parsed command name exceeded the length cap.
    #[display("Command name too long ({} characters)", length)]
    NameTooLong {
        /// Observed name length.
        length: usize,
    },

    /// No registered command matched after alias resolution.
    #[display("Command not found: {}", name)]
    NotFound {
        /// The name as invoked.
        name: String,
    },

    /// The command is deactivated on this guild.
    #[display("Command deactivated: {}", name)]
    Deactivated {
        /// Canonical command name.
        name: String,
    },

    /// The invoker lacks every required permission.
    #[display("Permission denied for command: {}", name)]
    PermissionDenied {
        /// Canonical command name.
        name: String,
    },

    /// The command rejected the argument shape.
    #[display("Invalid syntax for command: {}", name)]
    InvalidSyntax {
        /// Canonical command name.
        name: String,
    },

    /// The command exceeded its frequency limit.
    #[display("Frequency limit exceeded for command: {}", name)]
    FrequencyExceeded {
        /// Canonical command name.
        name: String,
    },

    /// A platform or lookup-service call failed; logged and swallowed.
    #[display("External service failure in {}: {}", operation, reason)]
    ExternalService {
        /// Operation that failed.
        operation: String,
        /// Underlying reason.
        reason: String,
    },

    /// Persistence failed.
    #[display("Storage failure: {}", _0)]
    Storage(String),
}

/// Engine error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Engine Error: {} at line {} in {}", kind, line, file)]
pub struct EngineError {
    /// The specific error kind.
    pub kind: EngineErrorKind,
    /// Line number where the error occurred.
    pub line: u32,
    /// File where the error occurred.
    pub file: &'static str,
}

impl EngineError {
    /// Create a new engine error with location tracking.
    #[track_caller]
    pub fn new(kind: EngineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &EngineErrorKind {
        &self.kind
    }
}

impl From<StorageError> for EngineError {
    #[track_caller]
    fn from(err: StorageError) -> Self {
        EngineError::new(EngineErrorKind::Storage(err.to_string()))
    }
}

impl From<GuardError> for EngineError {
    #[track_caller]
    fn from(err: GuardError) -> Self {
        match &err.kind {
            GuardErrorKind::FrequencyExceeded { command, .. } => {
                EngineError::new(EngineErrorKind::FrequencyExceeded {
                    name: command.clone(),
                })
            }
            GuardErrorKind::InvalidPattern { pattern, reason } => {
                EngineError::new(EngineErrorKind::ExternalService {
                    operation: format!("blacklist pattern '{pattern}'"),
                    reason: reason.clone(),
                })
            }
        }
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
