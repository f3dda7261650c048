//! Guard error types.

/// Specific guard error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum GuardErrorKind {
    /// A blacklist pattern failed to compile.
    #[display("Invalid blacklist pattern '{}': {}", pattern, reason)]
    InvalidPattern {
        /// The offending pattern as configured.
        pattern: String,
        /// Reason compilation failed.
        reason: String,
    },

    /// A command exceeded its frequency limit.
    #[display("Frequency limit exceeded for '{}' (max {} per {}s)", command, max, window_secs)]
    FrequencyExceeded {
        /// Canonical command name.
        command: String,
        /// Configured maximum invocations.
        max: u32,
        /// Cooldown window in seconds.
        window_secs: u64,
    },
}

/// Guard error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Guard Error: {} at line {} in {}", kind, line, file)]
pub struct GuardError {
    /// The specific error kind.
    pub kind: GuardErrorKind,
    /// Line number where the error occurred.
    pub line: u32,
    /// File where the error occurred.
    pub file: &'static str,
}

impl GuardError {
    /// Create a new guard error with location tracking.
    #[track_caller]
    pub fn new(kind: GuardErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &GuardErrorKind {
        &self.kind
    }
}

/// Result type for guard operations.
pub type GuardResult<T> = Result<T, GuardError>;
