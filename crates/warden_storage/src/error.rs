//! Storage error types.

/// Specific storage error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum StorageErrorKind {
    /// Directory creation failed.
    #[display("Failed to create directory: {}", _0)]
    DirectoryCreation(String),

    /// Filesystem read or write failed.
    #[display("I/O failure on {}: {}", path, reason)]
    Io {
        /// Path involved in the failed operation.
        path: String,
        /// Underlying reason.
        reason: String,
    },

    /// JSON serialization or deserialization failed.
    #[display("JSON failure on {}: {}", path, reason)]
    Json {
        /// Path involved in the failed operation.
        path: String,
        /// Underlying reason.
        reason: String,
    },

    /// The requested entity does not exist.
    #[display("Entity not found: {}", _0)]
    NotFound(String),
}

/// Storage error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The specific error kind.
    pub kind: StorageErrorKind,
    /// Line number where the error occurred.
    pub line: u32,
    /// File where the error occurred.
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StorageErrorKind {
        &self.kind
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
