//! Guard error types

use thiserror::Error;

/// Errors that can occur while authorizing a tool operation
///
/// A denied request is not an error: `check` returns `Ok(false)` for that.
/// These variants mean the decision could not be reached, or a path was
/// rejected before any decision was attempted.
#[derive(Error, Debug)]
pub enum GuardError {
    /// The prompt handler failed; propagated unchanged from the handler
    #[error("Prompt handler failed: {0}")]
    HandlerFailure(String),

    /// The prompt was cancelled through the check context
    #[error("Permission prompt cancelled")]
    Cancelled,

    /// Resource contains a `..` traversal marker
    #[error("Path traversal detected in resource: {0}")]
    PathTraversal(String),

    /// Resource points into a protected system directory
    #[error("Access to system directory denied: {0}")]
    SystemDirectoryAccess(String),

    /// Path matches a denied sandbox prefix
    #[error("Path {path} is denied by sandbox rule {prefix}")]
    SandboxDenied { path: String, prefix: String },

    /// Path is outside every allowed sandbox prefix
    #[error("Path not in allowed paths: {0}")]
    NotInAllowedPaths(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GuardError {
    /// Create a handler failure from a message
    pub fn handler(msg: impl Into<String>) -> Self {
        GuardError::HandlerFailure(msg.into())
    }
}

/// Result type alias for guard operations
pub type GuardResult<T> = Result<T, GuardError>;
