//! Check context - caller state passed through to prompt handlers

use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use tokio_util::sync::CancellationToken;

/// Context supplied by the caller of a permission check
///
/// The manager never inspects this beyond handing it to the prompt
/// handler. Cancelling the token is the only way to abandon a pending
/// prompt, and only works if the handler observes it.
#[derive(Clone)]
pub struct CheckContext {
    /// Session the request belongs to
    pub session_id: String,

    /// Type of agent issuing the request (e.g., "coder", "main")
    pub agent_type: String,

    /// Custom metadata for handlers (JSON values only)
    pub metadata: HashMap<String, Value>,

    cancel: CancellationToken,
}

impl fmt::Debug for CheckContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckContext")
            .field("session_id", &self.session_id)
            .field("agent_type", &self.agent_type)
            .field("metadata", &self.metadata)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

impl CheckContext {
    /// Create a new context with a fresh cancellation token
    pub fn new(session_id: impl Into<String>, agent_type: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            agent_type: agent_type.into(),
            metadata: HashMap::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Use an existing cancellation token (e.g., the agent's shutdown token)
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Derive a context whose token is cancelled when this one is
    ///
    /// Cancelling the child does not affect the parent.
    pub fn child(&self) -> Self {
        Self {
            session_id: self.session_id.clone(),
            agent_type: self.agent_type.clone(),
            metadata: self.metadata.clone(),
            cancel: self.cancel.child_token(),
        }
    }

    /// Cancel any prompt waiting on this context
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether this context has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Wait until the context is cancelled
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }

    /// Set a metadata value (must be JSON-serializable)
    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Get a metadata value
    pub fn get_metadata(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    /// Get a metadata value as a string
    pub fn get_metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str())
    }
}

impl Default for CheckContext {
    fn default() -> Self {
        Self::new("unknown", "unknown")
    }
}
