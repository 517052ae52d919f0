//! Path-prefix sandbox

use crate::core::{GuardError, GuardResult};

use super::policy::PathPolicy;

/// Decides whether a path is reachable by tools
///
/// Denied prefixes always win. If any allowed prefix is configured, the
/// path must match one of them; with no allowed prefixes every path that
/// is not denied is accepted.
///
/// Configure through `&mut self` before sharing; once wrapped in an `Arc`
/// the validator is read-only and safe to use from many tasks.
#[derive(Debug, Clone, Default)]
pub struct SandboxValidator {
    denied: PathPolicy,
    allowed: PathPolicy,
}

impl SandboxValidator {
    /// Create a validator that accepts every path
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from existing policies
    pub fn with_policies(denied: PathPolicy, allowed: PathPolicy) -> Self {
        Self { denied, allowed }
    }

    /// Deny every path starting with `prefix`
    pub fn add_denied_path(&mut self, prefix: impl Into<String>) {
        self.denied.push(prefix);
    }

    /// Restrict access to paths starting with one of the allowed prefixes
    pub fn add_allowed_path(&mut self, prefix: impl Into<String>) {
        self.allowed.push(prefix);
    }

    /// Check `path` against the deny list, then the allow list
    pub fn validate_path(&self, path: &str) -> GuardResult<()> {
        if let Some(prefix) = self.denied.first_match(path) {
            tracing::warn!("Sandbox denied {} (rule {})", path, prefix);
            return Err(GuardError::SandboxDenied {
                path: path.to_string(),
                prefix: prefix.to_string(),
            });
        }

        if !self.allowed.is_empty() && !self.allowed.matches(path) {
            tracing::warn!("Sandbox rejected {}: not in allowed paths", path);
            return Err(GuardError::NotInAllowedPaths(path.to_string()));
        }

        Ok(())
    }

    pub fn denied_paths(&self) -> &[String] {
        self.denied.prefixes()
    }

    pub fn allowed_paths(&self) -> &[String] {
        self.allowed.prefixes()
    }
}
