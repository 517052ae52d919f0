//! Security configuration
//!
//! Builds the permission manager and sandbox at startup from a JSON file:
//!
//! ```json
//! {
//!   "mode": "interactive",
//!   "auto_approve_low_risk": true,
//!   "sandbox": {
//!     "enabled": true,
//!     "allowed_paths": ["/home/user/project"],
//!     "denied_paths": ["/home/user/project/.git"]
//!   },
//!   "logging": { "level": "info" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::{GuardError, GuardResult};
use crate::logging::LogConfig;
use crate::permissions::{ArcPromptHandler, PermissionManager, PermissionMode};
use crate::sandbox::{PathPolicy, SandboxValidator};

/// Sandbox section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SandboxConfig {
    /// Whether path checks are applied at all
    #[serde(default)]
    pub enabled: bool,

    /// Prefixes tools are restricted to (empty = anywhere not denied)
    #[serde(default)]
    pub allowed_paths: PathPolicy,

    /// Prefixes that are always rejected
    #[serde(default)]
    pub denied_paths: PathPolicy,
}

/// Top-level security configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub mode: PermissionMode,

    /// Upgrade `interactive` to `auto_approve` so low-risk requests skip the prompt
    #[serde(default)]
    pub auto_approve_low_risk: bool,

    #[serde(default)]
    pub sandbox: SandboxConfig,

    #[serde(default)]
    pub logging: LogConfig,
}

impl SecurityConfig {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> GuardResult<Self> {
        let config: SecurityConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON file
    pub fn load(path: impl AsRef<Path>) -> GuardResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json(&contents)?;
        tracing::info!("Loaded security config from {}", path.display());
        Ok(config)
    }

    /// Reject empty sandbox prefixes; an empty prefix matches every path
    pub fn validate(&self) -> GuardResult<()> {
        let lists = [
            ("allowed_paths", &self.sandbox.allowed_paths),
            ("denied_paths", &self.sandbox.denied_paths),
        ];
        for (name, policy) in lists {
            if policy.prefixes().iter().any(|p| p.trim().is_empty()) {
                return Err(GuardError::InvalidConfig(format!(
                    "sandbox.{} contains an empty prefix",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Mode after applying `auto_approve_low_risk`
    pub fn effective_mode(&self) -> PermissionMode {
        match self.mode {
            PermissionMode::Interactive if self.auto_approve_low_risk => {
                PermissionMode::AutoApprove
            }
            mode => mode,
        }
    }

    /// Sandbox validator, or None when the sandbox is disabled
    pub fn build_validator(&self) -> Option<SandboxValidator> {
        if !self.sandbox.enabled {
            return None;
        }
        Some(SandboxValidator::with_policies(
            self.sandbox.denied_paths.clone(),
            self.sandbox.allowed_paths.clone(),
        ))
    }

    /// Permission manager using the effective mode
    pub fn build_manager(&self, handler: Option<ArcPromptHandler>) -> PermissionManager {
        PermissionManager::new(self.effective_mode(), handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = SecurityConfig::from_json("{}").unwrap();
        assert_eq!(config.mode, PermissionMode::Interactive);
        assert!(!config.auto_approve_low_risk);
        assert!(!config.sandbox.enabled);
        assert!(config.build_validator().is_none());
    }

    #[test]
    fn test_effective_mode() {
        let mut config = SecurityConfig {
            auto_approve_low_risk: true,
            ..Default::default()
        };
        assert_eq!(config.effective_mode(), PermissionMode::AutoApprove);

        // Only interactive is upgraded
        config.mode = PermissionMode::Deny;
        assert_eq!(config.effective_mode(), PermissionMode::Deny);
    }

    #[test]
    fn test_sandbox_section() {
        let config = SecurityConfig::from_json(
            r#"{
                "mode": "yolo",
                "sandbox": {
                    "enabled": true,
                    "allowed_paths": ["/home"],
                    "denied_paths": ["/etc"]
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.mode, PermissionMode::Yolo);
        let sandbox = config.build_validator().unwrap();
        assert!(sandbox.validate_path("/home/user/f").is_ok());
        assert!(sandbox.validate_path("/etc/passwd").is_err());
        assert!(sandbox.validate_path("/tmp/x").is_err());
    }

    #[test]
    fn test_empty_prefix_rejected() {
        let err = SecurityConfig::from_json(r#"{"sandbox": {"denied_paths": ["  "]}}"#)
            .unwrap_err();
        assert!(matches!(err, GuardError::InvalidConfig(ref m) if m.contains("denied_paths")));
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let err = SecurityConfig::from_json(r#"{"mode": "sometimes"}"#).unwrap_err();
        assert!(matches!(err, GuardError::Serialization(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("security.json");
        std::fs::write(&path, r#"{"mode": "auto_approve"}"#).unwrap();

        let config = SecurityConfig::load(&path).unwrap();
        assert_eq!(config.mode, PermissionMode::AutoApprove);
    }

    #[test]
    fn test_load_missing_file() {
        let err = SecurityConfig::load("/nonexistent/security.json").unwrap_err();
        assert!(matches!(err, GuardError::Io(_)));
    }

    #[tokio::test]
    async fn test_build_manager() {
        let config = SecurityConfig {
            mode: PermissionMode::Deny,
            ..Default::default()
        };
        let manager = config.build_manager(None);
        assert_eq!(manager.mode().await, PermissionMode::Deny);
        assert!(!manager.has_handler());
    }
}
