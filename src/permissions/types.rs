//! Permission categories, modes and requests

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::core::GuardError;

use super::risk::assess_risk;

/// Coarse capability category that can be granted as a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    Read,
    Write,
    Execute,
    Network,
    ExternalTool,
    /// Wildcard: satisfies every other permission
    All,
}

impl Permission {
    /// Every permission, wildcard last
    pub const ALL: [Permission; 6] = [
        Permission::Read,
        Permission::Write,
        Permission::Execute,
        Permission::Network,
        Permission::ExternalTool,
        Permission::All,
    ];

    /// Whether this permission targets the filesystem
    pub fn touches_filesystem(self) -> bool {
        matches!(self, Permission::Read | Permission::Write)
    }

    fn as_str(self) -> &'static str {
        match self {
            Permission::Read => "read",
            Permission::Write => "write",
            Permission::Execute => "execute",
            Permission::Network => "network",
            Permission::ExternalTool => "external_tool",
            Permission::All => "all",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = GuardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "read" => Ok(Permission::Read),
            "write" => Ok(Permission::Write),
            "execute" | "exec" => Ok(Permission::Execute),
            "network" => Ok(Permission::Network),
            "external_tool" => Ok(Permission::ExternalTool),
            "all" | "*" => Ok(Permission::All),
            other => Err(GuardError::InvalidConfig(format!(
                "unknown permission: {}",
                other
            ))),
        }
    }
}

/// Policy mode that decides how `check` evaluates requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionMode {
    /// Consult grants, then the prompt handler
    #[default]
    Interactive,
    /// Grant everything
    Yolo,
    /// Grant low-risk requests, otherwise behave as Interactive
    AutoApprove,
    /// Deny everything
    Deny,
}

impl fmt::Display for PermissionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionMode::Interactive => write!(f, "interactive"),
            PermissionMode::Yolo => write!(f, "yolo"),
            PermissionMode::AutoApprove => write!(f, "auto_approve"),
            PermissionMode::Deny => write!(f, "deny"),
        }
    }
}

impl FromStr for PermissionMode {
    type Err = GuardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "interactive" => Ok(PermissionMode::Interactive),
            "yolo" => Ok(PermissionMode::Yolo),
            "auto_approve" | "auto" => Ok(PermissionMode::AutoApprove),
            "deny" => Ok(PermissionMode::Deny),
            other => Err(GuardError::InvalidConfig(format!("unknown mode: {}", other))),
        }
    }
}

/// Risk tier of an operation, ordered `Low < Medium < High`
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

/// A request to perform one operation, built per call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionRequest {
    /// Unique id, carried into the audit entry
    pub id: Uuid,
    /// Category being requested
    pub permission: Permission,
    /// Target path or command
    pub resource: String,
    /// Human-readable description of the action
    pub operation: String,
    /// Optional justification shown to the approver
    pub reason: Option<String>,
    /// Assessed risk (Low unless set)
    pub risk: RiskLevel,
    /// Name of the tool issuing the request
    pub tool_name: String,
    /// When the request was created
    pub created_at: DateTime<Utc>,
}

impl PermissionRequest {
    /// Create a new permission request with Low risk and no tool name
    ///
    /// The risk is not derived from the text here. Call [`assessed`] or
    /// [`with_risk`] before a direct `PermissionManager::check`, otherwise
    /// AutoApprove treats the request as low risk. `ToolGuard::authorize`
    /// raises an understated risk on its own.
    ///
    /// [`assessed`]: PermissionRequest::assessed
    /// [`with_risk`]: PermissionRequest::with_risk
    pub fn new(
        permission: Permission,
        resource: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            permission,
            resource: resource.into(),
            operation: operation.into(),
            reason: None,
            risk: RiskLevel::Low,
            tool_name: String::new(),
            created_at: Utc::now(),
        }
    }

    /// Add a reason to the request
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Set the risk explicitly
    pub fn with_risk(mut self, risk: RiskLevel) -> Self {
        self.risk = risk;
        self
    }

    /// Set the originating tool
    pub fn with_tool(mut self, tool_name: impl Into<String>) -> Self {
        self.tool_name = tool_name.into();
        self
    }

    /// Classify the risk from the operation and resource text
    pub fn assessed(mut self) -> Self {
        self.risk = assess_risk(&self.operation, &self.resource);
        self
    }

    /// Raise the risk to the assessed level; an explicit higher risk is kept
    pub fn escalated(mut self) -> Self {
        self.risk = self.risk.max(assess_risk(&self.operation, &self.resource));
        self
    }
}
