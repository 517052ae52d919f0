//! Permission manager implementation
//!
//! Evaluates every request through a mode-specific procedure:
//! - Yolo: grant everything
//! - Deny: deny everything
//! - AutoApprove: grant low-risk requests, otherwise as Interactive
//! - Interactive: standing grants first, then the prompt handler
//!
//! All mutable state sits behind one lock. `check` holds it exclusively
//! for its whole duration, prompt included, so decisions never interleave.

use tokio::sync::RwLock;

use crate::core::{CheckContext, GuardResult};

use super::audit::{AuditEntry, AuditLog};
use super::grants::GrantSet;
use super::handler::{ArcPromptHandler, PromptHandler};
use super::types::{Permission, PermissionMode, PermissionRequest, RiskLevel};

/// State guarded by the manager's lock
#[derive(Debug, Default)]
struct ManagerState {
    mode: PermissionMode,
    grants: GrantSet,
    audit: AuditLog,
}

/// Authorization engine for one agent session
pub struct PermissionManager {
    state: RwLock<ManagerState>,
    /// Interactive approval path (None = no prompt available)
    handler: Option<ArcPromptHandler>,
}

impl PermissionManager {
    /// Create a manager with an optional prompt handler
    pub fn new(mode: PermissionMode, handler: Option<ArcPromptHandler>) -> Self {
        Self {
            state: RwLock::new(ManagerState {
                mode,
                ..Default::default()
            }),
            handler,
        }
    }

    /// Create a manager that prompts through `handler`
    pub fn with_handler(mode: PermissionMode, handler: impl PromptHandler + 'static) -> Self {
        let handler: ArcPromptHandler = std::sync::Arc::new(handler);
        Self::new(mode, Some(handler))
    }

    /// Create a manager with no interactive path
    pub fn without_handler(mode: PermissionMode) -> Self {
        Self::new(mode, None)
    }

    /// Decide whether `request` may proceed
    ///
    /// Returns `Ok(false)` for a denial. An error means the prompt handler
    /// failed; in that case nothing is recorded in the audit log.
    pub async fn check(
        &self,
        ctx: &CheckContext,
        request: &PermissionRequest,
    ) -> GuardResult<bool> {
        let mut state = self.state.write().await;
        let mode = state.mode;

        let granted = match mode {
            PermissionMode::Yolo => true,
            PermissionMode::Deny => false,
            PermissionMode::AutoApprove if request.risk == RiskLevel::Low => true,
            PermissionMode::AutoApprove | PermissionMode::Interactive => {
                self.decide_interactive(&mut state.grants, ctx, request).await?
            }
        };

        state.audit.append(AuditEntry::record(request, granted, mode));

        tracing::debug!(
            permission = %request.permission,
            resource = %request.resource,
            tool = %request.tool_name,
            risk = %request.risk,
            %mode,
            granted,
            "Permission decision"
        );

        Ok(granted)
    }

    /// Standing grants, then the handler, then deny
    async fn decide_interactive(
        &self,
        grants: &mut GrantSet,
        ctx: &CheckContext,
        request: &PermissionRequest,
    ) -> GuardResult<bool> {
        if grants.allows(request.permission) {
            return Ok(true);
        }

        let Some(handler) = &self.handler else {
            tracing::debug!(
                "No prompt handler configured; denying {} on {}",
                request.permission,
                request.resource
            );
            return Ok(false);
        };

        let approved = handler.prompt(ctx, request).await.map_err(|e| {
            tracing::warn!(
                "Prompt handler failed for {} on {}: {}",
                request.permission,
                request.resource,
                e
            );
            e
        })?;

        if approved {
            // Remembered for every resource, not just this one
            grants.insert(request.permission);
            tracing::info!("Granted {} for the rest of the session", request.permission);
        }

        Ok(approved)
    }

    /// Grant a permission for the rest of the session
    pub async fn grant(&self, permission: Permission) {
        if self.state.write().await.grants.insert(permission) {
            tracing::info!("Granted permission: {}", permission);
        }
    }

    /// Revoke a single permission
    pub async fn revoke(&self, permission: Permission) {
        if self.state.write().await.grants.remove(permission) {
            tracing::info!("Revoked permission: {}", permission);
        }
    }

    /// Grant the wildcard permission
    pub async fn grant_all(&self) {
        self.grant(Permission::All).await;
    }

    /// Clear every grant, not just the wildcard
    ///
    /// The audit log is left untouched.
    pub async fn revoke_all(&self) {
        self.state.write().await.grants.clear();
        tracing::info!("Revoked all permissions");
    }

    /// Independent copy of the audit log
    pub async fn get_audit_log(&self) -> Vec<AuditEntry> {
        self.state.read().await.audit.snapshot()
    }

    /// Audited decisions for one permission, oldest first
    pub async fn audit_for(&self, permission: Permission) -> Vec<AuditEntry> {
        self.state.read().await.audit.entries_for(permission)
    }

    /// Audited decisions that were denied
    pub async fn denials(&self) -> Vec<AuditEntry> {
        self.state.read().await.audit.denials()
    }

    /// Number of audited decisions so far
    pub async fn audit_len(&self) -> usize {
        self.state.read().await.audit.len()
    }

    /// Current policy mode
    pub async fn mode(&self) -> PermissionMode {
        self.state.read().await.mode
    }

    /// Change the policy mode; takes effect for the next check
    pub async fn set_mode(&self, mode: PermissionMode) {
        let mut state = self.state.write().await;
        if state.mode != mode {
            tracing::info!("Permission mode changed: {} -> {}", state.mode, mode);
            state.mode = mode;
        }
    }

    /// Whether a standing grant covers `permission`
    pub async fn is_granted(&self, permission: Permission) -> bool {
        self.state.read().await.grants.allows(permission)
    }

    /// Currently granted permissions
    pub async fn granted_permissions(&self) -> Vec<Permission> {
        self.state.read().await.grants.iter().collect()
    }

    /// Whether an interactive path is available
    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }
}

impl std::fmt::Debug for PermissionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionManager")
            .field("has_handler", &self.handler.is_some())
            .finish_non_exhaustive()
    }
}
