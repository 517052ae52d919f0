//! Check-before-act entry point for tools
//!
//! Combines the sandbox checks and the permission manager so a tool makes
//! one call before touching anything. Callers must abort when this
//! returns an error or `Ok(false)`.

use std::sync::Arc;

use crate::core::{CheckContext, GuardResult};
use crate::permissions::{assess_risk, PermissionManager, PermissionRequest};
use crate::sandbox::{validate_resource, SandboxValidator};

/// Permission manager plus an optional sandbox
#[derive(Debug, Clone)]
pub struct ToolGuard {
    manager: Arc<PermissionManager>,
    sandbox: Option<Arc<SandboxValidator>>,
}

impl ToolGuard {
    /// Create a guard without a sandbox
    pub fn new(manager: Arc<PermissionManager>) -> Self {
        Self {
            manager,
            sandbox: None,
        }
    }

    /// Add a sandbox for filesystem requests
    pub fn with_sandbox(mut self, sandbox: Arc<SandboxValidator>) -> Self {
        self.sandbox = Some(sandbox);
        self
    }

    /// Authorize `request`
    ///
    /// Read and Write requests are path-checked first; a rejected path is
    /// returned as an error without consulting the manager, so it leaves
    /// no audit entry. The risk handed to the manager is never below what
    /// the operation and resource text imply.
    pub async fn authorize(
        &self,
        ctx: &CheckContext,
        request: &PermissionRequest,
    ) -> GuardResult<bool> {
        if request.permission.touches_filesystem() {
            validate_resource(&request.resource)?;
            if let Some(sandbox) = &self.sandbox {
                sandbox.validate_path(&request.resource)?;
            }
        }

        let assessed = assess_risk(&request.operation, &request.resource);
        if assessed > request.risk {
            tracing::debug!(
                "Raising risk of {} on {} from {} to {}",
                request.permission,
                request.resource,
                request.risk,
                assessed
            );
            let escalated = request.clone().escalated();
            return self.manager.check(ctx, &escalated).await;
        }

        self.manager.check(ctx, request).await
    }

    pub fn manager(&self) -> &Arc<PermissionManager> {
        &self.manager
    }

    pub fn sandbox(&self) -> Option<&Arc<SandboxValidator>> {
        self.sandbox.as_ref()
    }
}
