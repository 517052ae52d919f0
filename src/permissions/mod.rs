//! Permission system for tool execution
//!
//! Every risky tool operation goes through [`PermissionManager::check`]
//! before it runs. The manager evaluates the request under its current
//! [`PermissionMode`]:
//!
//! | Mode | Behavior |
//! |------|----------|
//! | `Yolo` | Grant everything |
//! | `Deny` | Deny everything |
//! | `AutoApprove` | Grant low-risk requests, otherwise as `Interactive` |
//! | `Interactive` | Standing grants, then the prompt handler, then deny |
//!
//! An approval from the prompt handler is remembered for the whole
//! permission category, on any resource. Every completed decision is
//! appended to the audit log; a failed prompt is not.
//!
//! ## Example
//!
//! ```rust,ignore
//! use shadow_agent_guard::core::CheckContext;
//! use shadow_agent_guard::permissions::{
//!     FnPromptHandler, Permission, PermissionManager, PermissionMode, PermissionRequest,
//! };
//!
//! let manager = PermissionManager::with_handler(
//!     PermissionMode::AutoApprove,
//!     FnPromptHandler::new(|_ctx, req| async move { Ok(req.permission != Permission::Network) }),
//! );
//!
//! let request = PermissionRequest::new(Permission::Write, "src/lib.rs", "write file")
//!     .with_tool("Write")
//!     .assessed();
//!
//! if manager.check(&CheckContext::default(), &request).await? {
//!     // perform the write
//! }
//! ```

mod audit;
mod grants;
mod handler;
mod manager;
mod risk;
mod types;

pub use audit::{AuditEntry, AuditLog};
pub use grants::GrantSet;
pub use handler::{ArcPromptHandler, FnPromptHandler, PromptHandler};
pub use manager::PermissionManager;
pub use risk::assess_risk;
pub use types::{Permission, PermissionMode, PermissionRequest, RiskLevel};
