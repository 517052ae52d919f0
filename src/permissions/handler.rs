//! Interactive approval capability
//!
//! The manager never builds a handler itself; the surrounding application
//! injects one at construction time (typically backed by a terminal modal).

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

use crate::core::{CheckContext, GuardResult};

use super::types::PermissionRequest;

/// Asks a human (or an external policy) whether a request may proceed
///
/// Return `Ok(true)` to grant, `Ok(false)` to deny, or an error when no
/// decision could be reached. Errors are returned from `check` unchanged
/// and produce no audit entry.
///
/// The manager holds its lock while this runs and imposes no timeout.
/// Implementations must watch `ctx.cancelled()` and return
/// `GuardError::Cancelled` promptly, or `check` blocks indefinitely.
#[async_trait]
pub trait PromptHandler: Send + Sync {
    async fn prompt(&self, ctx: &CheckContext, request: &PermissionRequest) -> GuardResult<bool>;
}

/// Type alias for stored handlers
pub type ArcPromptHandler = Arc<dyn PromptHandler>;

/// Adapts an async closure into a `PromptHandler`
///
/// # Example
///
/// ```ignore
/// let handler = FnPromptHandler::new(|_ctx, req| async move {
///     Ok(req.permission == Permission::Read)
/// });
/// ```
pub struct FnPromptHandler<F> {
    f: F,
}

impl<F> FnPromptHandler<F> {
    pub fn new<Fut>(f: F) -> Self
    where
        F: Fn(CheckContext, PermissionRequest) -> Fut + Send + Sync,
        Fut: Future<Output = GuardResult<bool>> + Send + 'static,
    {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> PromptHandler for FnPromptHandler<F>
where
    F: Fn(CheckContext, PermissionRequest) -> Fut + Send + Sync,
    Fut: Future<Output = GuardResult<bool>> + Send + 'static,
{
    async fn prompt(&self, ctx: &CheckContext, request: &PermissionRequest) -> GuardResult<bool> {
        (self.f)(ctx.clone(), request.clone()).await
    }
}

impl<F> std::fmt::Debug for FnPromptHandler<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnPromptHandler").finish_non_exhaustive()
    }
}
