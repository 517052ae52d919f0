//! Stateless checks on raw resource strings

use crate::core::{GuardError, GuardResult};

/// Marker rejected anywhere in a resource
const TRAVERSAL_MARKER: &str = "..";

/// Prefixes of system directories tools may never touch
const SYSTEM_PREFIXES: &[&str] = &["/etc/", "/sys/"];

/// Reject traversal and system-directory resources
///
/// Independent of any sandbox configuration. Traversal is checked first,
/// so `/etc/../x` reports `PathTraversal`.
pub fn validate_resource(resource: &str) -> GuardResult<()> {
    if resource.contains(TRAVERSAL_MARKER) {
        tracing::warn!("Rejected resource with path traversal: {}", resource);
        return Err(GuardError::PathTraversal(resource.to_string()));
    }

    if SYSTEM_PREFIXES.iter().any(|p| resource.starts_with(p)) {
        tracing::warn!("Rejected system directory resource: {}", resource);
        return Err(GuardError::SystemDirectoryAccess(resource.to_string()));
    }

    Ok(())
}
