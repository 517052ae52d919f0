//! Audit trail of authorization decisions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::{Permission, PermissionMode, PermissionRequest};

/// Record of one completed decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the decision was made
    pub timestamp: DateTime<Utc>,
    /// Id of the request that produced this entry
    pub request_id: Uuid,
    pub permission: Permission,
    pub resource: String,
    pub operation: String,
    pub granted: bool,
    /// Mode active when the decision was made
    pub mode: PermissionMode,
    pub tool_name: String,
}

impl AuditEntry {
    /// Build an entry for a decision on `request`
    pub fn record(request: &PermissionRequest, granted: bool, mode: PermissionMode) -> Self {
        Self {
            timestamp: Utc::now(),
            request_id: request.id,
            permission: request.permission,
            resource: request.resource.clone(),
            operation: request.operation.clone(),
            granted,
            mode,
            tool_name: request.tool_name.clone(),
        }
    }
}

/// Append-only sequence of audit entries
///
/// Entries are kept in the order they were appended and are never
/// reordered or pruned.
#[derive(Debug, Clone, Default)]
pub struct AuditLog {
    entries: Vec<AuditEntry>,
}

impl AuditLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry
    pub fn append(&mut self, entry: AuditEntry) {
        self.entries.push(entry);
    }

    /// Independent copy of every entry
    pub fn snapshot(&self) -> Vec<AuditEntry> {
        self.entries.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AuditEntry> {
        self.entries.iter()
    }

    /// Entries for one permission category
    pub fn entries_for(&self, permission: Permission) -> Vec<AuditEntry> {
        self.entries
            .iter()
            .filter(|e| e.permission == permission)
            .cloned()
            .collect()
    }

    /// Entries that were denied
    pub fn denials(&self) -> Vec<AuditEntry> {
        self.entries.iter().filter(|e| !e.granted).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(permission: Permission, granted: bool) -> AuditEntry {
        let req = PermissionRequest::new(permission, "/tmp/x", "op").with_tool("Test");
        AuditEntry::record(&req, granted, PermissionMode::Interactive)
    }

    #[test]
    fn test_record_copies_request_fields() {
        let req = PermissionRequest::new(Permission::Network, "https://example.com", "fetch")
            .with_tool("WebFetch");
        let e = AuditEntry::record(&req, true, PermissionMode::Yolo);

        assert_eq!(e.request_id, req.id);
        assert_eq!(e.permission, Permission::Network);
        assert_eq!(e.resource, "https://example.com");
        assert_eq!(e.operation, "fetch");
        assert_eq!(e.tool_name, "WebFetch");
        assert_eq!(e.mode, PermissionMode::Yolo);
        assert!(e.granted);
    }

    #[test]
    fn test_append_preserves_order() {
        let mut log = AuditLog::new();
        log.append(entry(Permission::Read, true));
        log.append(entry(Permission::Write, false));
        log.append(entry(Permission::Read, false));

        let perms: Vec<_> = log.iter().map(|e| e.permission).collect();
        assert_eq!(perms, vec![Permission::Read, Permission::Write, Permission::Read]);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_queries() {
        let mut log = AuditLog::new();
        log.append(entry(Permission::Read, true));
        log.append(entry(Permission::Write, false));
        log.append(entry(Permission::Read, false));

        assert_eq!(log.entries_for(Permission::Read).len(), 2);
        assert_eq!(log.denials().len(), 2);
        assert!(log.entries_for(Permission::Execute).is_empty());
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut log = AuditLog::new();
        log.append(entry(Permission::Read, true));

        let mut copy = log.snapshot();
        copy[0].granted = false;
        copy.clear();

        assert_eq!(log.len(), 1);
        assert!(log.snapshot()[0].granted);
    }
}
