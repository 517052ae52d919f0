//! Standing grants held by a permission manager

use std::collections::BTreeSet;

use super::types::Permission;

/// Set of permissions approved for the rest of the manager's lifetime
///
/// Holding `Permission::All` satisfies every request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantSet {
    granted: BTreeSet<Permission>,
}

impl GrantSet {
    /// Create an empty grant set
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a request for `permission` is covered, directly or by the wildcard
    pub fn allows(&self, permission: Permission) -> bool {
        self.granted.contains(&permission) || self.granted.contains(&Permission::All)
    }

    /// Add a permission; returns false if it was already present
    pub fn insert(&mut self, permission: Permission) -> bool {
        self.granted.insert(permission)
    }

    /// Remove a permission; returns false if it was not present
    pub fn remove(&mut self, permission: Permission) -> bool {
        self.granted.remove(&permission)
    }

    /// Remove everything, wildcard included
    pub fn clear(&mut self) {
        self.granted.clear();
    }

    /// Granted permissions in a stable order
    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.granted.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.granted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.granted.is_empty()
    }
}
