//! Ordered path-prefix lists

use serde::{Deserialize, Serialize};

/// Ordered list of path prefixes; the first matching prefix wins
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathPolicy {
    prefixes: Vec<String>,
}

impl PathPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from prefixes, keeping their order
    pub fn from_prefixes<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Append a prefix
    pub fn push(&mut self, prefix: impl Into<String>) {
        self.prefixes.push(prefix.into());
    }

    /// First prefix that `path` starts with, if any
    ///
    /// Plain string prefix matching: `/home` also matches `/homework`.
    pub fn first_match(&self, path: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .map(String::as_str)
            .find(|prefix| path.starts_with(prefix))
    }

    pub fn matches(&self, path: &str) -> bool {
        self.first_match(path).is_some()
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}
