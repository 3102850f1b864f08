//! Server group tags.

use serde::{Deserialize, Serialize};

/// An ordered list of server group names.
///
/// Groups tag subsets of servers dedicated to a workload class (for
/// example `api` or `dump` replicas). Names are not validated here; the
/// load balancer decides what an unknown group means.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Groups(Vec<String>);

impl Groups {
    /// Create an empty group list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a group name.
    pub fn push(&mut self, group: impl Into<String>) {
        self.0.push(group.into());
    }

    /// Get the group names in order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Iterate over the group names.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the list and return the names.
    #[must_use]
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for Groups {
    fn from(groups: Vec<String>) -> Self {
        Self(groups)
    }
}

impl From<&[&str]> for Groups {
    fn from(groups: &[&str]) -> Self {
        groups.iter().copied().collect()
    }
}

impl<const N: usize> From<[&str; N]> for Groups {
    fn from(groups: [&str; N]) -> Self {
        groups.into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for Groups {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a Groups {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
