use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Indices into the catalog (builtin ++ custom) of the tools currently shown.
///
/// Membership always refers to the catalog's current numbering: when a
/// custom tool is removed, [`EnabledSet::reindex_after_removal`] must run in
/// the same step so higher indices follow their tools down by one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<usize>", into = "Vec<usize>")]
pub struct EnabledSet {
    indices: BTreeSet<usize>,
}

impl EnabledSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every builtin index `0..builtin_count`, the first-install default.
    pub fn all_builtin(builtin_count: usize) -> Self {
        Self {
            indices: (0..builtin_count).collect(),
        }
    }

    pub fn is_enabled(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    /// Adds or removes `index`. Does nothing if it is already in that state.
    pub fn set_enabled(&mut self, index: usize, enabled: bool) {
        if enabled {
            self.indices.insert(index);
        } else {
            self.indices.remove(&index);
        }
    }

    /// Drops `removed` and shifts every greater index down by one.
    pub fn reindex_after_removal(&mut self, removed: usize) {
        self.indices = self
            .indices
            .iter()
            .filter(|&&i| i != removed)
            .map(|&i| if i > removed { i - 1 } else { i })
            .collect();
    }

    /// Removes indices that no longer point into a catalog of `catalog_len` tools.
    /// Returns how many were dropped.
    pub fn retain_within(&mut self, catalog_len: usize) -> usize {
        let before = self.indices.len();
        self.indices.retain(|&i| i < catalog_len);
        before - self.indices.len()
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl From<Vec<usize>> for EnabledSet {
    fn from(indices: Vec<usize>) -> Self {
        Self {
            indices: indices.into_iter().collect(),
        }
    }
}

impl From<EnabledSet> for Vec<usize> {
    fn from(set: EnabledSet) -> Self {
        set.indices.into_iter().collect()
    }
}

impl FromIterator<usize> for EnabledSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            indices: iter.into_iter().collect(),
        }
    }
}
