use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-tool click counters for one repository.
pub type ToolCounts = BTreeMap<String, u64>;

/// Click counters keyed by `"owner/repo"`, then by tool name.
///
/// Iteration order is lexicographic by repository key, which is also the
/// tie-break order of [`UsageStats::top_repositories`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct UsageStats {
    repos: BTreeMap<String, ToolCounts>,
}

/// One leaderboard row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RepoUsage {
    pub repo_key: String,
    pub total: u64,
    pub per_tool: ToolCounts,
}

impl UsageStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bumps `stats[repo_key][tool_name]`, creating both levels as needed.
    /// Returns the new count.
    pub fn increment(&mut self, repo_key: &str, tool_name: &str) -> u64 {
        let counter = self
            .repos
            .entry(repo_key.to_string())
            .or_default()
            .entry(tool_name.to_string())
            .or_insert(0);
        *counter = counter.saturating_add(1);
        *counter
    }

    pub fn count(&self, repo_key: &str, tool_name: &str) -> u64 {
        self.repos
            .get(repo_key)
            .and_then(|tools| tools.get(tool_name))
            .copied()
            .unwrap_or(0)
    }

    pub fn repository(&self, repo_key: &str) -> Option<&ToolCounts> {
        self.repos.get(repo_key)
    }

    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }

    pub fn repository_count(&self) -> usize {
        self.repos.len()
    }

    /// Repositories ranked by total clicks, highest first, at most `limit` rows.
    pub fn top_repositories(&self, limit: usize) -> Vec<RepoUsage> {
        let mut rows: Vec<RepoUsage> = self
            .repos
            .iter()
            .map(|(repo_key, per_tool)| RepoUsage {
                repo_key: repo_key.clone(),
                total: per_tool.values().fold(0u64, |acc, n| acc.saturating_add(*n)),
                per_tool: per_tool.clone(),
            })
            .collect();
        // sort_by is stable, so equal totals keep key order
        rows.sort_by(|a, b| b.total.cmp(&a.total));
        rows.truncate(limit);
        rows
    }
}
