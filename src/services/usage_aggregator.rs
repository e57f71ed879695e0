// gittools Usage Aggregator
// Counts tool clicks per repository in the `usageStats` storage key and ranks repositories.
// Growth is unbounded apart from the storage quota; there is no decay or eviction.

use std::sync::Arc;

use log::{debug, warn};

use crate::services::sync_storage::{StorageItems, SyncStorage};
use crate::types::errors::{StorageError, UsageError};
use crate::types::settings::USAGE_STATS_KEY;
use crate::types::usage::{RepoUsage, UsageStats};

/// Rows shown on the settings page leaderboard.
pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;

/// Trait defining usage tracking operations.
pub trait UsageAggregatorTrait {
    fn track_usage(&self, repo_key: &str, tool_name: &str) -> Result<u64, UsageError>;
    fn load_stats(&self) -> UsageStats;
    fn top_repositories(&self, limit: usize) -> Vec<RepoUsage>;
}

pub struct UsageAggregator {
    storage: Arc<dyn SyncStorage>,
}

impl UsageAggregator {
    pub fn new(storage: Arc<dyn SyncStorage>) -> Self {
        Self { storage }
    }

    fn read_stats(&self) -> Result<UsageStats, StorageError> {
        let items = self.storage.get(&[USAGE_STATS_KEY])?;
        match items.get(USAGE_STATS_KEY) {
            Some(value) => Ok(serde_json::from_value(value.clone())?),
            None => Ok(UsageStats::new()),
        }
    }
}

impl UsageAggregatorTrait for UsageAggregator {
    /// Increments `stats[repo_key][tool_name]` and writes the whole record back.
    /// Returns the new count. Nothing is written when the record cannot be read.
    fn track_usage(&self, repo_key: &str, tool_name: &str) -> Result<u64, UsageError> {
        if repo_key.trim().is_empty() {
            return Err(UsageError::InvalidKey("repository key is empty".to_string()));
        }
        if tool_name.trim().is_empty() {
            return Err(UsageError::InvalidKey("tool name is empty".to_string()));
        }

        // A malformed record is replaced. A failed read writes nothing.
        let mut stats = match self.read_stats() {
            Ok(stats) => stats,
            Err(StorageError::SerializationError(e)) => {
                warn!("Usage stats malformed, starting from empty: {}", e);
                UsageStats::new()
            }
            Err(e) => {
                warn!("Failed to read usage stats, click not counted: {}", e);
                return Err(UsageError::Storage(e));
            }
        };
        let count = stats.increment(repo_key, tool_name);

        let mut items = StorageItems::new();
        items.insert(
            USAGE_STATS_KEY.to_string(),
            serde_json::to_value(&stats).map_err(StorageError::from)?,
        );
        self.storage.set(items)?;

        debug!("Usage tracked: {} for {} ({})", tool_name, repo_key, count);
        Ok(count)
    }

    /// Reads the stats record, returning an empty one on failure.
    fn load_stats(&self) -> UsageStats {
        self.read_stats().unwrap_or_else(|e| {
            warn!("Failed to load usage stats: {}", e);
            UsageStats::new()
        })
    }

    fn top_repositories(&self, limit: usize) -> Vec<RepoUsage> {
        self.load_stats().top_repositories(limit)
    }
}
