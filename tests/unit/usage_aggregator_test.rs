//! Integration tests for the UsageAggregator.
//!
//! Click tracking is read-modify-write of the whole `usageStats` record; the
//! leaderboard ranks repositories by total clicks with a stable tie-break.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::sync::Arc;

use tempfile::TempDir;

use gittools::database::Database;
use gittools::services::sync_storage::{
    MemorySyncStorage, SqliteSyncStorage, StorageItems, StorageQuota, SyncStorage,
};
use gittools::services::usage_aggregator::{UsageAggregator, UsageAggregatorTrait, DEFAULT_LEADERBOARD_SIZE};
use gittools::types::errors::{StorageError, UsageError};
use gittools::types::settings::USAGE_STATS_KEY;
use gittools::types::usage::RepoUsage;

/// Storage whose next `get` fails once, then behaves normally.
#[derive(Default)]
struct FailNextRead {
    inner: MemorySyncStorage,
    fail_next: Cell<bool>,
}

impl SyncStorage for FailNextRead {
    fn get(&self, keys: &[&str]) -> Result<StorageItems, StorageError> {
        if self.fail_next.replace(false) {
            return Err(StorageError::DatabaseError("database is locked".to_string()));
        }
        self.inner.get(keys)
    }

    fn get_all(&self) -> Result<StorageItems, StorageError> {
        self.inner.get_all()
    }

    fn set(&self, items: StorageItems) -> Result<(), StorageError> {
        self.inner.set(items)
    }

    fn remove(&self, keys: &[&str]) -> Result<(), StorageError> {
        self.inner.remove(keys)
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.inner.clear()
    }
}

fn aggregator_in(dir: &TempDir) -> UsageAggregator {
    let db = Database::open(dir.path().join("usage.db")).unwrap();
    UsageAggregator::new(Arc::new(SqliteSyncStorage::new(Arc::new(db))))
}

#[test]
fn test_three_plus_one_clicks_rank_first() {
    let dir = TempDir::new().unwrap();
    let usage = aggregator_in(&dir);
    for _ in 0..3 {
        usage.track_usage("a/b", "X").unwrap();
    }
    usage.track_usage("a/b", "Y").unwrap();

    let top = usage.top_repositories(1);

    let mut per_tool = BTreeMap::new();
    per_tool.insert("X".to_string(), 3);
    per_tool.insert("Y".to_string(), 1);
    assert_eq!(
        top,
        vec![RepoUsage {
            repo_key: "a/b".to_string(),
            total: 4,
            per_tool,
        }]
    );
}

#[test]
fn test_leaderboard_is_sorted_and_truncated() {
    let dir = TempDir::new().unwrap();
    let usage = aggregator_in(&dir);
    for i in 0..12u64 {
        let repo = format!("owner/repo{:02}", i);
        for _ in 0..=i {
            usage.track_usage(&repo, "GitHub1s").unwrap();
        }
    }

    let top = usage.top_repositories(DEFAULT_LEADERBOARD_SIZE);
    assert_eq!(top.len(), DEFAULT_LEADERBOARD_SIZE);
    assert_eq!(top[0].repo_key, "owner/repo11");
    assert_eq!(top[0].total, 12);
    assert!(top.windows(2).all(|w| w[0].total >= w[1].total));
}

#[test]
fn test_counts_survive_reopen() {
    let dir = TempDir::new().unwrap();
    aggregator_in(&dir).track_usage("a/b", "X").unwrap();
    let usage = aggregator_in(&dir);
    assert_eq!(usage.track_usage("a/b", "X").unwrap(), 2);
    assert_eq!(usage.load_stats().count("a/b", "X"), 2);
}

#[test]
fn test_quota_exhaustion_is_reported_and_keeps_old_counts() {
    let db = Arc::new(Database::open_in_memory().unwrap());
    let storage = Arc::new(SqliteSyncStorage::with_quota(
        db,
        StorageQuota { bytes_per_item: 48, total_bytes: 1_000 },
    ));
    let usage = UsageAggregator::new(storage.clone());

    usage.track_usage("a/b", "X").unwrap();
    let result = usage.track_usage("a-very-long-owner-name/and-an-even-longer-repo", "X");

    assert!(matches!(result, Err(UsageError::Storage(StorageError::QuotaExceeded(_)))));
    let stored = storage.get(&[USAGE_STATS_KEY]).unwrap();
    assert_eq!(stored[USAGE_STATS_KEY], serde_json::json!({"a/b": {"X": 1}}));
}

#[test]
fn test_failed_read_leaves_existing_counts_untouched() {
    let storage = Arc::new(FailNextRead::default());
    let usage = UsageAggregator::new(storage.clone());
    for _ in 0..5 {
        usage.track_usage("a/b", "X").unwrap();
    }
    usage.track_usage("c/d", "Y").unwrap();

    storage.fail_next.set(true);
    let result = usage.track_usage("a/b", "X");
    assert!(matches!(result, Err(UsageError::Storage(StorageError::DatabaseError(_)))));

    let stats = usage.load_stats();
    assert_eq!(stats.count("a/b", "X"), 5);
    assert_eq!(stats.count("c/d", "Y"), 1);
    assert_eq!(usage.track_usage("a/b", "X").unwrap(), 6);
}
