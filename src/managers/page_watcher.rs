//! Navigation watcher for single-page GitHub navigation.
//!
//! GitHub swaps page content without full reloads, so URL changes arrive as
//! a burst of events. A boolean guard lets at most one detection pass run at
//! a time; events arriving while a pass is in flight are dropped, not queued.
//! The pass waits a fixed settle delay and then inspects the most recent URL,
//! so the last navigation of a burst is still picked up. The guard is always
//! released when the pass ends.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use log::debug;

use crate::services::repo_detector;
use crate::types::repository::RepoRef;

/// How long a detection pass waits for the page to settle.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Result of feeding one navigation event to the watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The URL matched the previous one; nothing ran.
    Unchanged,
    /// Another pass was in flight; this event was dropped.
    Dropped,
    /// The settled page is a repository page; show the menu.
    Repository(RepoRef),
    /// The settled page is not a repository page; remove the menu.
    NotRepository,
}

pub struct PageWatcher {
    last_url: Mutex<Option<String>>,
    processing: AtomicBool,
    delay: Duration,
}

impl Default for PageWatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PageWatcher {
    pub fn new() -> Self {
        Self::with_delay(DEFAULT_SETTLE_DELAY)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            last_url: Mutex::new(None),
            processing: AtomicBool::new(false),
            delay,
        }
    }

    fn last_url(&self) -> MutexGuard<'_, Option<String>> {
        match self.last_url.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    /// Handles a DOM-mutation style event: only runs when the URL changed.
    pub async fn on_navigation(&self, url: &str) -> NavigationOutcome {
        {
            let mut last = self.last_url();
            if last.as_deref() == Some(url) {
                return NavigationOutcome::Unchanged;
            }
            *last = Some(url.to_string());
        }
        self.run_pass().await
    }

    /// Handles history traversal: always attempts a pass.
    pub async fn on_popstate(&self, url: &str) -> NavigationOutcome {
        *self.last_url() = Some(url.to_string());
        self.run_pass().await
    }

    async fn run_pass(&self) -> NavigationOutcome {
        if self.processing.swap(true, Ordering::AcqRel) {
            debug!("Navigation pass in flight, dropping event");
            return NavigationOutcome::Dropped;
        }
        // Released on every exit, including cancellation during the delay.
        let _guard = PassGuard(&self.processing);

        tokio::time::sleep(self.delay).await;

        let current = self.last_url().clone();
        match current.as_deref().and_then(repo_detector::detect_repository_url) {
            Some(repo) => {
                debug!("Detected repository {}", repo.key());
                NavigationOutcome::Repository(repo)
            }
            None => NavigationOutcome::NotRepository,
        }
    }
}

struct PassGuard<'a>(&'a AtomicBool);

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
