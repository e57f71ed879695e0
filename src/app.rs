//! App core for gittools.
//!
//! Holds the storage handle and the components built on it. The settings
//! controller is the single entry point for settings mutations.

use std::path::Path;
use std::sync::Arc;

use log::{error, info};

use crate::database::connection::Database;
use crate::managers::settings_controller::{SettingsController, SettingsControllerTrait};
use crate::services::sync_storage::{MemorySyncStorage, SqliteSyncStorage, SyncStorage};
use crate::services::usage_aggregator::UsageAggregator;

pub struct App {
    pub storage: Arc<dyn SyncStorage>,
    pub settings: SettingsController,
    pub usage: UsageAggregator,
}

impl App {
    /// Opens the SQLite sync store at `db_path` and loads settings from it.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Arc::new(Database::open(db_path)?);
        Ok(Self::with_storage(Arc::new(SqliteSyncStorage::new(db))))
    }

    /// App over a throwaway in-memory store.
    pub fn in_memory() -> Self {
        Self::with_storage(Arc::new(MemorySyncStorage::new()))
    }

    pub fn with_storage(storage: Arc<dyn SyncStorage>) -> Self {
        let mut settings = SettingsController::new(storage.clone());
        settings.load();
        let usage = UsageAggregator::new(storage.clone());

        Self {
            storage,
            settings,
            usage,
        }
    }

    /// Startup sequence: write first-install defaults if needed, then reload settings.
    pub fn startup(&mut self) {
        match self.settings.install() {
            Ok(true) => info!("First run: default settings written"),
            Ok(false) => {}
            Err(e) => error!("Failed to write install defaults: {}", e),
        }
        self.settings.load();
    }
}
