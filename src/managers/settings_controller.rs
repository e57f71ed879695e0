//! Settings controller for gittools.
//!
//! Sole owner of the in-memory [`Settings`]. Every mutation (toggle, add,
//! delete, option change, reset) goes through this struct, is applied in
//! memory, announced to subscribers, then persisted as a whole record.
//!
//! Reads fail open: a storage error yields default settings. Writes are best
//! effort: a failed save is logged and returned, and the in-memory state is
//! kept until the next successful save. Concurrent edits from another
//! instance are resolved by the store's last-writer-wins semantics.

use std::sync::Arc;

use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::services::settings_export::{self, SettingsExport};
use crate::services::sync_storage::{StorageItems, SyncStorage};
use crate::services::tool_catalog;
use crate::types::enabled_set::EnabledSet;
use crate::types::errors::{SettingsError, StorageError};
use crate::types::settings::{
    Settings, ToolOptions, CONFIG_KEY, CUSTOM_TOOLS_KEY, ENABLED_TOOLS_KEY, USAGE_STATS_KEY,
};
use crate::types::tool::Tool;

const SETTINGS_KEYS: [&str; 3] = [ENABLED_TOOLS_KEY, CUSTOM_TOOLS_KEY, CONFIG_KEY];

/// Callback invoked with the new settings after every change.
pub type SettingsListener = Box<dyn Fn(&Settings)>;

/// Handle returned by [`SettingsController::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Trait defining the settings store interface.
pub trait SettingsControllerTrait {
    fn load(&mut self) -> Settings;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &Settings;
    fn catalog(&self) -> Vec<Tool>;
    fn set_enabled(&mut self, index: usize, enabled: bool) -> Result<(), SettingsError>;
    fn add_custom_tool(&mut self, name: &str, url: &str, description: &str) -> Result<usize, SettingsError>;
    fn delete_custom_tool(&mut self, index: usize) -> Result<Tool, SettingsError>;
    fn delete_custom_tool_by_id(&mut self, id: &str) -> Result<Tool, SettingsError>;
    fn set_show_detailed_urls(&mut self, show: bool) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn install(&mut self) -> Result<bool, SettingsError>;
    fn export(&self) -> SettingsExport;
}

pub struct SettingsController {
    storage: Arc<dyn SyncStorage>,
    settings: Settings,
    listeners: Vec<(SubscriptionId, SettingsListener)>,
    next_subscription: u64,
}

impl SettingsController {
    /// Creates a controller holding default settings. Call `load()` to read storage.
    pub fn new(storage: Arc<dyn SyncStorage>) -> Self {
        Self {
            storage,
            settings: Settings::default(),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Registers a listener called after every settings change.
    pub fn subscribe(&mut self, listener: SettingsListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    /// Re-reads storage after another instance changed it.
    pub fn reload(&mut self) -> Settings {
        self.load()
    }

    fn notify(&self) {
        for (_, listener) in &self.listeners {
            listener(&self.settings);
        }
    }

    /// Announces the in-memory change, then persists it.
    fn commit(&mut self) -> Result<(), SettingsError> {
        self.notify();
        self.save()
    }

    /// Reads and decodes the stored record without touching the in-memory
    /// copy. Unlike `load()` a read error is returned, not papered over.
    pub fn read_stored(&self) -> Result<Settings, StorageError> {
        let items = self.storage.get(&SETTINGS_KEYS)?;
        Ok(Self::decode(&items).0)
    }

    fn check_index(&self, index: usize) -> Result<(), SettingsError> {
        if index >= self.settings.catalog_len() {
            return Err(SettingsError::InvalidIndex(index));
        }
        Ok(())
    }

    fn encode(settings: &Settings) -> Result<StorageItems, StorageError> {
        let mut items = StorageItems::new();
        items.insert(ENABLED_TOOLS_KEY.to_string(), serde_json::to_value(&settings.enabled_tools)?);
        items.insert(CUSTOM_TOOLS_KEY.to_string(), serde_json::to_value(&settings.custom_tools)?);
        items.insert(CONFIG_KEY.to_string(), serde_json::to_value(&settings.config)?);
        Ok(items)
    }

    /// Builds settings from whatever keys were read. Missing or malformed
    /// keys fall back to their defaults independently. Also returns whether
    /// any custom tool was given a new id.
    fn decode(items: &StorageItems) -> (Settings, bool) {
        let mut settings = Settings::default();

        if let Some(custom) = decode_key::<Vec<Tool>>(items, CUSTOM_TOOLS_KEY) {
            settings.custom_tools = custom;
        }
        if let Some(enabled) = decode_key::<EnabledSet>(items, ENABLED_TOOLS_KEY) {
            settings.enabled_tools = enabled;
        }
        if let Some(config) = decode_key::<ToolOptions>(items, CONFIG_KEY) {
            settings.config = config;
        }

        let mut assigned_ids = false;
        for tool in settings.custom_tools.iter_mut().filter(|t| t.id.is_none()) {
            tool.id = Some(Uuid::new_v4().to_string());
            assigned_ids = true;
        }

        let catalog_len = settings.catalog_len();
        let dropped = settings.enabled_tools.retain_within(catalog_len);
        if dropped > 0 {
            warn!("Dropped {} enabled index(es) beyond catalog size {}", dropped, catalog_len);
        }
        (settings, assigned_ids)
    }
}

fn decode_key<T: DeserializeOwned>(items: &StorageItems, key: &str) -> Option<T> {
    let value: &Value = items.get(key)?;
    match serde_json::from_value(value.clone()) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("Ignoring malformed '{}' in storage: {}", key, e);
            None
        }
    }
}

impl SettingsControllerTrait for SettingsController {
    /// Reads the settings record, falling back to defaults on any read error.
    fn load(&mut self) -> Settings {
        let assigned_ids = match self.storage.get(&SETTINGS_KEYS) {
            Ok(items) => {
                let (settings, assigned_ids) = Self::decode(&items);
                self.settings = settings;
                assigned_ids
            }
            Err(e) => {
                warn!("Failed to load settings, using defaults: {}", e);
                self.settings = Settings::default();
                false
            }
        };
        // Ids handed out for older records must survive the next load.
        if assigned_ids {
            match self.save() {
                Ok(()) => info!("Assigned ids to custom tools from an older record"),
                Err(e) => warn!("Custom tool ids not persisted: {}", e),
            }
        }
        debug!(
            "Loaded settings: {} enabled, {} custom tool(s)",
            self.settings.enabled_tools.len(),
            self.settings.custom_tools.len()
        );
        self.notify();
        self.settings.clone()
    }

    /// Writes the whole settings record.
    fn save(&self) -> Result<(), SettingsError> {
        let items = Self::encode(&self.settings)?;
        self.storage.set(items).map_err(|e| {
            error!("Failed to save settings: {}", e);
            SettingsError::Storage(e)
        })
    }

    fn get_settings(&self) -> &Settings {
        &self.settings
    }

    fn catalog(&self) -> Vec<Tool> {
        tool_catalog::resolve_catalog(&self.settings.custom_tools)
    }

    fn set_enabled(&mut self, index: usize, enabled: bool) -> Result<(), SettingsError> {
        self.check_index(index)?;
        if self.settings.enabled_tools.is_enabled(index) == enabled {
            return Ok(());
        }
        self.settings.enabled_tools.set_enabled(index, enabled);
        debug!("Tool {} enabled = {}", index, enabled);
        self.commit()
    }

    /// Appends a validated custom tool, enables it and returns its index.
    fn add_custom_tool(&mut self, name: &str, url: &str, description: &str) -> Result<usize, SettingsError> {
        let mut tool = tool_catalog::validate_custom_tool(name, url, description)?;
        tool.id = Some(Uuid::new_v4().to_string());

        self.settings.custom_tools.push(tool);
        let index = self.settings.catalog_len() - 1;
        self.settings.enabled_tools.set_enabled(index, true);
        info!("Added custom tool '{}' at index {}", name.trim(), index);

        self.commit()?;
        Ok(index)
    }

    /// Removes a custom tool and shifts the enabled-set to the new numbering.
    fn delete_custom_tool(&mut self, index: usize) -> Result<Tool, SettingsError> {
        self.check_index(index)?;
        if !tool_catalog::is_custom_index(index, self.settings.custom_tools.len()) {
            return Err(SettingsError::NotCustomTool(index));
        }

        let removed = self
            .settings
            .custom_tools
            .remove(index - tool_catalog::builtin_count());
        self.settings.enabled_tools.reindex_after_removal(index);
        info!("Deleted custom tool '{}' at index {}", removed.name, index);

        self.commit()?;
        Ok(removed)
    }

    fn delete_custom_tool_by_id(&mut self, id: &str) -> Result<Tool, SettingsError> {
        let position = self
            .settings
            .custom_tools
            .iter()
            .position(|t| t.id.as_deref() == Some(id))
            .ok_or_else(|| SettingsError::ToolNotFound(id.to_string()))?;
        self.delete_custom_tool(tool_catalog::builtin_count() + position)
    }

    fn set_show_detailed_urls(&mut self, show: bool) -> Result<(), SettingsError> {
        self.settings.config.show_detailed_urls = show;
        self.commit()
    }

    /// Wipes every persisted key, usage statistics included, and restores defaults.
    fn reset(&mut self) -> Result<(), SettingsError> {
        self.storage.clear().map_err(|e| {
            error!("Failed to reset settings: {}", e);
            SettingsError::Storage(e)
        })?;
        self.settings = Settings::default();
        info!("Settings reset to defaults");
        self.notify();
        Ok(())
    }

    /// First-install hook. Writes defaults and an empty usage record unless a
    /// settings record already exists. Returns whether anything was written.
    fn install(&mut self) -> Result<bool, SettingsError> {
        let existing = self.storage.get(&SETTINGS_KEYS)?;
        if !existing.is_empty() {
            debug!("Settings already present, skipping install defaults");
            return Ok(false);
        }

        self.settings = Settings::default();
        let mut items = Self::encode(&self.settings)?;
        items.insert(USAGE_STATS_KEY.to_string(), Value::Object(StorageItems::new()));
        self.storage.set(items)?;
        info!("Installed default settings");
        self.notify();
        Ok(true)
    }

    fn export(&self) -> SettingsExport {
        settings_export::export_settings(&self.settings, chrono::Utc::now())
    }
}
