use serde::{Deserialize, Serialize};

use super::enabled_set::EnabledSet;
use super::tool::Tool;
use crate::services::tool_catalog;

/// Storage key holding the enabled-set.
pub const ENABLED_TOOLS_KEY: &str = "enabledTools";
/// Storage key holding the ordered custom tool list.
pub const CUSTOM_TOOLS_KEY: &str = "customTools";
/// Storage key holding [`ToolOptions`].
pub const CONFIG_KEY: &str = "config";
/// Storage key holding the usage statistics record.
pub const USAGE_STATS_KEY: &str = "usageStats";

/// The persisted settings record.
///
/// Always written as a whole; there are no partial writes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub enabled_tools: EnabledSet,
    pub custom_tools: Vec<Tool>,
    pub config: ToolOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled_tools: EnabledSet::all_builtin(tool_catalog::builtin_count()),
            custom_tools: Vec::new(),
            config: ToolOptions::default(),
        }
    }
}

impl Settings {
    /// Number of tools in the resolved catalog.
    pub fn catalog_len(&self) -> usize {
        tool_catalog::builtin_count() + self.custom_tools.len()
    }
}

/// Display options for the link menu.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolOptions {
    #[serde(default)]
    pub show_detailed_urls: bool,
}
