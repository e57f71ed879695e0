// gittools settings export
// Serialises the current settings as a downloadable JSON document. Import is not supported.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::types::enabled_set::EnabledSet;
use crate::types::errors::StorageError;
use crate::types::settings::{Settings, ToolOptions};
use crate::types::tool::Tool;

/// Suggested file name for the download.
pub const EXPORT_FILE_NAME: &str = "github-tools-config.json";

/// The exported document: the settings record plus a timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SettingsExport {
    pub enabled_tools: EnabledSet,
    pub custom_tools: Vec<Tool>,
    pub config: ToolOptions,
    pub export_date: String,
}

/// Snapshots `settings` with `at` as the ISO-8601 export date.
pub fn export_settings(settings: &Settings, at: DateTime<Utc>) -> SettingsExport {
    SettingsExport {
        enabled_tools: settings.enabled_tools.clone(),
        custom_tools: settings.custom_tools.clone(),
        config: settings.config.clone(),
        export_date: at.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

impl SettingsExport {
    /// Pretty-printed JSON, two-space indented.
    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// A `data:` URL the settings page can hand to a download link.
    pub fn to_data_url(&self) -> Result<String, StorageError> {
        let json = self.to_json()?;
        Ok(format!("data:application/json;base64,{}", BASE64.encode(json)))
    }

    /// The settings part of the document.
    pub fn settings(&self) -> Settings {
        Settings {
            enabled_tools: self.enabled_tools.clone(),
            custom_tools: self.custom_tools.clone(),
            config: self.config.clone(),
        }
    }
}
